//! End-to-end tests for the assembled route table and gate pipeline
//!
//! Drives the real router over in-memory stores and a fake provider
//! gateway, covering the authenticated-route / return-to flow and the
//! CSRF exemption logic.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::util::ServiceExt;

use gate::application::token::parse_session_token;
use gate::config::GateConfig;
use gate::domain::repository::SessionRepository;
use gate::domain::session::Session;
use gate::infra::memory::MemorySessionRepository;
use identity::application::oauth::{ProviderGateway, ProviderIdentity};
use identity::config::IdentityConfig;
use identity::domain::value_object::provider::Provider;
use identity::error::{IdentityError, IdentityResult};
use identity::infra::memory::MemoryIdentityRepository;
use tickets::application::config::TicketConfig;
use tickets::infra::memory::MemoryTicketRepository;

// ============================================================================
// Test harness
// ============================================================================

#[derive(Clone)]
struct FakeGateway {
    identity: Option<ProviderIdentity>,
}

impl FakeGateway {
    fn denying() -> Self {
        Self { identity: None }
    }

    fn approving(email: &str) -> Self {
        Self {
            identity: Some(ProviderIdentity {
                provider: Provider::Google,
                subject: "subject-1".to_string(),
                email: Some(email.to_string()),
                display_name: Some("Ada".to_string()),
            }),
        }
    }
}

impl ProviderGateway for FakeGateway {
    fn authorize_url(&self, provider: Provider, state: &str) -> IdentityResult<String> {
        Ok(format!(
            "https://provider.test/{}/authorize?state={}",
            provider.as_str(),
            state
        ))
    }

    async fn exchange_code(
        &self,
        _provider: Provider,
        _code: &str,
    ) -> IdentityResult<ProviderIdentity> {
        self.identity
            .clone()
            .ok_or_else(|| IdentityError::ProviderExchangeFailed("denied".to_string()))
    }
}

struct TestApp {
    router: Router,
    sessions: MemorySessionRepository,
    secret: [u8; 32],
}

fn test_app(gateway: FakeGateway) -> TestApp {
    let sessions = MemorySessionRepository::new();
    let gate_config = GateConfig::development();
    let secret = gate_config.session_secret;

    let router = web::routes::app_router(
        sessions.clone(),
        MemoryIdentityRepository::new(),
        gateway,
        MemoryTicketRepository::new(),
        gate_config,
        IdentityConfig::default(),
        TicketConfig::default(),
    );

    TestApp {
        router,
        sessions,
        secret,
    }
}

impl TestApp {
    async fn get(&self, uri: &str, cookie: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(
        &self,
        uri: &str,
        cookie: Option<&str>,
        csrf: Option<&str>,
        body: &str,
    ) -> axum::response::Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(csrf) = csrf {
            builder = builder.header("x-csrf-token", csrf);
        }

        self.router
            .clone()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// Stored session referenced by a `sid=<token>` cookie pair
    async fn session(&self, cookie: &str) -> Session {
        let token = cookie.strip_prefix("sid=").expect("sid cookie");
        let session_id = parse_session_token(token, &self.secret).expect("valid token");
        self.sessions
            .find_by_id(session_id)
            .await
            .unwrap()
            .expect("session stored")
    }
}

/// Extract the `sid=<token>` pair from a response's Set-Cookie header
fn session_cookie(response: &axum::response::Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(|kv| kv.trim().to_string())
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
}

/// Open an anonymous session and return (cookie, csrf token)
async fn open_session(app: &TestApp) -> (String, String) {
    let response = app.get("/", None).await;
    let cookie = session_cookie(&response).expect("session cookie");
    let csrf = app.session(&cookie).await.csrf_token;
    (cookie, csrf)
}

/// Create an account and return its credentials (uses its own session)
async fn create_account(app: &TestApp, email: &str, password: &str) {
    let (cookie, csrf) = open_session(app).await;

    let body = format!(
        "email={}&password={}&confirmPassword={}",
        email.replace('@', "%40"),
        password,
        password
    );
    let response = app
        .post_form("/signup", Some(&cookie), Some(&csrf), &body)
        .await;

    assert!(response.status().is_redirection(), "signup should redirect");
}

// ============================================================================
// Security headers
// ============================================================================

#[tokio::test]
async fn security_headers_present_on_every_response() {
    let app = test_app(FakeGateway::denying());

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers.get(header::STRICT_TRANSPORT_SECURITY).unwrap(),
        "max-age=31536000; includeSubDomains; preload"
    );
    assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "SAMEORIGIN");
    assert_eq!(
        headers.get(header::X_XSS_PROTECTION).unwrap(),
        "1; mode=block"
    );
    // Present-but-disabled switches stay off
    assert!(headers.get(header::CONTENT_SECURITY_POLICY).is_none());
    assert!(headers.get(header::REFERRER_POLICY).is_none());
    assert!(headers.get(header::X_CONTENT_TYPE_OPTIONS).is_none());
}

// ============================================================================
// Guard + return-to flow
// ============================================================================

#[tokio::test]
async fn anonymous_guarded_route_redirects_to_login_and_stores_return_to() {
    let app = test_app(FakeGateway::denying());

    let response = app.get("/account", None).await;

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    let cookie = session_cookie(&response).unwrap();
    let session = app.session(&cookie).await;
    assert_eq!(session.return_to.as_deref(), Some("/account"));
    assert!(session.principal.is_none());
}

#[tokio::test]
async fn login_redirects_back_to_stored_path() {
    let app = test_app(FakeGateway::denying());
    create_account(&app, "ada@example.com", "correct-horse-battery").await;

    // Denied attempt stores the target path in a fresh session
    let response = app.get("/account", None).await;
    let cookie = session_cookie(&response).unwrap();
    let csrf = app.session(&cookie).await.csrf_token;

    let response = app
        .post_form(
            "/login",
            Some(&cookie),
            Some(&csrf),
            "email=ada%40example.com&password=correct-horse-battery",
        )
        .await;

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/account");

    let session = app.session(&cookie).await;
    assert!(session.principal.is_some());
    // Consumed after login
    assert_eq!(session.return_to, None);

    // The guarded page now renders
    let response = app.get("/account", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn signup_signs_the_session_in() {
    let app = test_app(FakeGateway::denying());

    let (cookie, csrf) = open_session(&app).await;
    let response = app
        .post_form(
            "/signup",
            Some(&cookie),
            Some(&csrf),
            "email=ada%40example.com&password=correct-horse-battery&confirmPassword=correct-horse-battery",
        )
        .await;

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
    assert!(app.session(&cookie).await.principal.is_some());
}

#[tokio::test]
async fn authenticated_account_visit_stores_return_to_again() {
    let app = test_app(FakeGateway::denying());
    create_account(&app, "ada@example.com", "correct-horse-battery").await;

    let (cookie, csrf) = open_session(&app).await;
    app.post_form(
        "/login",
        Some(&cookie),
        Some(&csrf),
        "email=ada%40example.com&password=correct-horse-battery",
    )
    .await;

    let response = app.get("/account", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The authenticated branch re-stores the account path
    assert_eq!(
        app.session(&cookie).await.return_to.as_deref(),
        Some("/account")
    );
}

// ============================================================================
// CSRF
// ============================================================================

#[tokio::test]
async fn state_changing_request_without_token_rejected() {
    let app = test_app(FakeGateway::denying());

    let (cookie, _csrf) = open_session(&app).await;
    let response = app
        .post_form(
            "/contact",
            Some(&cookie),
            None,
            "name=Ada&email=ada%40example.com&message=hello",
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn state_changing_request_with_token_accepted() {
    let app = test_app(FakeGateway::denying());

    let (cookie, csrf) = open_session(&app).await;
    let response = app
        .post_form(
            "/contact",
            Some(&cookie),
            Some(&csrf),
            "name=Ada&email=ada%40example.com&message=hello",
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn upload_path_reaches_handler_without_cookie_or_token() {
    let app = test_app(FakeGateway::denying());

    let boundary = "gate-flow-test";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"badge.png\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         fake image bytes\r\n\
         --{boundary}--\r\n"
    );

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["files"][0]["fileName"], "badge.png");
}

// ============================================================================
// OAuth round-trip
// ============================================================================

#[tokio::test]
async fn provider_failure_redirects_to_login_without_principal() {
    let app = test_app(FakeGateway::denying());

    let (cookie, _) = open_session(&app).await;
    let response = app
        .get("/auth/google/callback?error=access_denied", Some(&cookie))
        .await;

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
    assert!(app.session(&cookie).await.principal.is_none());
}

#[tokio::test]
async fn provider_success_resumes_stored_return_to() {
    let app = test_app(FakeGateway::approving("ada@example.com"));

    // Denied guarded request stores the path
    let response = app.get("/ticket", None).await;
    assert_eq!(location(&response), "/login");
    let cookie = session_cookie(&response).unwrap();
    assert_eq!(
        app.session(&cookie).await.return_to.as_deref(),
        Some("/ticket")
    );

    // Redirect to the provider records the state parameter
    let response = app.get("/auth/google", Some(&cookie)).await;
    assert!(response.status().is_redirection());
    assert!(location(&response).starts_with("https://provider.test/google/authorize"));

    let state = app
        .session(&cookie)
        .await
        .oauth_state
        .expect("state recorded");

    // Callback signs in and resumes the stored path
    let response = app
        .get(
            &format!("/auth/google/callback?code=ok&state={state}"),
            Some(&cookie),
        )
        .await;

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/ticket");

    let session = app.session(&cookie).await;
    assert!(session.principal.is_some());
    assert_eq!(session.return_to, None);
}

#[tokio::test]
async fn callback_with_mismatched_state_rejected() {
    let app = test_app(FakeGateway::approving("ada@example.com"));

    let (cookie, _) = open_session(&app).await;
    app.get("/auth/google", Some(&cookie)).await;

    let response = app
        .get("/auth/google/callback?code=ok&state=forged", Some(&cookie))
        .await;

    assert_eq!(location(&response), "/login");
    assert!(app.session(&cookie).await.principal.is_none());
}

#[tokio::test]
async fn unknown_provider_is_not_found() {
    let app = test_app(FakeGateway::denying());

    let (cookie, _) = open_session(&app).await;
    let response = app.get("/auth/facebook", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn logout_expires_the_session() {
    let app = test_app(FakeGateway::denying());
    create_account(&app, "ada@example.com", "correct-horse-battery").await;

    let (cookie, csrf) = open_session(&app).await;
    app.post_form(
        "/login",
        Some(&cookie),
        Some(&csrf),
        "email=ada%40example.com&password=correct-horse-battery",
    )
    .await;
    assert!(app.session(&cookie).await.principal.is_some());

    let response = app.get("/logout", Some(&cookie)).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");

    // The old session is expired; the next request gets a fresh anonymous one
    let response = app.get("/account", Some(&cookie)).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}
