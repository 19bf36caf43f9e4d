//! Gate Middleware
//!
//! The per-request pipeline, applied in order at router assembly:
//! 1. [`load_session`] - establish/load the persisted session
//! 2. [`csrf_gate`] - exempt the upload path, validate everything else
//! 3. [`security_headers`] - fixed response headers
//! 4. [`publish_principal`] - expose the principal to handlers
//! 5. [`remember_return_to`] - capture the post-login redirect target
//! 6. [`require_principal`] - per-route authentication guard
//!
//! Any rejection in steps 2 or 6 terminates the pipeline before the
//! handler runs.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderValue, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tokio::sync::RwLock;

use platform::client::{extract_client_ip, extract_user_agent};

use crate::application::config::GateConfig;
use crate::application::csrf::{CsrfOutcome, evaluate_csrf};
use crate::application::establish::EstablishSessionUseCase;
use crate::application::return_to::compute_return_to;
use crate::domain::repository::SessionRepository;
use crate::domain::session::{Principal, Session};
use crate::error::GateError;

/// Header carrying the CSRF token on state-changing requests
pub const CSRF_HEADER: &str = "x-csrf-token";
/// Query parameter fallback for the CSRF token
pub const CSRF_QUERY_PARAM: &str = "_csrf";

/// Middleware state
#[derive(Clone)]
pub struct GateState<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<S>,
    pub config: Arc<GateConfig>,
}

impl<S> GateState<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: S, config: GateConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }
}

struct SessionCell {
    session: Session,
    dirty: bool,
}

/// Shared, mutable view of the request's session
///
/// Inserted into request extensions by [`load_session`]. Handler writes
/// are buffered here and persisted once after the response; the last
/// write wins for overlapping requests on the same session.
#[derive(Clone)]
pub struct SessionHandle {
    cell: Arc<RwLock<SessionCell>>,
}

impl SessionHandle {
    fn new(session: Session) -> Self {
        Self {
            cell: Arc::new(RwLock::new(SessionCell {
                session,
                dirty: false,
            })),
        }
    }

    /// Clone of the current session state
    pub async fn snapshot(&self) -> Session {
        self.cell.read().await.session.clone()
    }

    /// The session's CSRF token
    pub async fn csrf_token(&self) -> String {
        self.cell.read().await.session.csrf_token.clone()
    }

    /// The attached principal, if any
    pub async fn principal(&self) -> Option<Principal> {
        self.cell.read().await.session.principal
    }

    /// Mutate the session, marking it for persistence
    pub async fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut Session),
    {
        let mut cell = self.cell.write().await;
        f(&mut cell.session);
        cell.dirty = true;
    }

    /// Consume the stored return-to path
    pub async fn take_return_to(&self) -> Option<String> {
        let mut cell = self.cell.write().await;
        let taken = cell.session.take_return_to();
        if taken.is_some() {
            cell.dirty = true;
        }
        taken
    }

    /// Consume the outstanding OAuth state parameter
    pub async fn take_oauth_state(&self) -> Option<String> {
        let mut cell = self.cell.write().await;
        let taken = cell.session.take_oauth_state();
        if taken.is_some() {
            cell.dirty = true;
        }
        taken
    }

    async fn persist_view(&self) -> (Session, bool) {
        let cell = self.cell.read().await;
        (cell.session.clone(), cell.dirty)
    }
}

/// Authenticated principal published for every request
///
/// `None` for anonymous requests; inserted unconditionally so handlers
/// and view models can always read the authentication state.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Option<Principal>);

// ============================================================================
// 1. Session establishment
// ============================================================================

/// Load or create the request's session and persist mutations afterwards
pub async fn load_session<S>(
    axum::extract::State(state): axum::extract::State<GateState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, GateError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let headers = req.headers();

    let direct_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());

    let client_ip = extract_client_ip(headers, direct_ip);
    let user_agent = extract_user_agent(headers);

    let cookie = platform::cookie::extract_cookie(headers, &state.config.session_cookie_name);

    let use_case = EstablishSessionUseCase::new(state.repo.clone(), state.config.clone());
    let established = use_case
        .establish(cookie.as_deref(), client_ip, user_agent)
        .await?;

    let token = established.token;
    let is_new = established.is_new;

    let handle = SessionHandle::new(established.session);
    req.extensions_mut().insert(handle.clone());

    let mut response = next.run(req).await;

    if is_new {
        let cookie_config = state.config.cookie_config();
        response.headers_mut().append(
            header::SET_COOKIE,
            platform::cookie::set_cookie_header(&cookie_config, &token),
        );
    }

    let (session, dirty) = handle.persist_view().await;
    if dirty {
        // Handler mutations must be durable before the response leaves
        state.repo.update(&session).await?;
    } else if !is_new {
        // Activity-only update, fire and forget
        let repo = state.repo.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.update(&session).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });
    }

    Ok(response)
}

// ============================================================================
// 2. CSRF gate
// ============================================================================

/// Validate the CSRF token, skipping the designated exempt path
pub async fn csrf_gate<S>(
    axum::extract::State(state): axum::extract::State<GateState<S>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GateError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let handle = session_handle(&req)?;

    if req.uri().path() == state.config.csrf_exempt_path {
        // Exempt path: validation must never execute
        return Ok(next.run(req).await);
    }

    let presented = presented_csrf_token(&req);
    let session_token = handle.csrf_token().await;

    let outcome = evaluate_csrf(
        req.uri().path(),
        req.method(),
        presented.as_deref(),
        &session_token,
        &state.config.csrf_exempt_path,
    );

    match outcome {
        CsrfOutcome::Rejected => Err(GateError::CsrfRejected),
        _ => Ok(next.run(req).await),
    }
}

fn presented_csrf_token(req: &Request<Body>) -> Option<String> {
    if let Some(token) = req.headers().get(CSRF_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(token.to_string());
    }

    req.uri().query().and_then(|query| {
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == CSRF_QUERY_PARAM).then(|| value.to_string())
        })
    })
}

// ============================================================================
// 3. Security headers
// ============================================================================

/// Attach the fixed security headers to every response
pub async fn security_headers<S>(
    axum::extract::State(state): axum::extract::State<GateState<S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let mut response = next.run(req).await;

    let config = &state.config.headers;
    let headers = response.headers_mut();

    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_str(&config.hsts_value())
            .unwrap_or_else(|_| HeaderValue::from_static("max-age=31536000")),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_str(&config.frame_options)
            .unwrap_or_else(|_| HeaderValue::from_static("SAMEORIGIN")),
    );
    if config.xss_protection {
        headers.insert(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        );
    }

    if let Some(csp) = &config.content_security_policy {
        if let Ok(value) = HeaderValue::from_str(csp) {
            headers.insert(header::CONTENT_SECURITY_POLICY, value);
        }
    }
    if let Some(policy) = &config.referrer_policy {
        if let Ok(value) = HeaderValue::from_str(policy) {
            headers.insert(header::REFERRER_POLICY, value);
        }
    }
    if config.nosniff {
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
    }

    response
}

// ============================================================================
// 4. Principal propagation
// ============================================================================

/// Publish the session's principal (or absence) to request extensions
pub async fn publish_principal(
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, GateError> {
    let handle = session_handle(&req)?;
    let principal = handle.principal().await;

    req.extensions_mut().insert(CurrentUser(principal));

    Ok(next.run(req).await)
}

// ============================================================================
// 5. Return-to capture
// ============================================================================

/// Store the current path as the post-login redirect target when the
/// return-to rules say so
pub async fn remember_return_to<S>(
    axum::extract::State(state): axum::extract::State<GateState<S>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GateError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let handle = session_handle(&req)?;
    let current = current_user(&req)?;

    if let Some(target) = compute_return_to(current.0.is_some(), req.uri().path(), &state.config) {
        handle
            .mutate(move |session| session.remember_return_to(target))
            .await;
    }

    Ok(next.run(req).await)
}

// ============================================================================
// 6. Authentication guard
// ============================================================================

/// Redirect anonymous requests on guarded routes to the login page
///
/// The return-to capture has already stored the requested path, so the
/// login flow can resume it.
pub async fn require_principal<S>(
    axum::extract::State(state): axum::extract::State<GateState<S>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    match req.extensions().get::<CurrentUser>() {
        Some(CurrentUser(Some(_))) => next.run(req).await,
        _ => Redirect::to(&state.config.login_path).into_response(),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn session_handle(req: &Request<Body>) -> Result<SessionHandle, GateError> {
    req.extensions()
        .get::<SessionHandle>()
        .cloned()
        .ok_or_else(|| GateError::Internal("session middleware not installed".to_string()))
}

fn current_user(req: &Request<Body>) -> Result<CurrentUser, GateError> {
    req.extensions()
        .get::<CurrentUser>()
        .copied()
        .ok_or_else(|| GateError::Internal("principal middleware not installed".to_string()))
}
