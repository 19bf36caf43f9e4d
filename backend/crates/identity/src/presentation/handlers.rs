//! HTTP Handlers
//!
//! Controllers for the authentication lifecycle, password recovery,
//! account management and the OAuth round-trip. Handlers return JSON
//! view models for the rendering layer, or redirects.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use std::str::FromStr;
use std::sync::Arc;

use gate::domain::session::Principal;
use gate::presentation::middleware::SessionHandle;

use crate::application::account::{
    ChangePasswordUseCase, ProfileUpdate, UnlinkProviderUseCase, UpdateProfileUseCase,
};
use crate::application::config::IdentityConfig;
use crate::application::oauth::{OAuthSignInUseCase, ProviderGateway};
use crate::application::password_reset::{ForgotPasswordUseCase, ResetPasswordUseCase};
use crate::application::sign_in::{SignInInput, SignInUseCase};
use crate::application::sign_up::{SignUpInput, SignUpUseCase};
use crate::domain::entity::user::User;
use crate::domain::repository::{CredentialRepository, LinkedAccountRepository, UserRepository};
use crate::domain::value_object::provider::Provider;
use crate::error::{IdentityError, IdentityResult};
use crate::presentation::dto::{
    AccountView, CallbackQuery, ForgotAck, ForgotForm, ForgotView, LoginForm, LoginView,
    PasswordForm, ProfileForm, ResetForm, ResetView, SignupForm, SignupView,
};

/// Bytes of entropy behind each OAuth state parameter
const OAUTH_STATE_BYTES: usize = 16;

/// Shared state for identity handlers
#[derive(Clone)]
pub struct IdentityAppState<R, P>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub gateway: Arc<P>,
    pub config: Arc<IdentityConfig>,
}

// ============================================================================
// Login / Logout
// ============================================================================

/// GET /login
pub async fn get_login(Extension(handle): Extension<SessionHandle>) -> Json<LoginView> {
    Json(LoginView {
        title: "Login".to_string(),
        csrf_token: handle.csrf_token().await,
    })
}

/// POST /login
pub async fn post_login<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Extension(handle): Extension<SessionHandle>,
    axum::Form(form): axum::Form<LoginForm>,
) -> IdentityResult<Redirect>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let user = use_case
        .execute(SignInInput {
            email: form.email,
            password: form.password,
        })
        .await?;

    Ok(establish_and_redirect(&handle, &user).await)
}

/// GET /logout
pub async fn get_logout(Extension(handle): Extension<SessionHandle>) -> Redirect {
    handle
        .mutate(|session| {
            session.sign_out();
            session.expire_now();
        })
        .await;

    Redirect::to("/")
}

// ============================================================================
// Signup
// ============================================================================

/// GET /signup
pub async fn get_signup(Extension(handle): Extension<SessionHandle>) -> Json<SignupView> {
    Json(SignupView {
        title: "Create Account".to_string(),
        csrf_token: handle.csrf_token().await,
    })
}

/// POST /signup
pub async fn post_signup<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Extension(handle): Extension<SessionHandle>,
    axum::Form(form): axum::Form<SignupForm>,
) -> IdentityResult<Redirect>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    if form.password != form.confirm_password {
        return Err(IdentityError::Validation("Passwords do not match".to_string()));
    }

    let use_case = SignUpUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let user = use_case
        .execute(SignUpInput {
            email: form.email,
            password: form.password,
        })
        .await?;

    // New accounts are signed in immediately
    let principal = Principal { user_id: user.user_id };
    handle.mutate(move |session| session.sign_in(principal)).await;

    Ok(Redirect::to("/"))
}

// ============================================================================
// Password recovery
// ============================================================================

/// GET /forgot
pub async fn get_forgot(Extension(handle): Extension<SessionHandle>) -> Json<ForgotView> {
    Json(ForgotView {
        title: "Forgot Password".to_string(),
        csrf_token: handle.csrf_token().await,
    })
}

/// POST /forgot
pub async fn post_forgot<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    axum::Form(form): axum::Form<ForgotForm>,
) -> IdentityResult<Json<ForgotAck>>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    let use_case =
        ForgotPasswordUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    if let Some(issued) = use_case.execute(&form.email).await? {
        // Delivery is the mail collaborator's job; surface the token to it
        tracing::info!(
            reset_token = %issued.token,
            expires_at = %issued.expires_at,
            "Password reset token ready for delivery"
        );
    }

    Ok(Json(ForgotAck {
        message: "If that address is registered, a reset link is on its way".to_string(),
    }))
}

/// GET /reset/{token}
pub async fn get_reset<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Extension(handle): Extension<SessionHandle>,
    Path(token): Path<String>,
) -> IdentityResult<Response>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    let use_case =
        ResetPasswordUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    if !use_case.token_valid(&token).await? {
        return Ok(Redirect::to("/forgot").into_response());
    }

    Ok(Json(ResetView {
        title: "Reset Password".to_string(),
        csrf_token: handle.csrf_token().await,
        token,
    })
    .into_response())
}

/// POST /reset/{token}
pub async fn post_reset<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Extension(handle): Extension<SessionHandle>,
    Path(token): Path<String>,
    axum::Form(form): axum::Form<ResetForm>,
) -> IdentityResult<Redirect>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    if form.password != form.confirm_password {
        return Err(IdentityError::Validation("Passwords do not match".to_string()));
    }

    let use_case =
        ResetPasswordUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let user = use_case.execute(&token, form.password).await?;

    // A completed reset proves account ownership; sign the session in
    let principal = Principal { user_id: user.user_id };
    handle.mutate(move |session| session.sign_in(principal)).await;

    Ok(Redirect::to("/"))
}

// ============================================================================
// Account (requires authentication)
// ============================================================================

/// GET /account
pub async fn get_account<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Extension(handle): Extension<SessionHandle>,
) -> IdentityResult<Json<AccountView>>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    let principal = require_principal(&handle).await?;

    let user = state
        .repo
        .find_by_id(&principal.user_id)
        .await?
        .ok_or(IdentityError::UserNotFound)?;

    let has_password = CredentialRepository::find_by_user_id(&*state.repo, &principal.user_id)
        .await?
        .map(|credential| credential.has_password())
        .unwrap_or(false);

    let linked_providers = LinkedAccountRepository::find_by_user_id(&*state.repo, &principal.user_id)
        .await?
        .into_iter()
        .map(|link| link.provider.as_str().to_string())
        .collect();

    Ok(Json(AccountView {
        title: "Account".to_string(),
        csrf_token: handle.csrf_token().await,
        public_id: user.public_id.to_string(),
        email: user.email.as_str().to_string(),
        display_name: user.display_name,
        location: user.location,
        website: user.website,
        has_password,
        linked_providers,
    }))
}

/// POST /account/profile
pub async fn post_profile<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Extension(handle): Extension<SessionHandle>,
    axum::Form(form): axum::Form<ProfileForm>,
) -> IdentityResult<Redirect>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    let principal = require_principal(&handle).await?;

    let use_case = UpdateProfileUseCase::new(state.repo.clone());
    use_case
        .execute(
            &principal.user_id,
            ProfileUpdate {
                display_name: non_empty(form.display_name),
                location: non_empty(form.location),
                website: non_empty(form.website),
            },
        )
        .await?;

    Ok(Redirect::to("/account"))
}

/// POST /account/password
pub async fn post_password<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Extension(handle): Extension<SessionHandle>,
    axum::Form(form): axum::Form<PasswordForm>,
) -> IdentityResult<Redirect>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    let principal = require_principal(&handle).await?;

    if form.password != form.confirm_password {
        return Err(IdentityError::Validation("Passwords do not match".to_string()));
    }

    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.config.clone());
    use_case.execute(&principal.user_id, form.password).await?;

    Ok(Redirect::to("/account"))
}

/// GET /account/unlink/{provider}
pub async fn get_unlink<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Extension(handle): Extension<SessionHandle>,
    Path(provider): Path<String>,
) -> IdentityResult<Redirect>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    let principal = require_principal(&handle).await?;

    let provider = Provider::from_str(&provider)
        .map_err(|_| IdentityError::Validation(format!("Unknown provider: {provider}")))?;

    let use_case = UnlinkProviderUseCase::new(state.repo.clone(), state.repo.clone());
    use_case.execute(&principal.user_id, provider).await?;

    Ok(Redirect::to("/account"))
}

// ============================================================================
// OAuth round-trip
// ============================================================================

/// GET /auth/{provider}
pub async fn oauth_start<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Extension(handle): Extension<SessionHandle>,
    Path(provider): Path<String>,
) -> IdentityResult<Redirect>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    let provider =
        Provider::from_str(&provider).map_err(|_| IdentityError::ProviderNotConfigured)?;

    let oauth_state = platform::crypto::random_token(OAUTH_STATE_BYTES);
    let url = state.gateway.authorize_url(provider, &oauth_state)?;

    handle
        .mutate(move |session| session.set_oauth_state(oauth_state))
        .await;

    Ok(Redirect::to(&url))
}

/// GET /auth/{provider}/callback
///
/// Provider failure is recovered here: the user lands back on the login
/// page and no principal is established.
pub async fn oauth_callback<R, P>(
    State(state): State<IdentityAppState<R, P>>,
    Extension(handle): Extension<SessionHandle>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> IdentityResult<Redirect>
where
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
{
    let provider =
        Provider::from_str(&provider).map_err(|_| IdentityError::ProviderNotConfigured)?;

    let expected_state = handle.take_oauth_state().await;

    if let Some(error) = &query.error {
        tracing::warn!(provider = %provider, error = %error, "Provider reported failure");
        return Ok(Redirect::to("/login"));
    }

    let Some(code) = query.code.as_deref() else {
        tracing::warn!(provider = %provider, "Callback missing authorization code");
        return Ok(Redirect::to("/login"));
    };

    if expected_state.is_none() || query.state != expected_state {
        tracing::warn!(provider = %provider, "Callback state mismatch");
        return Ok(Redirect::to("/login"));
    }

    let identity = match state.gateway.exchange_code(provider, code).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(provider = %provider, error = %e, "Code exchange failed");
            return Ok(Redirect::to("/login"));
        }
    };

    let use_case = OAuthSignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
    );
    let user = use_case.execute(identity).await?;

    Ok(establish_and_redirect(&handle, &user).await)
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Sign the session in and redirect to the consumed return-to path
async fn establish_and_redirect(handle: &SessionHandle, user: &User) -> Redirect {
    let principal = Principal { user_id: user.user_id };
    handle.mutate(move |session| session.sign_in(principal)).await;

    let target = handle
        .take_return_to()
        .await
        .unwrap_or_else(|| "/".to_string());

    Redirect::to(&target)
}

async fn require_principal(handle: &SessionHandle) -> IdentityResult<Principal> {
    handle
        .principal()
        .await
        .ok_or(IdentityError::SessionRequired)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
