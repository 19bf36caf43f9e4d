//! Identity Error Types
//!
//! Identity-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Identity-specific result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity-specific error variants
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Email/password combination did not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email already registered
    #[error("Email already registered")]
    EmailTaken,

    /// Account is locked (too many failed attempts)
    #[error("Account is temporarily locked")]
    AccountLocked,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// No authenticated principal on a request that needs one
    #[error("Authentication required")]
    SessionRequired,

    /// Password reset token unknown, expired or already used
    #[error("Password reset token is invalid or has expired")]
    ResetTokenInvalid,

    /// Password validation error
    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    /// Generic input validation error
    #[error("{0}")]
    Validation(String),

    /// Requested provider has no configured credentials
    #[error("Sign-in provider is not configured")]
    ProviderNotConfigured,

    /// Provider exchange failed (token or profile fetch)
    #[error("Provider exchange failed: {0}")]
    ProviderExchangeFailed(String),

    /// Unlinking would leave the account with no way to sign in
    #[error("Cannot unlink the only remaining sign-in method")]
    UnlinkWouldLockout,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            IdentityError::InvalidCredentials | IdentityError::SessionRequired => {
                StatusCode::UNAUTHORIZED
            }
            IdentityError::EmailTaken => StatusCode::CONFLICT,
            IdentityError::AccountLocked => StatusCode::LOCKED,
            IdentityError::UserNotFound => StatusCode::NOT_FOUND,
            IdentityError::ResetTokenInvalid => StatusCode::GONE,
            IdentityError::PasswordValidation(_) | IdentityError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            IdentityError::UnlinkWouldLockout => StatusCode::UNPROCESSABLE_ENTITY,
            IdentityError::ProviderNotConfigured => StatusCode::NOT_FOUND,
            IdentityError::ProviderExchangeFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            IdentityError::Database(_) | IdentityError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InvalidCredentials | IdentityError::SessionRequired => {
                ErrorKind::Unauthorized
            }
            IdentityError::EmailTaken => ErrorKind::Conflict,
            IdentityError::AccountLocked => ErrorKind::Locked,
            IdentityError::UserNotFound | IdentityError::ProviderNotConfigured => {
                ErrorKind::NotFound
            }
            IdentityError::ResetTokenInvalid => ErrorKind::Gone,
            IdentityError::PasswordValidation(_) | IdentityError::Validation(_) => {
                ErrorKind::BadRequest
            }
            IdentityError::UnlinkWouldLockout => ErrorKind::UnprocessableEntity,
            IdentityError::ProviderExchangeFailed(_) => ErrorKind::ServiceUnavailable,
            IdentityError::Database(_) | IdentityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            IdentityError::Database(e) => {
                tracing::error!(error = %e, "Identity database error");
            }
            IdentityError::Internal(msg) => {
                tracing::error!(message = %msg, "Identity internal error");
            }
            IdentityError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            IdentityError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            IdentityError::ProviderExchangeFailed(msg) => {
                tracing::warn!(message = %msg, "OAuth provider exchange failed");
            }
            _ => {
                tracing::debug!(error = %self, "Identity error");
            }
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for IdentityError {
    fn from(err: AppError) -> Self {
        IdentityError::Internal(err.to_string())
    }
}

impl From<platform::password::PasswordPolicyError> for IdentityError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        IdentityError::PasswordValidation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for IdentityError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        IdentityError::Internal(err.to_string())
    }
}
