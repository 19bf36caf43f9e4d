//! Gate Error Types
//!
//! Gate-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Gate-specific result type alias
pub type GateResult<T> = Result<T, GateError>;

/// Gate-specific error variants
#[derive(Debug, Error)]
pub enum GateError {
    /// Session token missing, malformed, tampered or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// CSRF token absent or did not match the session token
    #[error("CSRF token missing or invalid")]
    CsrfRejected,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::SessionInvalid => StatusCode::UNAUTHORIZED,
            GateError::CsrfRejected => StatusCode::FORBIDDEN,
            GateError::Database(_) | GateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GateError::SessionInvalid => ErrorKind::Unauthorized,
            GateError::CsrfRejected => ErrorKind::Forbidden,
            GateError::Database(_) | GateError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            GateError::Database(e) => {
                tracing::error!(error = %e, "Gate database error");
            }
            GateError::Internal(msg) => {
                tracing::error!(message = %msg, "Gate internal error");
            }
            GateError::CsrfRejected => {
                tracing::warn!("Request rejected: CSRF validation failed");
            }
            GateError::SessionInvalid => {
                tracing::debug!("Invalid session token");
            }
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for GateError {
    fn from(err: AppError) -> Self {
        GateError::Internal(err.to_string())
    }
}
