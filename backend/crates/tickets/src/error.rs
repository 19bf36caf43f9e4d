//! Ticket Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Ticket-specific result type alias
pub type TicketResult<T> = Result<T, TicketError>;

/// Ticket-specific error variants
#[derive(Debug, Error)]
pub enum TicketError {
    /// No registration exists for this user
    #[error("No registration found")]
    NotRegistered,

    /// User already holds a registration
    #[error("Already registered")]
    AlreadyRegistered,

    /// Change refused because payment is already completed
    #[error("Payment already completed")]
    PaymentAlreadyCompleted,

    /// No authenticated principal on a request that needs one
    #[error("Authentication required")]
    SessionRequired,

    /// Input validation error
    #[error("{0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TicketError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TicketError::NotRegistered => StatusCode::NOT_FOUND,
            TicketError::AlreadyRegistered => StatusCode::CONFLICT,
            TicketError::PaymentAlreadyCompleted => StatusCode::CONFLICT,
            TicketError::SessionRequired => StatusCode::UNAUTHORIZED,
            TicketError::Validation(_) => StatusCode::BAD_REQUEST,
            TicketError::Database(_) | TicketError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TicketError::NotRegistered => ErrorKind::NotFound,
            TicketError::AlreadyRegistered | TicketError::PaymentAlreadyCompleted => {
                ErrorKind::Conflict
            }
            TicketError::SessionRequired => ErrorKind::Unauthorized,
            TicketError::Validation(_) => ErrorKind::BadRequest,
            TicketError::Database(_) | TicketError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            TicketError::Database(e) => {
                tracing::error!(error = %e, "Ticket database error");
            }
            TicketError::Internal(msg) => {
                tracing::error!(message = %msg, "Ticket internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Ticket error");
            }
        }
    }
}

impl IntoResponse for TicketError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for TicketError {
    fn from(err: AppError) -> Self {
        TicketError::Internal(err.to_string())
    }
}
