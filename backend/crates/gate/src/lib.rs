//! Gate (Request Gate) Backend Module
//!
//! Per-request middleware pipeline for the portal. Every inbound request
//! passes through, in order:
//! - session establishment (persisted, cookie-keyed, signed tokens)
//! - CSRF validation (single exempt upload path, all others checked)
//! - fixed security response headers
//! - principal propagation into request extensions
//! - return-to capture for post-login redirects
//! - per-route authentication guard
//!
//! Clean Architecture structure:
//! - `domain/` - Session entity, repository trait
//! - `application/` - Config, token signing, pure gate decisions
//! - `infra/` - Database implementations
//! - `presentation/` - Tower middleware, request extensions
//!
//! ## Security Model
//! - Session tokens are HMAC-SHA256 signed (`session_id.signature`)
//! - CSRF tokens are per-session random values, compared constant-time
//! - Cookies are HttpOnly, Secure, SameSite=Lax by default

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::GateConfig;
pub use domain::session::{Principal, Session};
pub use error::{GateError, GateResult};
pub use infra::postgres::PgSessionRepository;
pub use presentation::middleware::{CurrentUser, GateState, SessionHandle};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod store {
    pub use crate::infra::memory::MemorySessionRepository;
    pub use crate::infra::postgres::PgSessionRepository as SessionStore;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
