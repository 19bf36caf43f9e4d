//! Identity Backend Module
//!
//! Users, credentials, OAuth sign-in and password recovery.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and the provider gateway trait
//! - `infra/` - Database and HTTP provider implementations
//! - `presentation/` - HTTP handlers and DTOs
//!
//! ## Features
//! - Email + password login with temporary lockout after repeated failures
//! - Signup with automatic sign-in
//! - Password recovery via one-shot hashed reset tokens
//! - OAuth sign-in (Google, LinkedIn) modeled as an explicit two-step
//!   protocol: redirect-to-provider, then handle-provider-callback
//! - Account management: profile, password change, provider unlinking
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (platform crate)
//! - Reset tokens stored as SHA-256 hashes, single use, TTL bound
//! - Provider callbacks verified against a per-session state parameter

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::IdentityConfig;
pub use error::{IdentityError, IdentityResult};
pub use infra::oauth_http::HttpProviderGateway;
pub use infra::postgres::PgIdentityRepository;

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}
