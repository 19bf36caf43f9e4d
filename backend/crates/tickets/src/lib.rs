//! Tickets Backend Module
//!
//! Event registration, ticket management and payment completion for
//! authenticated attendees.
//!
//! Clean Architecture structure:
//! - `domain/` - Registration entity, repository trait
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::TicketConfig;
pub use error::{TicketError, TicketResult};
pub use infra::postgres::PgTicketRepository;
pub use presentation::handlers::TicketAppState;

// Convenience re-exports
pub mod handlers {
    pub use crate::presentation::handlers::*;
}
