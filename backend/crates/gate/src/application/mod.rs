//! Application Layer
//!
//! Gate configuration, token signing, and the pure per-request decisions
//! (CSRF evaluation, return-to computation).

pub mod config;
pub mod csrf;
pub mod establish;
pub mod return_to;
pub mod token;

// Re-exports
pub use config::GateConfig;
pub use csrf::{CsrfOutcome, evaluate_csrf};
pub use establish::{EstablishSessionUseCase, EstablishedSession};
pub use return_to::compute_return_to;
