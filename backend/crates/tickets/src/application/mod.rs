//! Application Layer

pub mod complete_payment;
pub mod config;
pub mod register;
pub mod update_ticket;

// Re-exports
pub use complete_payment::CompletePaymentUseCase;
pub use config::TicketConfig;
pub use register::{RegisterUseCase, RegistrationDetails};
pub use update_ticket::UpdateTicketUseCase;
