//! Presentation Layer

pub mod dto;
pub mod handlers;

pub use handlers::TicketAppState;
