//! Domain Layer

pub mod entities;
pub mod repository;

pub use entities::{PaymentStatus, Registration, TicketKind};
pub use repository::RegistrationRepository;
