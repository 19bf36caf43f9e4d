//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::MemoryTicketRepository;
pub use postgres::PgTicketRepository;
