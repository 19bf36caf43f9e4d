//! Infrastructure Layer
//!
//! Session store implementations.

pub mod memory;
pub mod postgres;

pub use memory::MemorySessionRepository;
pub use postgres::PgSessionRepository;
