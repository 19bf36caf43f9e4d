//! Infrastructure Layer
//!
//! Database repository and HTTP provider gateway implementations.

pub mod memory;
pub mod oauth_http;
pub mod postgres;

pub use memory::MemoryIdentityRepository;
pub use oauth_http::HttpProviderGateway;
pub use postgres::PgIdentityRepository;
