//! Value Objects

pub mod email;
pub mod provider;
pub mod public_id;

pub use email::Email;
pub use provider::Provider;
pub use public_id::PublicId;
