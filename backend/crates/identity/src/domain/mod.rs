//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{credential::Credential, linked_account::LinkedAccount, user::User};
pub use repository::{CredentialRepository, LinkedAccountRepository, UserRepository};
pub use value_object::{email::Email, provider::Provider, public_id::PublicId};
