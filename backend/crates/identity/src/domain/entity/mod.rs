//! Domain Entities

pub mod credential;
pub mod linked_account;
pub mod user;

pub use credential::Credential;
pub use linked_account::LinkedAccount;
pub use user::User;
