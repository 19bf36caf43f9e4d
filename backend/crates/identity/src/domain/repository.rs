//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer.

use crate::domain::entity::{
    credential::Credential, linked_account::LinkedAccount, user::User,
};
use crate::domain::value_object::{email::Email, provider::Provider};
use crate::error::IdentityResult;
use kernel::id::UserId;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> IdentityResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> IdentityResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> IdentityResult<Option<User>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> IdentityResult<bool>;

    /// Update user
    async fn update(&self, user: &User) -> IdentityResult<()>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Create credentials
    async fn create(&self, credential: &Credential) -> IdentityResult<()>;

    /// Find credentials by user ID
    async fn find_by_user_id(&self, user_id: &UserId) -> IdentityResult<Option<Credential>>;

    /// Find credentials by outstanding reset token hash
    async fn find_by_reset_token_hash(
        &self,
        token_hash: &[u8],
    ) -> IdentityResult<Option<Credential>>;

    /// Update credentials
    async fn update(&self, credential: &Credential) -> IdentityResult<()>;
}

/// Linked provider account repository trait
#[trait_variant::make(LinkedAccountRepository: Send)]
pub trait LocalLinkedAccountRepository {
    /// Link a provider account to a user
    async fn link(&self, account: &LinkedAccount) -> IdentityResult<()>;

    /// Find a link by provider and provider-side subject
    async fn find_by_provider_subject(
        &self,
        provider: Provider,
        subject: &str,
    ) -> IdentityResult<Option<LinkedAccount>>;

    /// All links for a user
    async fn find_by_user_id(&self, user_id: &UserId) -> IdentityResult<Vec<LinkedAccount>>;

    /// Remove a user's link for a provider
    async fn unlink(&self, user_id: &UserId, provider: Provider) -> IdentityResult<()>;
}
