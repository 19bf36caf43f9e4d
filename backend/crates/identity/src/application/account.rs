//! Account Management Use Cases
//!
//! Profile updates, password changes, and provider unlinking for
//! authenticated users.

use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{CredentialRepository, LinkedAccountRepository, UserRepository};
use crate::domain::value_object::provider::Provider;
use crate::error::{IdentityError, IdentityResult};
use kernel::id::UserId;
use platform::password::{ClearTextPassword, HashedPassword};

/// Profile fields an account owner can edit
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

/// Update profile use case
pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId, update: ProfileUpdate) -> IdentityResult<User> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        user.update_profile(update.display_name, update.location, update.website);
        self.user_repo.update(&user).await?;

        Ok(user)
    }
}

/// Change password use case
pub struct ChangePasswordUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
    config: Arc<IdentityConfig>,
}

impl<C> ChangePasswordUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>, config: Arc<IdentityConfig>) -> Self {
        Self {
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, user_id: &UserId, new_password: String) -> IdentityResult<()> {
        let mut credential = self
            .credential_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        let password = ClearTextPassword::new(new_password)?;
        let password_hash = HashedPassword::from_clear_text(&password, self.config.pepper())?;

        credential.set_password(password_hash);
        self.credential_repo.update(&credential).await?;

        tracing::info!(user_id = %user_id, "Password changed");

        Ok(())
    }
}

/// Unlink provider use case
///
/// Refuses to unlink when the account would be left with no password and
/// no other linked provider.
pub struct UnlinkProviderUseCase<C, L>
where
    C: CredentialRepository,
    L: LinkedAccountRepository,
{
    credential_repo: Arc<C>,
    link_repo: Arc<L>,
}

impl<C, L> UnlinkProviderUseCase<C, L>
where
    C: CredentialRepository,
    L: LinkedAccountRepository,
{
    pub fn new(credential_repo: Arc<C>, link_repo: Arc<L>) -> Self {
        Self {
            credential_repo,
            link_repo,
        }
    }

    pub async fn execute(&self, user_id: &UserId, provider: Provider) -> IdentityResult<()> {
        let links = self.link_repo.find_by_user_id(user_id).await?;

        if !links.iter().any(|link| link.provider == provider) {
            return Err(IdentityError::Validation(format!(
                "{} is not linked to this account",
                provider.display_name()
            )));
        }

        let has_password = self
            .credential_repo
            .find_by_user_id(user_id)
            .await?
            .map(|credential| credential.has_password())
            .unwrap_or(false);

        let other_links = links.iter().filter(|link| link.provider != provider).count();

        if !has_password && other_links == 0 {
            return Err(IdentityError::UnlinkWouldLockout);
        }

        self.link_repo.unlink(user_id, provider).await?;

        tracing::info!(user_id = %user_id, provider = %provider, "Provider unlinked");

        Ok(())
    }
}
