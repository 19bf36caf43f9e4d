//! Sign In Use Case
//!
//! Authenticates a user by email and password.

use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{IdentityError, IdentityResult};
use platform::password::ClearTextPassword;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<IdentityConfig>,
}

impl<U, C> SignInUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    pub fn new(user_repo: Arc<U>, credential_repo: Arc<C>, config: Arc<IdentityConfig>) -> Self {
        Self {
            user_repo,
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> IdentityResult<User> {
        let email = Email::new(&input.email).map_err(|_| IdentityError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let mut credential = self
            .credential_repo
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or_else(|| IdentityError::Internal("Credential not found".to_string()))?;

        if credential.is_locked() {
            return Err(IdentityError::AccountLocked);
        }

        // OAuth-only accounts have no password to check
        let Some(password_hash) = credential.password_hash.clone() else {
            return Err(IdentityError::InvalidCredentials);
        };

        let password = ClearTextPassword::new(input.password)
            .map_err(|_| IdentityError::InvalidCredentials)?;

        let password_valid = password_hash.verify(&password, self.config.pepper())?;

        if !password_valid {
            credential.record_failure();
            self.credential_repo.update(&credential).await?;
            return Err(IdentityError::InvalidCredentials);
        }

        credential.reset_failures();
        self.credential_repo.update(&credential).await?;

        let mut user = user;
        user.record_login();
        self.user_repo.update(&user).await?;

        tracing::info!(
            public_id = %user.public_id,
            "User signed in"
        );

        Ok(user)
    }
}
