//! Sign Up Use Case
//!
//! Registers a new user with email and password.

use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::domain::entity::{credential::Credential, user::User};
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{IdentityError, IdentityResult};
use platform::password::{ClearTextPassword, HashedPassword};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<IdentityConfig>,
}

impl<U, C> SignUpUseCase<U, C>
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

    pub async fn execute(&self, input: SignUpInput) -> IdentityResult<User> {
        let email =
            Email::new(&input.email).map_err(|e| IdentityError::Validation(e.to_string()))?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(IdentityError::EmailTaken);
        }

        let password = ClearTextPassword::new(input.password)?;
        let password_hash = HashedPassword::from_clear_text(&password, self.config.pepper())?;

        let user = User::new(email);
        let credential = Credential::new(user.user_id, Some(password_hash));

        self.user_repo.create(&user).await?;
        self.credential_repo.create(&credential).await?;

        tracing::info!(
            public_id = %user.public_id,
            "User signed up"
        );

        Ok(user)
    }
}
