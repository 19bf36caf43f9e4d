//! Password Reset Use Cases
//!
//! Two-step recovery flow: issue an opaque one-shot token (delivery is
//! the mail collaborator's job), then exchange it for a new password.
//! Only the SHA-256 hash of the token is stored.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::IdentityConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{IdentityError, IdentityResult};
use platform::password::{ClearTextPassword, HashedPassword};

/// Bytes of entropy behind each reset token
const RESET_TOKEN_BYTES: usize = 32;

/// An issued reset token (clear text leaves the process only via the
/// mail collaborator)
pub struct ResetIssued {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Forgot password use case - begins the recovery flow
pub struct ForgotPasswordUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<IdentityConfig>,
}

impl<U, C> ForgotPasswordUseCase<U, C>
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

    /// Issue a reset token for the address, if it belongs to an account
    ///
    /// Returns `Ok(None)` for unknown addresses so the response cannot
    /// be used to probe which emails are registered.
    pub async fn execute(&self, email: &str) -> IdentityResult<Option<ResetIssued>> {
        let Ok(email) = Email::new(email) else {
            return Ok(None);
        };

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            return Ok(None);
        };

        let Some(mut credential) = self.credential_repo.find_by_user_id(&user.user_id).await?
        else {
            return Ok(None);
        };

        let token = platform::crypto::random_token(RESET_TOKEN_BYTES);
        let token_hash = platform::crypto::sha256(token.as_bytes());

        let ttl = chrono::Duration::from_std(self.config.reset_token_ttl)
            .map_err(|e| IdentityError::Internal(format!("Invalid reset TTL: {e}")))?;

        credential.begin_reset(token_hash.to_vec(), ttl);
        self.credential_repo.update(&credential).await?;

        let expires_at = credential
            .reset_expires_at
            .ok_or_else(|| IdentityError::Internal("Reset expiry not set".to_string()))?;

        tracing::info!(
            public_id = %user.public_id,
            "Password reset token issued"
        );

        Ok(Some(ResetIssued { token, expires_at }))
    }
}

/// Reset password use case - completes the recovery flow
pub struct ResetPasswordUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<IdentityConfig>,
}

impl<U, C> ResetPasswordUseCase<U, C>
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

    /// Whether a token currently maps to a usable reset
    pub async fn token_valid(&self, token: &str) -> IdentityResult<bool> {
        let token_hash = platform::crypto::sha256(token.as_bytes());

        Ok(self
            .credential_repo
            .find_by_reset_token_hash(&token_hash)
            .await?
            .map(|credential| credential.reset_token_valid())
            .unwrap_or(false))
    }

    /// Exchange a token for a new password; the token is consumed
    pub async fn execute(&self, token: &str, new_password: String) -> IdentityResult<User> {
        let token_hash = platform::crypto::sha256(token.as_bytes());

        let mut credential = self
            .credential_repo
            .find_by_reset_token_hash(&token_hash)
            .await?
            .ok_or(IdentityError::ResetTokenInvalid)?;

        if !credential.reset_token_valid() {
            return Err(IdentityError::ResetTokenInvalid);
        }

        let password = ClearTextPassword::new(new_password)?;
        let password_hash = HashedPassword::from_clear_text(&password, self.config.pepper())?;

        credential.set_password(password_hash);
        credential.reset_failures();
        self.credential_repo.update(&credential).await?;

        let user = self
            .user_repo
            .find_by_id(&credential.user_id)
            .await?
            .ok_or(IdentityError::UserNotFound)?;

        tracing::info!(
            public_id = %user.public_id,
            "Password reset completed"
        );

        Ok(user)
    }
}
