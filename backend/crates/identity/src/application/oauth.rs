//! OAuth Sign-In Use Case
//!
//! The provider round-trip is modeled as an explicit two-step protocol:
//! 1. redirect-to-provider (`ProviderGateway::authorize_url`)
//! 2. handle-provider-callback (`ProviderGateway::exchange_code`,
//!    then [`OAuthSignInUseCase::execute`])
//!
//! The gateway returns explicit success/failure values; the handler
//! layer turns failure into a redirect to the login page.

use std::sync::Arc;

use crate::domain::entity::{credential::Credential, linked_account::LinkedAccount, user::User};
use crate::domain::repository::{CredentialRepository, LinkedAccountRepository, UserRepository};
use crate::domain::value_object::{email::Email, provider::Provider};
use crate::error::{IdentityError, IdentityResult};

/// Profile returned by a successful provider exchange
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub provider: Provider,
    /// Provider-side stable subject identifier
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Gateway to the external identity providers
#[trait_variant::make(ProviderGateway: Send)]
pub trait LocalProviderGateway {
    /// URL to redirect the user agent to for authorization
    fn authorize_url(&self, provider: Provider, state: &str) -> IdentityResult<String>;

    /// Exchange an authorization code for the provider profile
    async fn exchange_code(
        &self,
        provider: Provider,
        code: &str,
    ) -> IdentityResult<ProviderIdentity>;
}

/// OAuth sign-in use case
///
/// Resolves a provider identity to a local user: existing link wins,
/// then an email match links the provider to that account, otherwise a
/// new passwordless account is created.
pub struct OAuthSignInUseCase<U, C, L>
where
    U: UserRepository,
    C: CredentialRepository,
    L: LinkedAccountRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    link_repo: Arc<L>,
}

impl<U, C, L> OAuthSignInUseCase<U, C, L>
where
    U: UserRepository,
    C: CredentialRepository,
    L: LinkedAccountRepository,
{
    pub fn new(user_repo: Arc<U>, credential_repo: Arc<C>, link_repo: Arc<L>) -> Self {
        Self {
            user_repo,
            credential_repo,
            link_repo,
        }
    }

    pub async fn execute(&self, identity: ProviderIdentity) -> IdentityResult<User> {
        // Existing link: sign that user in
        if let Some(link) = self
            .link_repo
            .find_by_provider_subject(identity.provider, &identity.subject)
            .await?
        {
            let mut user = self
                .user_repo
                .find_by_id(&link.user_id)
                .await?
                .ok_or(IdentityError::UserNotFound)?;

            user.record_login();
            self.user_repo.update(&user).await?;
            return Ok(user);
        }

        // Same email already registered: attach the provider to it
        if let Some(email_str) = &identity.email {
            if let Ok(email) = Email::new(email_str) {
                if let Some(mut user) = self.user_repo.find_by_email(&email).await? {
                    let link = LinkedAccount::new(
                        user.user_id,
                        identity.provider,
                        identity.subject.clone(),
                    );
                    self.link_repo.link(&link).await?;

                    user.record_login();
                    self.user_repo.update(&user).await?;

                    tracing::info!(
                        public_id = %user.public_id,
                        provider = %identity.provider,
                        "Provider linked to existing account"
                    );
                    return Ok(user);
                }
            }
        }

        // First visit: create a passwordless account
        let email_str = identity.email.as_deref().ok_or_else(|| {
            IdentityError::ProviderExchangeFailed(
                "provider did not supply an email address".to_string(),
            )
        })?;
        let email =
            Email::new(email_str).map_err(|e| IdentityError::Validation(e.to_string()))?;

        let mut user = User::new(email);
        user.display_name = identity.display_name.clone();
        user.record_login();

        let credential = Credential::new(user.user_id, None);
        let link = LinkedAccount::new(user.user_id, identity.provider, identity.subject.clone());

        self.user_repo.create(&user).await?;
        self.credential_repo.create(&credential).await?;
        self.link_repo.link(&link).await?;

        tracing::info!(
            public_id = %user.public_id,
            provider = %identity.provider,
            "User created from provider sign-in"
        );

        Ok(user)
    }
}
