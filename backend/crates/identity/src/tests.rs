//! Use-case tests over an in-memory repository and a fake provider gateway

#![cfg(test)]

use std::sync::Arc;

use crate::application::account::UnlinkProviderUseCase;
use crate::application::config::IdentityConfig;
use crate::application::oauth::{OAuthSignInUseCase, ProviderGateway, ProviderIdentity};
use crate::application::password_reset::{ForgotPasswordUseCase, ResetPasswordUseCase};
use crate::application::sign_in::{SignInInput, SignInUseCase};
use crate::application::sign_up::{SignUpInput, SignUpUseCase};
use crate::domain::entity::credential::LOCKOUT_THRESHOLD;
use crate::domain::entity::user::User;
use crate::domain::repository::{CredentialRepository, LinkedAccountRepository};
use crate::domain::value_object::provider::Provider;
use crate::error::{IdentityError, IdentityResult};
use crate::infra::memory::MemoryIdentityRepository;

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Clone)]
struct FakeGateway {
    identity: Option<ProviderIdentity>,
}

impl ProviderGateway for FakeGateway {
    fn authorize_url(&self, provider: Provider, state: &str) -> IdentityResult<String> {
        Ok(format!(
            "https://provider.test/{}/authorize?state={}",
            provider.as_str(),
            state
        ))
    }

    async fn exchange_code(
        &self,
        _provider: Provider,
        _code: &str,
    ) -> IdentityResult<ProviderIdentity> {
        self.identity
            .clone()
            .ok_or_else(|| IdentityError::ProviderExchangeFailed("denied".to_string()))
    }
}

fn setup() -> (MemoryIdentityRepository, Arc<IdentityConfig>) {
    (
        MemoryIdentityRepository::default(),
        Arc::new(IdentityConfig::default()),
    )
}

async fn sign_up(repo: &MemoryIdentityRepository, config: &Arc<IdentityConfig>, email: &str) -> User {
    let repo = Arc::new(repo.clone());
    SignUpUseCase::new(repo.clone(), repo, config.clone())
        .execute(SignUpInput {
            email: email.to_string(),
            password: "correct horse battery".to_string(),
        })
        .await
        .unwrap()
}

// ============================================================================
// Sign up / sign in
// ============================================================================

#[tokio::test]
async fn test_sign_up_then_sign_in() {
    let (repo, config) = setup();
    let created = sign_up(&repo, &config, "ada@example.com").await;

    let arc = Arc::new(repo);
    let use_case = SignInUseCase::new(arc.clone(), arc, config);
    let user = use_case
        .execute(SignInInput {
            email: "ada@example.com".to_string(),
            password: "correct horse battery".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.user_id, created.user_id);
    assert!(user.last_login_at.is_some());
}

#[tokio::test]
async fn test_sign_up_duplicate_email_rejected() {
    let (repo, config) = setup();
    sign_up(&repo, &config, "ada@example.com").await;

    let arc = Arc::new(repo);
    let result = SignUpUseCase::new(arc.clone(), arc, config)
        .execute(SignUpInput {
            email: "ada@example.com".to_string(),
            password: "another fine password".to_string(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::EmailTaken)));
}

#[tokio::test]
async fn test_sign_in_wrong_password_rejected() {
    let (repo, config) = setup();
    sign_up(&repo, &config, "ada@example.com").await;

    let arc = Arc::new(repo);
    let result = SignInUseCase::new(arc.clone(), arc, config)
        .execute(SignInInput {
            email: "ada@example.com".to_string(),
            password: "not the password".to_string(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
}

#[tokio::test]
async fn test_repeated_failures_lock_the_account() {
    let (repo, config) = setup();
    sign_up(&repo, &config, "ada@example.com").await;

    let arc = Arc::new(repo);
    let use_case = SignInUseCase::new(arc.clone(), arc.clone(), config);

    for _ in 0..LOCKOUT_THRESHOLD {
        let result = use_case
            .execute(SignInInput {
                email: "ada@example.com".to_string(),
                password: "not the password".to_string(),
            })
            .await;
        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    }

    // Correct password no longer helps while locked
    let result = use_case
        .execute(SignInInput {
            email: "ada@example.com".to_string(),
            password: "correct horse battery".to_string(),
        })
        .await;
    assert!(matches!(result, Err(IdentityError::AccountLocked)));
}

#[tokio::test]
async fn test_sign_in_unknown_email_rejected() {
    let (repo, config) = setup();
    let arc = Arc::new(repo);

    let result = SignInUseCase::new(arc.clone(), arc, config)
        .execute(SignInInput {
            email: "nobody@example.com".to_string(),
            password: "whatever it was".to_string(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
}

// ============================================================================
// Password recovery
// ============================================================================

#[tokio::test]
async fn test_forgot_reset_roundtrip() {
    let (repo, config) = setup();
    sign_up(&repo, &config, "ada@example.com").await;

    let arc = Arc::new(repo);
    let forgot = ForgotPasswordUseCase::new(arc.clone(), arc.clone(), config.clone());
    let issued = forgot.execute("ada@example.com").await.unwrap().unwrap();

    let reset = ResetPasswordUseCase::new(arc.clone(), arc.clone(), config.clone());
    assert!(reset.token_valid(&issued.token).await.unwrap());

    reset
        .execute(&issued.token, "a brand new password".to_string())
        .await
        .unwrap();

    // Token is consumed
    assert!(!reset.token_valid(&issued.token).await.unwrap());
    assert!(matches!(
        reset
            .execute(&issued.token, "yet another password".to_string())
            .await,
        Err(IdentityError::ResetTokenInvalid)
    ));

    // Old password fails, new one works
    let sign_in = SignInUseCase::new(arc.clone(), arc, config);
    assert!(matches!(
        sign_in
            .execute(SignInInput {
                email: "ada@example.com".to_string(),
                password: "correct horse battery".to_string(),
            })
            .await,
        Err(IdentityError::InvalidCredentials)
    ));
    assert!(
        sign_in
            .execute(SignInInput {
                email: "ada@example.com".to_string(),
                password: "a brand new password".to_string(),
            })
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_forgot_unknown_email_issues_nothing() {
    let (repo, config) = setup();
    let arc = Arc::new(repo);

    let forgot = ForgotPasswordUseCase::new(arc.clone(), arc, config);
    assert!(forgot.execute("nobody@example.com").await.unwrap().is_none());
    assert!(forgot.execute("not-an-email").await.unwrap().is_none());
}

#[tokio::test]
async fn test_reset_with_bogus_token_rejected() {
    let (repo, config) = setup();
    sign_up(&repo, &config, "ada@example.com").await;

    let arc = Arc::new(repo);
    let reset = ResetPasswordUseCase::new(arc.clone(), arc, config);

    assert!(!reset.token_valid("bogus-token").await.unwrap());
    assert!(matches!(
        reset.execute("bogus-token", "whatever password".to_string()).await,
        Err(IdentityError::ResetTokenInvalid)
    ));
}

// ============================================================================
// OAuth sign-in
// ============================================================================

fn google_identity(subject: &str, email: &str) -> ProviderIdentity {
    ProviderIdentity {
        provider: Provider::Google,
        subject: subject.to_string(),
        email: Some(email.to_string()),
        display_name: Some("Ada".to_string()),
    }
}

#[tokio::test]
async fn test_oauth_first_visit_creates_linked_user() {
    let (repo, _config) = setup();
    let arc = Arc::new(repo.clone());

    let use_case = OAuthSignInUseCase::new(arc.clone(), arc.clone(), arc.clone());
    let user = use_case
        .execute(google_identity("sub-1", "ada@example.com"))
        .await
        .unwrap();

    assert_eq!(user.email.as_str(), "ada@example.com");
    assert_eq!(user.display_name.as_deref(), Some("Ada"));

    // Passwordless credential and the provider link exist
    let credential = CredentialRepository::find_by_user_id(&repo, &user.user_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!credential.has_password());

    let links = LinkedAccountRepository::find_by_user_id(&repo, &user.user_id)
        .await
        .unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].provider, Provider::Google);
}

#[tokio::test]
async fn test_oauth_second_visit_signs_in_same_user() {
    let (repo, _config) = setup();
    let arc = Arc::new(repo);

    let use_case = OAuthSignInUseCase::new(arc.clone(), arc.clone(), arc.clone());
    let first = use_case
        .execute(google_identity("sub-1", "ada@example.com"))
        .await
        .unwrap();
    let second = use_case
        .execute(google_identity("sub-1", "ada@example.com"))
        .await
        .unwrap();

    assert_eq!(first.user_id, second.user_id);
}

#[tokio::test]
async fn test_oauth_links_to_existing_email_account() {
    let (repo, config) = setup();
    let existing = sign_up(&repo, &config, "ada@example.com").await;

    let arc = Arc::new(repo.clone());
    let use_case = OAuthSignInUseCase::new(arc.clone(), arc.clone(), arc.clone());
    let user = use_case
        .execute(google_identity("sub-1", "ada@example.com"))
        .await
        .unwrap();

    assert_eq!(user.user_id, existing.user_id);
    let links = LinkedAccountRepository::find_by_user_id(&repo, &existing.user_id)
        .await
        .unwrap();
    assert_eq!(links.len(), 1);
}

#[tokio::test]
async fn test_fake_gateway_failure_is_explicit() {
    let gateway = FakeGateway { identity: None };

    let result = gateway.exchange_code(Provider::Google, "code").await;
    assert!(matches!(
        result,
        Err(IdentityError::ProviderExchangeFailed(_))
    ));
}

// ============================================================================
// Unlinking
// ============================================================================

#[tokio::test]
async fn test_unlink_refused_for_last_sign_in_method() {
    let (repo, _config) = setup();
    let arc = Arc::new(repo.clone());

    // OAuth-only account with a single link
    let use_case = OAuthSignInUseCase::new(arc.clone(), arc.clone(), arc.clone());
    let user = use_case
        .execute(google_identity("sub-1", "ada@example.com"))
        .await
        .unwrap();

    let unlink = UnlinkProviderUseCase::new(arc.clone(), arc.clone());
    let result = unlink.execute(&user.user_id, Provider::Google).await;
    assert!(matches!(result, Err(IdentityError::UnlinkWouldLockout)));
}

#[tokio::test]
async fn test_unlink_allowed_with_password_set() {
    let (repo, config) = setup();
    let user = sign_up(&repo, &config, "ada@example.com").await;

    let arc = Arc::new(repo.clone());
    let oauth = OAuthSignInUseCase::new(arc.clone(), arc.clone(), arc.clone());
    oauth
        .execute(google_identity("sub-1", "ada@example.com"))
        .await
        .unwrap();

    let unlink = UnlinkProviderUseCase::new(arc.clone(), arc.clone());
    unlink.execute(&user.user_id, Provider::Google).await.unwrap();

    let links = LinkedAccountRepository::find_by_user_id(&repo, &user.user_id)
        .await
        .unwrap();
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_unlink_not_linked_provider_rejected() {
    let (repo, config) = setup();
    let user = sign_up(&repo, &config, "ada@example.com").await;

    let arc = Arc::new(repo);
    let unlink = UnlinkProviderUseCase::new(arc.clone(), arc.clone());
    let result = unlink.execute(&user.user_id, Provider::LinkedIn).await;

    assert!(matches!(result, Err(IdentityError::Validation(_))));
}
