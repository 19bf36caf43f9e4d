//! In-Memory Identity Repository
//!
//! HashMap-backed store for use-case and pipeline tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::domain::entity::{
    credential::Credential, linked_account::LinkedAccount, user::User,
};
use crate::domain::repository::{CredentialRepository, LinkedAccountRepository, UserRepository};
use crate::domain::value_object::{email::Email, provider::Provider};
use crate::error::IdentityResult;
use kernel::id::UserId;

/// In-memory identity repository
#[derive(Clone, Default)]
pub struct MemoryIdentityRepository {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    credentials: Arc<Mutex<HashMap<Uuid, Credential>>>,
    links: Arc<Mutex<Vec<LinkedAccount>>>,
}

impl MemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryIdentityRepository {
    async fn create(&self, user: &User) -> IdentityResult<()> {
        self.users
            .lock()
            .expect("user store lock")
            .insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> IdentityResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .expect("user store lock")
            .get(user_id.as_uuid())
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> IdentityResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .expect("user store lock")
            .values()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> IdentityResult<bool> {
        Ok(self
            .users
            .lock()
            .expect("user store lock")
            .values()
            .any(|user| user.email == *email))
    }

    async fn update(&self, user: &User) -> IdentityResult<()> {
        self.users
            .lock()
            .expect("user store lock")
            .insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }
}

impl CredentialRepository for MemoryIdentityRepository {
    async fn create(&self, credential: &Credential) -> IdentityResult<()> {
        self.credentials
            .lock()
            .expect("credential store lock")
            .insert(*credential.user_id.as_uuid(), credential.clone());
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> IdentityResult<Option<Credential>> {
        Ok(self
            .credentials
            .lock()
            .expect("credential store lock")
            .get(user_id.as_uuid())
            .cloned())
    }

    async fn find_by_reset_token_hash(
        &self,
        token_hash: &[u8],
    ) -> IdentityResult<Option<Credential>> {
        Ok(self
            .credentials
            .lock()
            .expect("credential store lock")
            .values()
            .find(|credential| credential.reset_token_hash.as_deref() == Some(token_hash))
            .cloned())
    }

    async fn update(&self, credential: &Credential) -> IdentityResult<()> {
        self.credentials
            .lock()
            .expect("credential store lock")
            .insert(*credential.user_id.as_uuid(), credential.clone());
        Ok(())
    }
}

impl LinkedAccountRepository for MemoryIdentityRepository {
    async fn link(&self, account: &LinkedAccount) -> IdentityResult<()> {
        self.links
            .lock()
            .expect("link store lock")
            .push(account.clone());
        Ok(())
    }

    async fn find_by_provider_subject(
        &self,
        provider: Provider,
        subject: &str,
    ) -> IdentityResult<Option<LinkedAccount>> {
        Ok(self
            .links
            .lock()
            .expect("link store lock")
            .iter()
            .find(|link| link.provider == provider && link.subject == subject)
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> IdentityResult<Vec<LinkedAccount>> {
        Ok(self
            .links
            .lock()
            .expect("link store lock")
            .iter()
            .filter(|link| link.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn unlink(&self, user_id: &UserId, provider: Provider) -> IdentityResult<()> {
        self.links
            .lock()
            .expect("link store lock")
            .retain(|link| !(link.user_id == *user_id && link.provider == provider));
        Ok(())
    }
}
