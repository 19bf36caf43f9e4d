//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::entity::{
    credential::Credential, linked_account::LinkedAccount, user::User,
};
use crate::domain::repository::{CredentialRepository, LinkedAccountRepository, UserRepository};
use crate::domain::value_object::{email::Email, provider::Provider, public_id::PublicId};
use crate::error::{IdentityError, IdentityResult};
use kernel::id::Id;
use platform::password::HashedPassword;

/// PostgreSQL-backed identity repository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgIdentityRepository {
    async fn create(&self, user: &User) -> IdentityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                public_id,
                email,
                display_name,
                location,
                website,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.public_id.as_str())
        .bind(user.email.as_str())
        .bind(&user.display_name)
        .bind(&user.location)
        .bind(&user.website)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &kernel::id::UserId) -> IdentityResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                public_id,
                email,
                display_name,
                location,
                website,
                last_login_at,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> IdentityResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                public_id,
                email,
                display_name,
                location,
                website,
                last_login_at,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> IdentityResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> IdentityResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                display_name = $3,
                location = $4,
                website = $5,
                last_login_at = $6,
                updated_at = $7
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.display_name)
        .bind(&user.location)
        .bind(&user.website)
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgIdentityRepository {
    async fn create(&self, credential: &Credential) -> IdentityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO credentials (
                user_id,
                password_hash,
                reset_token_hash,
                reset_expires_at,
                login_failed_count,
                last_failed_at,
                locked_until,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(credential.user_id.as_uuid())
        .bind(credential.password_hash.as_ref().map(|h| h.as_str()))
        .bind(&credential.reset_token_hash)
        .bind(credential.reset_expires_at)
        .bind(credential.login_failed_count as i16)
        .bind(credential.last_failed_at)
        .bind(credential.locked_until)
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_user_id(
        &self,
        user_id: &kernel::id::UserId,
    ) -> IdentityResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                user_id,
                password_hash,
                reset_token_hash,
                reset_expires_at,
                login_failed_count,
                last_failed_at,
                locked_until,
                created_at,
                updated_at
            FROM credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_credential()))
    }

    async fn find_by_reset_token_hash(
        &self,
        token_hash: &[u8],
    ) -> IdentityResult<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT
                user_id,
                password_hash,
                reset_token_hash,
                reset_expires_at,
                login_failed_count,
                last_failed_at,
                locked_until,
                created_at,
                updated_at
            FROM credentials
            WHERE reset_token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_credential()))
    }

    async fn update(&self, credential: &Credential) -> IdentityResult<()> {
        sqlx::query(
            r#"
            UPDATE credentials SET
                password_hash = $2,
                reset_token_hash = $3,
                reset_expires_at = $4,
                login_failed_count = $5,
                last_failed_at = $6,
                locked_until = $7,
                updated_at = $8
            WHERE user_id = $1
            "#,
        )
        .bind(credential.user_id.as_uuid())
        .bind(credential.password_hash.as_ref().map(|h| h.as_str()))
        .bind(&credential.reset_token_hash)
        .bind(credential.reset_expires_at)
        .bind(credential.login_failed_count as i16)
        .bind(credential.last_failed_at)
        .bind(credential.locked_until)
        .bind(credential.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Linked Account Repository Implementation
// ============================================================================

impl LinkedAccountRepository for PgIdentityRepository {
    async fn link(&self, account: &LinkedAccount) -> IdentityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO linked_accounts (
                user_id,
                provider,
                subject,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(account.user_id.as_uuid())
        .bind(account.provider.as_str())
        .bind(&account.subject)
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_provider_subject(
        &self,
        provider: Provider,
        subject: &str,
    ) -> IdentityResult<Option<LinkedAccount>> {
        let row = sqlx::query_as::<_, LinkedAccountRow>(
            r#"
            SELECT
                user_id,
                provider,
                subject,
                created_at
            FROM linked_accounts
            WHERE provider = $1 AND subject = $2
            "#,
        )
        .bind(provider.as_str())
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_linked_account()).transpose()
    }

    async fn find_by_user_id(
        &self,
        user_id: &kernel::id::UserId,
    ) -> IdentityResult<Vec<LinkedAccount>> {
        let rows = sqlx::query_as::<_, LinkedAccountRow>(
            r#"
            SELECT
                user_id,
                provider,
                subject,
                created_at
            FROM linked_accounts
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_linked_account()).collect()
    }

    async fn unlink(&self, user_id: &kernel::id::UserId, provider: Provider) -> IdentityResult<()> {
        sqlx::query("DELETE FROM linked_accounts WHERE user_id = $1 AND provider = $2")
            .bind(user_id.as_uuid())
            .bind(provider.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    public_id: String,
    email: String,
    display_name: Option<String>,
    location: Option<String>,
    website: Option<String>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> IdentityResult<User> {
        let public_id = PublicId::parse_str(&self.public_id)
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        Ok(User {
            user_id: Id::from_uuid(self.user_id),
            public_id,
            email: Email::from_db(self.email),
            display_name: self.display_name,
            location: self.location,
            website: self.website,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    user_id: Uuid,
    password_hash: Option<String>,
    reset_token_hash: Option<Vec<u8>>,
    reset_expires_at: Option<DateTime<Utc>>,
    login_failed_count: i16,
    last_failed_at: Option<DateTime<Utc>>,
    locked_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> Credential {
        Credential {
            user_id: Id::from_uuid(self.user_id),
            password_hash: self.password_hash.map(HashedPassword::from_db),
            reset_token_hash: self.reset_token_hash,
            reset_expires_at: self.reset_expires_at,
            login_failed_count: self.login_failed_count.max(0) as u32,
            last_failed_at: self.last_failed_at,
            locked_until: self.locked_until,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LinkedAccountRow {
    user_id: Uuid,
    provider: String,
    subject: String,
    created_at: DateTime<Utc>,
}

impl LinkedAccountRow {
    fn into_linked_account(self) -> IdentityResult<LinkedAccount> {
        let provider = Provider::from_str(&self.provider)
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        Ok(LinkedAccount {
            user_id: Id::from_uuid(self.user_id),
            provider,
            subject: self.subject,
            created_at: self.created_at,
        })
    }
}
