//! PostgreSQL Session Repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repository::SessionRepository;
use crate::domain::session::{Principal, Session};
use crate::error::GateResult;
use kernel::id::Id;

/// PostgreSQL-backed session repository
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SessionRepository for PgSessionRepository {
    async fn create(&self, session: &Session) -> GateResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                principal_user_id,
                csrf_token,
                return_to,
                oauth_state,
                expires_at_ms,
                client_ip,
                user_agent,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(session.session_id)
        .bind(session.principal.map(|p| *p.user_id.as_uuid()))
        .bind(&session.csrf_token)
        .bind(&session.return_to)
        .bind(&session.oauth_state)
        .bind(session.expires_at_ms)
        .bind(&session.client_ip)
        .bind(&session.user_agent)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> GateResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                principal_user_id,
                csrf_token,
                return_to,
                oauth_state,
                expires_at_ms,
                client_ip,
                user_agent,
                created_at,
                last_activity_at
            FROM sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_session()))
    }

    async fn update(&self, session: &Session) -> GateResult<()> {
        sqlx::query(
            r#"
            UPDATE sessions SET
                principal_user_id = $2,
                csrf_token = $3,
                return_to = $4,
                oauth_state = $5,
                expires_at_ms = $6,
                last_activity_at = $7
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id)
        .bind(session.principal.map(|p| *p.user_id.as_uuid()))
        .bind(&session.csrf_token)
        .bind(&session.return_to)
        .bind(&session.oauth_state)
        .bind(session.expires_at_ms)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> GateResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> GateResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    principal_user_id: Option<Uuid>,
    csrf_token: String,
    return_to: Option<String>,
    oauth_state: Option<String>,
    expires_at_ms: i64,
    client_ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: self.session_id,
            principal: self.principal_user_id.map(|user_id| Principal {
                user_id: Id::from_uuid(user_id),
            }),
            csrf_token: self.csrf_token,
            return_to: self.return_to,
            oauth_state: self.oauth_state,
            expires_at_ms: self.expires_at_ms,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        }
    }
}
