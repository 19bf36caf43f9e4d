//! PostgreSQL Registration Repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::entities::{PaymentStatus, Registration, TicketKind};
use crate::domain::repository::RegistrationRepository;
use crate::error::{TicketError, TicketResult};
use kernel::id::{Id, UserId};

/// PostgreSQL-backed registration repository
#[derive(Clone)]
pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RegistrationRepository for PgTicketRepository {
    async fn create(&self, registration: &Registration) -> TicketResult<()> {
        sqlx::query(
            r#"
            INSERT INTO registrations (
                registration_id,
                user_id,
                attendee_name,
                affiliation,
                ticket_kind,
                payment_status,
                amount_cents,
                paid_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(registration.registration_id.as_uuid())
        .bind(registration.user_id.as_uuid())
        .bind(&registration.attendee_name)
        .bind(&registration.affiliation)
        .bind(registration.ticket_kind.as_str())
        .bind(registration.payment_status.as_str())
        .bind(registration.amount_cents)
        .bind(registration.paid_at)
        .bind(registration.created_at)
        .bind(registration.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> TicketResult<Option<Registration>> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT
                registration_id,
                user_id,
                attendee_name,
                affiliation,
                ticket_kind,
                payment_status,
                amount_cents,
                paid_at,
                created_at,
                updated_at
            FROM registrations
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_registration()).transpose()
    }

    async fn update(&self, registration: &Registration) -> TicketResult<()> {
        sqlx::query(
            r#"
            UPDATE registrations SET
                attendee_name = $2,
                affiliation = $3,
                ticket_kind = $4,
                payment_status = $5,
                amount_cents = $6,
                paid_at = $7,
                updated_at = $8
            WHERE registration_id = $1
            "#,
        )
        .bind(registration.registration_id.as_uuid())
        .bind(&registration.attendee_name)
        .bind(&registration.affiliation)
        .bind(registration.ticket_kind.as_str())
        .bind(registration.payment_status.as_str())
        .bind(registration.amount_cents)
        .bind(registration.paid_at)
        .bind(registration.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    registration_id: Uuid,
    user_id: Uuid,
    attendee_name: String,
    affiliation: Option<String>,
    ticket_kind: String,
    payment_status: String,
    amount_cents: i64,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RegistrationRow {
    fn into_registration(self) -> TicketResult<Registration> {
        let ticket_kind = TicketKind::from_str(&self.ticket_kind)
            .map_err(|e| TicketError::Internal(e.to_string()))?;
        let payment_status = PaymentStatus::from_str(&self.payment_status)
            .map_err(|e| TicketError::Internal(e.to_string()))?;

        Ok(Registration {
            registration_id: Id::from_uuid(self.registration_id),
            user_id: Id::from_uuid(self.user_id),
            attendee_name: self.attendee_name,
            affiliation: self.affiliation,
            ticket_kind,
            payment_status,
            amount_cents: self.amount_cents,
            paid_at: self.paid_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
