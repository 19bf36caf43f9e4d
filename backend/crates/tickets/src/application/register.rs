//! Register Use Case
//!
//! Creates a user's registration; one per user.

use std::sync::Arc;

use crate::application::config::TicketConfig;
use crate::domain::entities::{Registration, TicketKind};
use crate::domain::repository::RegistrationRepository;
use crate::error::{TicketError, TicketResult};
use kernel::id::UserId;

/// Registration form contents after validation
pub struct RegistrationDetails {
    pub attendee_name: String,
    pub affiliation: Option<String>,
    pub ticket_kind: TicketKind,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: RegistrationRepository,
{
    repo: Arc<R>,
    config: Arc<TicketConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: RegistrationRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<TicketConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        details: RegistrationDetails,
    ) -> TicketResult<Registration> {
        let attendee_name = details.attendee_name.trim().to_string();
        if attendee_name.is_empty() {
            return Err(TicketError::Validation(
                "Attendee name cannot be empty".to_string(),
            ));
        }

        if self.repo.find_by_user_id(user_id).await?.is_some() {
            return Err(TicketError::AlreadyRegistered);
        }

        let registration = Registration::new(
            *user_id,
            attendee_name,
            details.affiliation,
            details.ticket_kind,
            self.config.price_for(details.ticket_kind),
        );

        self.repo.create(&registration).await?;

        tracing::info!(
            registration_id = %registration.registration_id,
            ticket_kind = %registration.ticket_kind,
            "Registration created"
        );

        Ok(registration)
    }
}
