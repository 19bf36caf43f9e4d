//! Update Ticket Use Case
//!
//! Edits an existing registration. Attendee details can change at any
//! time; the ticket kind (and price) only while payment is pending.

use std::sync::Arc;

use crate::application::config::TicketConfig;
use crate::application::register::RegistrationDetails;
use crate::domain::entities::Registration;
use crate::domain::repository::RegistrationRepository;
use crate::error::{TicketError, TicketResult};
use kernel::id::UserId;

/// Update ticket use case
pub struct UpdateTicketUseCase<R>
where
    R: RegistrationRepository,
{
    repo: Arc<R>,
    config: Arc<TicketConfig>,
}

impl<R> UpdateTicketUseCase<R>
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

        let mut registration = self
            .repo
            .find_by_user_id(user_id)
            .await?
            .ok_or(TicketError::NotRegistered)?;

        if details.ticket_kind != registration.ticket_kind {
            if registration.is_paid() {
                return Err(TicketError::PaymentAlreadyCompleted);
            }
            registration.change_kind(
                details.ticket_kind,
                self.config.price_for(details.ticket_kind),
            );
        }

        registration.update_details(attendee_name, details.affiliation);
        self.repo.update(&registration).await?;

        Ok(registration)
    }
}
