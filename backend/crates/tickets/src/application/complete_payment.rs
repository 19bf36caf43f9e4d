//! Complete Payment Use Case
//!
//! Marks a registration paid after the external payment flow reports
//! completion. Idempotent: repeated completion callbacks are absorbed.

use std::sync::Arc;

use crate::domain::entities::Registration;
use crate::domain::repository::RegistrationRepository;
use crate::error::{TicketError, TicketResult};
use kernel::id::UserId;

/// Complete payment use case
pub struct CompletePaymentUseCase<R>
where
    R: RegistrationRepository,
{
    repo: Arc<R>,
}

impl<R> CompletePaymentUseCase<R>
where
    R: RegistrationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> TicketResult<Registration> {
        let mut registration = self
            .repo
            .find_by_user_id(user_id)
            .await?
            .ok_or(TicketError::NotRegistered)?;

        if registration.mark_paid() {
            self.repo.update(&registration).await?;

            tracing::info!(
                registration_id = %registration.registration_id,
                amount_cents = registration.amount_cents,
                "Payment completed"
            );
        }

        Ok(registration)
    }
}
