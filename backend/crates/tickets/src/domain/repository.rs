//! Repository Traits

use crate::domain::entities::Registration;
use crate::error::TicketResult;
use kernel::id::UserId;

/// Registration repository trait
#[trait_variant::make(RegistrationRepository: Send)]
pub trait LocalRegistrationRepository {
    /// Persist a new registration
    async fn create(&self, registration: &Registration) -> TicketResult<()>;

    /// Find a user's registration (one per user)
    async fn find_by_user_id(&self, user_id: &UserId) -> TicketResult<Option<Registration>>;

    /// Update a registration
    async fn update(&self, registration: &Registration) -> TicketResult<()>;
}
