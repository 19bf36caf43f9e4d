//! In-Memory Registration Repository
//!
//! HashMap-backed store for use-case and pipeline tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::domain::entities::Registration;
use crate::domain::repository::RegistrationRepository;
use crate::error::TicketResult;
use kernel::id::UserId;

/// In-memory registration repository
#[derive(Clone, Default)]
pub struct MemoryTicketRepository {
    registrations: Arc<Mutex<HashMap<Uuid, Registration>>>,
}

impl MemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegistrationRepository for MemoryTicketRepository {
    async fn create(&self, registration: &Registration) -> TicketResult<()> {
        self.registrations
            .lock()
            .expect("registration store lock")
            .insert(*registration.user_id.as_uuid(), registration.clone());
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> TicketResult<Option<Registration>> {
        Ok(self
            .registrations
            .lock()
            .expect("registration store lock")
            .get(user_id.as_uuid())
            .cloned())
    }

    async fn update(&self, registration: &Registration) -> TicketResult<()> {
        self.registrations
            .lock()
            .expect("registration store lock")
            .insert(*registration.user_id.as_uuid(), registration.clone());
        Ok(())
    }
}
