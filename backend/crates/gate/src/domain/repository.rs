//! Repository Traits
//!
//! Interface for session persistence. Implementations are in the
//! infrastructure layer.

use crate::domain::session::Session;
use crate::error::GateResult;
use uuid::Uuid;

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Persist a new session
    async fn create(&self, session: &Session) -> GateResult<()>;

    /// Find a session by ID
    async fn find_by_id(&self, session_id: Uuid) -> GateResult<Option<Session>>;

    /// Update a session (principal, return-to, activity)
    async fn update(&self, session: &Session) -> GateResult<()>;

    /// Delete a session
    async fn delete(&self, session_id: Uuid) -> GateResult<()>;

    /// Remove expired sessions, returning how many were deleted
    async fn cleanup_expired(&self) -> GateResult<u64>;
}
