//! Linked Account Entity
//!
//! Connects a user to an external identity provider account.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::provider::Provider;

/// Linked provider account
#[derive(Debug, Clone)]
pub struct LinkedAccount {
    /// Owning user
    pub user_id: UserId,
    /// Identity provider
    pub provider: Provider,
    /// Provider-side stable subject identifier
    pub subject: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl LinkedAccount {
    pub fn new(user_id: UserId, provider: Provider, subject: impl Into<String>) -> Self {
        Self {
            user_id,
            provider,
            subject: subject.into(),
            created_at: Utc::now(),
        }
    }
}
