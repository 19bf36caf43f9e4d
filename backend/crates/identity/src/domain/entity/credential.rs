//! Credential Entity
//!
//! Sensitive authentication data for a user: optional password hash
//! (OAuth-only accounts have none), failed-login lockout state, and the
//! outstanding password-reset token hash.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

/// Failed attempts before a temporary lock
pub const LOCKOUT_THRESHOLD: u32 = 5;
/// How long a lockout lasts
pub const LOCKOUT_MINUTES: i64 = 15;

/// Credential entity
#[derive(Debug, Clone)]
pub struct Credential {
    /// Owning user
    pub user_id: UserId,
    /// Argon2id password hash; None for OAuth-only accounts
    pub password_hash: Option<HashedPassword>,
    /// SHA-256 hash of the outstanding reset token
    pub reset_token_hash: Option<Vec<u8>>,
    /// When the outstanding reset token expires
    pub reset_expires_at: Option<DateTime<Utc>>,
    /// Consecutive failed login attempts
    pub login_failed_count: u32,
    /// Last failed attempt time
    pub last_failed_at: Option<DateTime<Utc>>,
    /// Locked until this time, if a lockout is active
    pub locked_until: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Create credentials for a user
    pub fn new(user_id: UserId, password_hash: Option<HashedPassword>) -> Self {
        let now = Utc::now();

        Self {
            user_id,
            password_hash,
            reset_token_hash: None,
            reset_expires_at: None,
            login_failed_count: 0,
            last_failed_at: None,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a password is set (false for OAuth-only accounts)
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Whether a lockout is currently active
    pub fn is_locked(&self) -> bool {
        matches!(self.locked_until, Some(until) if until > Utc::now())
    }

    /// Record a failed login attempt, locking at the threshold
    pub fn record_failure(&mut self) {
        let now = Utc::now();
        self.login_failed_count += 1;
        self.last_failed_at = Some(now);

        if self.login_failed_count >= LOCKOUT_THRESHOLD {
            self.locked_until = Some(now + Duration::minutes(LOCKOUT_MINUTES));
        }
        self.updated_at = now;
    }

    /// Reset the failure counter after a successful login
    pub fn reset_failures(&mut self) {
        self.login_failed_count = 0;
        self.last_failed_at = None;
        self.locked_until = None;
        self.updated_at = Utc::now();
    }

    /// Set a new password, invalidating any outstanding reset token
    pub fn set_password(&mut self, hash: HashedPassword) {
        self.password_hash = Some(hash);
        self.clear_reset();
    }

    /// Record an outstanding reset token (hash only) with a TTL
    pub fn begin_reset(&mut self, token_hash: Vec<u8>, ttl: Duration) {
        let now = Utc::now();
        self.reset_token_hash = Some(token_hash);
        self.reset_expires_at = Some(now + ttl);
        self.updated_at = now;
    }

    /// Drop the outstanding reset token
    pub fn clear_reset(&mut self) {
        self.reset_token_hash = None;
        self.reset_expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Whether the outstanding reset token is still usable
    pub fn reset_token_valid(&self) -> bool {
        match (&self.reset_token_hash, self.reset_expires_at) {
            (Some(_), Some(expires)) => expires > Utc::now(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        Credential::new(UserId::new(), None)
    }

    #[test]
    fn test_lockout_after_threshold() {
        let mut credential = credential();

        for _ in 0..LOCKOUT_THRESHOLD - 1 {
            credential.record_failure();
            assert!(!credential.is_locked());
        }

        credential.record_failure();
        assert!(credential.is_locked());

        credential.reset_failures();
        assert!(!credential.is_locked());
        assert_eq!(credential.login_failed_count, 0);
    }

    #[test]
    fn test_reset_token_lifecycle() {
        let mut credential = credential();
        assert!(!credential.reset_token_valid());

        credential.begin_reset(vec![1, 2, 3], Duration::hours(1));
        assert!(credential.reset_token_valid());

        credential.clear_reset();
        assert!(!credential.reset_token_valid());
    }

    #[test]
    fn test_expired_reset_token() {
        let mut credential = credential();
        credential.begin_reset(vec![1, 2, 3], Duration::hours(1));
        credential.reset_expires_at = Some(Utc::now() - Duration::seconds(1));

        assert!(!credential.reset_token_valid());
    }
}
