//! Session Entity
//!
//! Server-side session record keyed by a cookie-carried signed token.
//! Stores the authenticated principal (if any), the per-session CSRF
//! token, and the return-to path captured for post-login redirects.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use uuid::Uuid;

/// Authenticated identity attached to a session
///
/// The gate treats this as present/absent only; resolving the identity
/// to a full user record is the identity domain's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
}

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4), referenced by the signed cookie token
    pub session_id: Uuid,
    /// Authenticated principal, absent for anonymous sessions
    pub principal: Option<Principal>,
    /// Per-session CSRF token (URL-safe base64)
    pub csrf_token: String,
    /// Path to redirect to after the next successful login
    pub return_to: Option<String>,
    /// Outstanding OAuth state parameter, if a provider round-trip is in flight
    pub oauth_state: Option<String>,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Client IP (optional, for logging)
    pub client_ip: Option<String>,
    /// User agent string (optional, for logging)
    pub user_agent: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp
    pub last_activity_at: DateTime<Utc>,
}

impl Session {
    /// Create a new anonymous session
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(
        csrf_token: String,
        client_ip: Option<String>,
        user_agent: Option<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            principal: None,
            csrf_token,
            return_to: None,
            oauth_state: None,
            expires_at_ms: (now + ttl).timestamp_millis(),
            client_ip,
            user_agent,
            created_at: now,
            last_activity_at: now,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    /// Attach an authenticated principal
    pub fn sign_in(&mut self, principal: Principal) {
        self.principal = Some(principal);
    }

    /// Detach the principal, ending the authenticated state
    pub fn sign_out(&mut self) {
        self.principal = None;
    }

    /// Expire the session immediately (explicit logout)
    pub fn expire_now(&mut self) {
        self.expires_at_ms = Utc::now().timestamp_millis() - 1;
    }

    /// Whether a principal is attached
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Remember a path to return to after login
    pub fn remember_return_to(&mut self, path: impl Into<String>) {
        self.return_to = Some(path.into());
    }

    /// Consume the stored return-to path (read once, then cleared)
    pub fn take_return_to(&mut self) -> Option<String> {
        self.return_to.take()
    }

    /// Record an outstanding OAuth state parameter
    pub fn set_oauth_state(&mut self, state: impl Into<String>) {
        self.oauth_state = Some(state.into());
    }

    /// Consume the outstanding OAuth state parameter
    pub fn take_oauth_state(&mut self) -> Option<String> {
        self.oauth_state.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::Id;

    fn session() -> Session {
        Session::new("csrf".to_string(), None, None, Duration::minutes(30))
    }

    #[test]
    fn test_new_session_is_anonymous_and_live() {
        let session = session();
        assert!(!session.is_authenticated());
        assert!(!session.is_expired());
        assert!(session.return_to.is_none());
    }

    #[test]
    fn test_sign_in_and_out() {
        let mut session = session();
        session.sign_in(Principal { user_id: Id::new() });
        assert!(session.is_authenticated());

        session.sign_out();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_take_return_to_consumes() {
        let mut session = session();
        session.remember_return_to("/account");

        assert_eq!(session.take_return_to().as_deref(), Some("/account"));
        assert_eq!(session.take_return_to(), None);
    }

    #[test]
    fn test_expired_session() {
        let mut session = session();
        session.expires_at_ms = Utc::now().timestamp_millis() - 1;
        assert!(session.is_expired());
    }
}
