//! Establish Session Use Case
//!
//! Loads the session referenced by the request cookie, or creates a new
//! anonymous session when the cookie is absent, invalid or expired.

use std::net::IpAddr;
use std::sync::Arc;

use crate::application::config::GateConfig;
use crate::application::token::{mint_session_token, parse_session_token};
use crate::domain::repository::SessionRepository;
use crate::domain::session::Session;
use crate::error::{GateError, GateResult};

/// Number of random bytes behind each CSRF token
const CSRF_TOKEN_BYTES: usize = 32;

/// Result of establishing a session for a request
pub struct EstablishedSession {
    pub session: Session,
    /// Signed cookie token referencing the session
    pub token: String,
    /// True when a new session (and cookie) was created for this request
    pub is_new: bool,
}

/// Establish session use case
pub struct EstablishSessionUseCase<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    repo: Arc<S>,
    config: Arc<GateConfig>,
}

impl<S> EstablishSessionUseCase<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<S>, config: Arc<GateConfig>) -> Self {
        Self { repo, config }
    }

    /// Load the cookie's session or create a fresh anonymous one
    pub async fn establish(
        &self,
        cookie_token: Option<&str>,
        client_ip: Option<IpAddr>,
        user_agent: Option<String>,
    ) -> GateResult<EstablishedSession> {
        if let Some(token) = cookie_token {
            if let Ok(session_id) = parse_session_token(token, &self.config.session_secret) {
                if let Some(mut session) = self.repo.find_by_id(session_id).await? {
                    if session.is_expired() {
                        self.repo.delete(session_id).await?;
                    } else {
                        session.touch();
                        return Ok(EstablishedSession {
                            session,
                            token: token.to_string(),
                            is_new: false,
                        });
                    }
                }
            }
        }

        let csrf_token = platform::crypto::random_token(CSRF_TOKEN_BYTES);
        let ttl = chrono::Duration::from_std(self.config.session_ttl)
            .map_err(|e| GateError::Internal(format!("Invalid session TTL: {e}")))?;

        let session = Session::new(
            csrf_token,
            client_ip.map(|ip| ip.to_string()),
            user_agent,
            ttl,
        );

        self.repo.create(&session).await?;

        let token = mint_session_token(session.session_id, &self.config.session_secret);

        tracing::debug!(session_id = %session.session_id, "Created anonymous session");

        Ok(EstablishedSession {
            session,
            token,
            is_new: true,
        })
    }
}
