//! Application Configuration
//!
//! Populated once at startup from named environment variables, validated
//! before use, and handed by value to the components that need it.
//! Nothing reads process environment after this.

use std::env;
use std::net::IpAddr;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose;

use gate::config::GateConfig;
use identity::config::{IdentityConfig, ProviderSettings};

/// Recognized environment variables:
/// - `DATABASE_URL` (required)
/// - `SESSION_SECRET` (base64, 32 bytes; random per-process in debug builds when absent)
/// - `HOST` (default 0.0.0.0), `PORT` (default 8080)
/// - `COOKIE_SECURE` (default true)
/// - `OAUTH_REDIRECT_BASE`, `GOOGLE_CLIENT_ID`/`GOOGLE_CLIENT_SECRET`,
///   `LINKEDIN_CLIENT_ID`/`LINKEDIN_CLIENT_SECRET` (providers optional)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    session_secret: Option<[u8; 32]>,
    cookie_secure: bool,
    oauth_redirect_base: String,
    google: Option<ProviderSettings>,
    linkedin: Option<ProviderSettings>,
}

impl AppConfig {
    /// Read and validate configuration from the environment
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        if database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL must not be empty");
        }

        let host: IpAddr = env::var("HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse()
            .context("HOST must be a valid IP address")?;

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("PORT must be a valid port number")?;

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(b64) => Some(decode_secret(&b64)?),
            // Debug builds fall back to a per-process random secret
            Err(_) if cfg!(debug_assertions) => None,
            Err(_) => anyhow::bail!("SESSION_SECRET must be set in production"),
        };

        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let oauth_redirect_base = env::var("OAUTH_REDIRECT_BASE")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        Ok(Self {
            database_url,
            host,
            port,
            session_secret,
            cookie_secure,
            oauth_redirect_base,
            google: provider_from_env("GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET"),
            linkedin: provider_from_env("LINKEDIN_CLIENT_ID", "LINKEDIN_CLIENT_SECRET"),
        })
    }

    /// Gate configuration derived from the environment
    pub fn gate_config(&self) -> GateConfig {
        let base = match self.session_secret {
            Some(secret) => GateConfig {
                session_secret: secret,
                ..GateConfig::default()
            },
            None => GateConfig::with_random_secret(),
        };

        GateConfig {
            cookie_secure: self.cookie_secure,
            ..base
        }
    }

    /// Identity configuration derived from the environment
    pub fn identity_config(&self) -> IdentityConfig {
        IdentityConfig {
            google: self.google.clone(),
            linkedin: self.linkedin.clone(),
            oauth_redirect_base: self.oauth_redirect_base.clone(),
            ..IdentityConfig::default()
        }
    }
}

fn decode_secret(b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(b64)
        .context("SESSION_SECRET must be valid base64")?;

    let mut secret = [0u8; 32];
    if bytes.len() != secret.len() {
        anyhow::bail!("SESSION_SECRET must decode to exactly 32 bytes");
    }
    secret.copy_from_slice(&bytes);
    Ok(secret)
}

fn provider_from_env(id_var: &str, secret_var: &str) -> Option<ProviderSettings> {
    match (env::var(id_var), env::var(secret_var)) {
        (Ok(client_id), Ok(client_secret)) => Some(ProviderSettings {
            client_id,
            client_secret,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_secret_roundtrip() {
        let b64 = general_purpose::STANDARD.encode([9u8; 32]);
        assert_eq!(decode_secret(&b64).unwrap(), [9u8; 32]);
    }

    #[test]
    fn test_decode_secret_rejects_wrong_length() {
        let b64 = general_purpose::STANDARD.encode([9u8; 16]);
        assert!(decode_secret(&b64).is_err());
        assert!(decode_secret("not base64 at all!").is_err());
    }
}
