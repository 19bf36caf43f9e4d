//! Application Configuration
//!
//! Configuration for the identity application layer.

use std::time::Duration;

use crate::domain::value_object::provider::Provider;

/// OAuth client credentials for one provider
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub client_id: String,
    pub client_secret: String,
}

/// Identity application configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Google OAuth credentials (provider disabled when None)
    pub google: Option<ProviderSettings>,
    /// LinkedIn OAuth credentials (provider disabled when None)
    pub linkedin: Option<ProviderSettings>,
    /// Public base URL providers redirect back to (no trailing slash)
    pub oauth_redirect_base: String,
    /// How long a password reset token stays valid
    pub reset_token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            google: None,
            linkedin: None,
            oauth_redirect_base: "http://localhost:8080".to_string(),
            reset_token_ttl: Duration::from_secs(3600), // 1 hour
            password_pepper: None,
        }
    }
}

impl IdentityConfig {
    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Settings for a provider, if configured
    pub fn provider_settings(&self, provider: Provider) -> Option<&ProviderSettings> {
        match provider {
            Provider::Google => self.google.as_ref(),
            Provider::LinkedIn => self.linkedin.as_ref(),
        }
    }

    /// The callback URI registered with a provider
    pub fn redirect_uri(&self, provider: Provider) -> String {
        format!(
            "{}/auth/{}/callback",
            self.oauth_redirect_base,
            provider.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_uri() {
        let config = IdentityConfig {
            oauth_redirect_base: "https://portal.example.com".to_string(),
            ..Default::default()
        };

        assert_eq!(
            config.redirect_uri(Provider::Google),
            "https://portal.example.com/auth/google/callback"
        );
        assert_eq!(
            config.redirect_uri(Provider::LinkedIn),
            "https://portal.example.com/auth/linkedin/callback"
        );
    }

    #[test]
    fn test_provider_settings_lookup() {
        let config = IdentityConfig {
            google: Some(ProviderSettings {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            }),
            ..Default::default()
        };

        assert!(config.provider_settings(Provider::Google).is_some());
        assert!(config.provider_settings(Provider::LinkedIn).is_none());
    }
}
