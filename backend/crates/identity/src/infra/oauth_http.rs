//! HTTP Provider Gateway
//!
//! Implements the two-step provider exchange over HTTPS:
//! authorization code -> access token -> userinfo profile.

use std::sync::Arc;

use serde::Deserialize;

use crate::application::config::IdentityConfig;
use crate::application::oauth::{ProviderGateway, ProviderIdentity};
use crate::domain::value_object::provider::Provider;
use crate::error::{IdentityError, IdentityResult};

const GOOGLE_AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

const LINKEDIN_AUTHORIZE_ENDPOINT: &str = "https://www.linkedin.com/oauth/v2/authorization";
const LINKEDIN_TOKEN_ENDPOINT: &str = "https://www.linkedin.com/oauth/v2/accessToken";
const LINKEDIN_USERINFO_ENDPOINT: &str = "https://api.linkedin.com/v2/userinfo";

/// reqwest-backed provider gateway
#[derive(Clone)]
pub struct HttpProviderGateway {
    http: reqwest::Client,
    config: Arc<IdentityConfig>,
}

impl HttpProviderGateway {
    pub fn new(config: Arc<IdentityConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoints(provider: Provider) -> (&'static str, &'static str, &'static str) {
        match provider {
            Provider::Google => (
                GOOGLE_AUTHORIZE_ENDPOINT,
                GOOGLE_TOKEN_ENDPOINT,
                GOOGLE_USERINFO_ENDPOINT,
            ),
            Provider::LinkedIn => (
                LINKEDIN_AUTHORIZE_ENDPOINT,
                LINKEDIN_TOKEN_ENDPOINT,
                LINKEDIN_USERINFO_ENDPOINT,
            ),
        }
    }
}

impl ProviderGateway for HttpProviderGateway {
    fn authorize_url(&self, provider: Provider, state: &str) -> IdentityResult<String> {
        let settings = self
            .config
            .provider_settings(provider)
            .ok_or(IdentityError::ProviderNotConfigured)?;

        let (authorize_endpoint, _, _) = Self::endpoints(provider);

        let url = reqwest::Url::parse_with_params(
            authorize_endpoint,
            &[
                ("response_type", "code"),
                ("client_id", settings.client_id.as_str()),
                (
                    "redirect_uri",
                    self.config.redirect_uri(provider).as_str(),
                ),
                ("scope", "openid profile email"),
                ("state", state),
            ],
        )
        .map_err(|e| IdentityError::Internal(format!("Invalid authorize URL: {e}")))?;

        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        provider: Provider,
        code: &str,
    ) -> IdentityResult<ProviderIdentity> {
        let settings = self
            .config
            .provider_settings(provider)
            .ok_or(IdentityError::ProviderNotConfigured)?;

        let (_, token_endpoint, userinfo_endpoint) = Self::endpoints(provider);

        let token: TokenResponse = self
            .http
            .post(token_endpoint)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", settings.client_id.as_str()),
                ("client_secret", settings.client_secret.as_str()),
                (
                    "redirect_uri",
                    self.config.redirect_uri(provider).as_str(),
                ),
            ])
            .send()
            .await
            .map_err(|e| IdentityError::ProviderExchangeFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| IdentityError::ProviderExchangeFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| IdentityError::ProviderExchangeFailed(e.to_string()))?;

        let profile: UserInfoResponse = self
            .http
            .get(userinfo_endpoint)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| IdentityError::ProviderExchangeFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| IdentityError::ProviderExchangeFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| IdentityError::ProviderExchangeFailed(e.to_string()))?;

        Ok(ProviderIdentity {
            provider,
            subject: profile.sub,
            email: profile.email,
            display_name: profile.name,
        })
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OpenID Connect userinfo (both providers expose this shape)
#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    sub: String,
    email: Option<String>,
    name: Option<String>,
}
