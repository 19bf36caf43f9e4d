//! Application Configuration
//!
//! Configuration for the Request Gate.

use std::time::Duration;

use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Fixed security response headers
///
/// HSTS, frame options and XSS protection are always sent. CSP,
/// referrer policy and nosniff exist as switches and default to off so
/// enabling them is an explicit configuration change.
#[derive(Debug, Clone)]
pub struct SecurityHeadersConfig {
    /// Strict-Transport-Security max-age (seconds)
    pub hsts_max_age_secs: u64,
    /// Include subdomains in the HSTS policy
    pub hsts_include_subdomains: bool,
    /// Request HSTS preload-list inclusion
    pub hsts_preload: bool,
    /// X-Frame-Options value
    pub frame_options: String,
    /// Send X-XSS-Protection: 1; mode=block
    pub xss_protection: bool,
    /// Content-Security-Policy value (off when None)
    pub content_security_policy: Option<String>,
    /// Referrer-Policy value (off when None)
    pub referrer_policy: Option<String>,
    /// Send X-Content-Type-Options: nosniff
    pub nosniff: bool,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            hsts_max_age_secs: 31_536_000, // one year
            hsts_include_subdomains: true,
            hsts_preload: true,
            frame_options: "SAMEORIGIN".to_string(),
            xss_protection: true,
            content_security_policy: None,
            referrer_policy: None,
            nosniff: false,
        }
    }
}

impl SecurityHeadersConfig {
    /// Strict-Transport-Security header value
    pub fn hsts_value(&self) -> String {
        let mut value = format!("max-age={}", self.hsts_max_age_secs);
        if self.hsts_include_subdomains {
            value.push_str("; includeSubDomains");
        }
        if self.hsts_preload {
            value.push_str("; preload");
        }
        value
    }
}

/// Request Gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session TTL (fixed short expiry window)
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// The single path exempt from CSRF validation
    pub csrf_exempt_path: String,
    /// Login page path (guard redirect target, return-to exclusion)
    pub login_path: String,
    /// Signup page path (return-to exclusion)
    pub signup_path: String,
    /// Account page path (authenticated return-to branch)
    pub account_path: String,
    /// OAuth route prefix (return-to exclusion)
    pub auth_prefix: String,
    /// Security response headers
    pub headers: SecurityHeadersConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "sid".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(30 * 60), // 30 minutes
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            csrf_exempt_path: "/api/upload".to_string(),
            login_path: "/login".to_string(),
            signup_path: "/signup".to_string(),
            account_path: "/account".to_string(),
            auth_prefix: "/auth".to_string(),
            headers: SecurityHeadersConfig::default(),
        }
    }
}

impl GateConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get session TTL in milliseconds
    pub fn session_ttl_ms(&self) -> i64 {
        self.session_ttl.as_millis() as i64
    }

    /// Cookie attributes for the session cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
        }
    }
}
