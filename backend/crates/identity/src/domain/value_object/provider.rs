//! Provider Value Object
//!
//! The external identity providers this portal can sign in with.

use kernel::error::app_error::{AppError, AppResult};
use std::str::FromStr;

/// Supported OAuth identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Google,
    LinkedIn,
}

impl Provider {
    /// Stable lowercase identifier, used in paths and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::LinkedIn => "linkedin",
        }
    }

    /// Human-readable name for rendered pages
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::LinkedIn => "LinkedIn",
        }
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s {
            "google" => Ok(Provider::Google),
            "linkedin" => Ok(Provider::LinkedIn),
            other => Err(AppError::not_found(format!(
                "Unknown sign-in provider: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_providers() {
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Google);
        assert_eq!("linkedin".parse::<Provider>().unwrap(), Provider::LinkedIn);
    }

    #[test]
    fn test_parse_unknown_provider() {
        assert!("facebook".parse::<Provider>().is_err());
        assert!("Google".parse::<Provider>().is_err());
    }
}
