//! Password Hashing Infrastructure
//!
//! Argon2id password handling per NIST SP 800-63B:
//! - Unicode NFKC normalization before hashing
//! - Length policy (8..=128 characters)
//! - Automatic memory zeroization of clear text
//! - Optional application-wide pepper

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum password length (NIST SP 800-63B)
pub const PASSWORD_MIN_LENGTH: usize = 8;
/// Maximum password length (bounds hashing cost)
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Policy violation for a submitted password
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    #[error("Password cannot be empty")]
    EmptyOrWhitespace,

    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password contains invalid characters")]
    InvalidCharacter,
}

/// Failure while hashing or verifying
#[derive(Debug, thiserror::Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Clear-text password from user input
///
/// NFKC-normalized and policy-checked on construction. The underlying
/// buffer is zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl std::fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ClearTextPassword").field(&"<redacted>").finish()
    }
}

impl ClearTextPassword {
    /// Validate and normalize a submitted password
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // NFKC so visually-identical input hashes identically across platforms
        let normalized: String = raw.nfkc().collect();

        let char_count = normalized.chars().count();
        if char_count < PASSWORD_MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: PASSWORD_MIN_LENGTH,
                actual: char_count,
            });
        }
        if char_count > PASSWORD_MAX_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: PASSWORD_MAX_LENGTH,
                actual: char_count,
            });
        }

        if normalized.chars().any(|c| c.is_control()) {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Normalized bytes for hashing
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Argon2id password hash in PHC string format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Hash a clear-text password
    pub fn from_clear_text(
        password: &ClearTextPassword,
        pepper: Option<&[u8]>,
    ) -> Result<Self, PasswordHashError> {
        let argon2 = build_argon2(pepper)?;
        let salt = SaltString::generate(&mut OsRng);

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::Hash(e.to_string()))?;

        Ok(Self(hash.to_string()))
    }

    /// Verify a clear-text password against this hash
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only for malformed hashes
    /// or hashing failures.
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        pepper: Option<&[u8]>,
    ) -> Result<bool, PasswordHashError> {
        let argon2 = build_argon2(pepper)?;
        let parsed = PasswordHash::new(&self.0)
            .map_err(|e| PasswordHashError::MalformedHash(e.to_string()))?;

        match argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::Hash(e.to_string())),
        }
    }

    /// Create from a database value (assumed already valid PHC format)
    pub fn from_db(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// PHC string for database storage
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn build_argon2(pepper: Option<&[u8]>) -> Result<Argon2<'_>, PasswordHashError> {
    match pepper {
        Some(secret) => {
            Argon2::new_with_secret(secret, Algorithm::Argon2id, Version::V0x13, Params::default())
                .map_err(|e| PasswordHashError::Hash(e.to_string()))
        }
        None => Ok(Argon2::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_rejects_short_and_empty() {
        assert_eq!(
            ClearTextPassword::new("   ".to_string()).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
        assert!(matches!(
            ClearTextPassword::new("short".to_string()),
            Err(PasswordPolicyError::TooShort { min: 8, actual: 5 })
        ));
    }

    #[test]
    fn test_policy_rejects_too_long() {
        let long = "a".repeat(PASSWORD_MAX_LENGTH + 1);
        assert!(matches!(
            ClearTextPassword::new(long),
            Err(PasswordPolicyError::TooLong { .. })
        ));
    }

    #[test]
    fn test_policy_rejects_control_characters() {
        assert_eq!(
            ClearTextPassword::new("pass\x00word1".to_string()).unwrap_err(),
            PasswordPolicyError::InvalidCharacter
        );
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
        let hashed = HashedPassword::from_clear_text(&password, None).unwrap();

        assert!(hashed.verify(&password, None).unwrap());

        let wrong = ClearTextPassword::new("incorrect horse".to_string()).unwrap();
        assert!(!hashed.verify(&wrong, None).unwrap());
    }

    #[test]
    fn test_pepper_changes_verification() {
        let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
        let pepper = b"application-wide-secret";
        let hashed = HashedPassword::from_clear_text(&password, Some(pepper)).unwrap();

        assert!(hashed.verify(&password, Some(pepper)).unwrap());
        assert!(!hashed.verify(&password, None).unwrap());
    }

    #[test]
    fn test_nfkc_normalization_unifies_input() {
        // U+2126 OHM SIGN normalizes to U+03A9 GREEK CAPITAL LETTER OMEGA
        let a = ClearTextPassword::new("pass\u{2126}word".to_string()).unwrap();
        let b = ClearTextPassword::new("pass\u{03A9}word".to_string()).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_malformed_hash_is_error_not_mismatch() {
        let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
        let bogus = HashedPassword::from_db("not-a-phc-string");
        assert!(matches!(
            bogus.verify(&password, None),
            Err(PasswordHashError::MalformedHash(_))
        ));
    }
}
