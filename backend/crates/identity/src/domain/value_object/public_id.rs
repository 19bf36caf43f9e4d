//! PublicId Value Object
//!
//! Public identifier for users, wrapping a Nanoid for compact,
//! URL-safe IDs that never leak internal UUIDs.

use std::str::FromStr;

use kernel::error::app_error::{AppError, AppResult};
use nid::Nanoid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicId(pub Nanoid);

impl PublicId {
    #[inline]
    pub fn new() -> Self {
        Self(Nanoid::new())
    }

    #[inline]
    pub fn parse_str(s: &str) -> AppResult<Self> {
        Nanoid::from_str(s)
            .map(PublicId)
            .map_err(|e| AppError::bad_request(format!("Invalid PublicId: {}", e)))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for PublicId {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        PublicId::parse_str(s)
    }
}

impl Default for PublicId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PublicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_length() {
        assert_eq!(PublicId::new().as_str().len(), 21);
    }

    #[test]
    fn test_public_id_roundtrip() {
        let id = PublicId::new();
        let parsed = PublicId::parse_str(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_public_id_rejects_garbage() {
        assert!(PublicId::parse_str("not a nanoid!").is_err());
    }
}
