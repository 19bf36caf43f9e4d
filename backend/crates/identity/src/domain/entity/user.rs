//! User Entity
//!
//! Core user profile entity containing non-sensitive user data.
//! Credentials live in the Credential entity.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{email::Email, public_id::PublicId};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe)
    pub public_id: PublicId,
    /// Email address (unique, used for login)
    pub email: Email,
    /// Display name shown on rendered pages
    pub display_name: Option<String>,
    /// Free-form location
    pub location: Option<String>,
    /// Personal website URL
    pub website: Option<String>,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(email: Email) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            email,
            display_name: None,
            location: None,
            website: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Update profile fields
    pub fn update_profile(
        &mut self,
        display_name: Option<String>,
        location: Option<String>,
        website: Option<String>,
    ) {
        self.display_name = display_name;
        self.location = location;
        self.website = website;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user() {
        let user = User::new(Email::new("user@example.com").unwrap());

        assert_eq!(user.email.as_str(), "user@example.com");
        assert!(user.display_name.is_none());
        assert!(user.last_login_at.is_none());
        assert_eq!(user.public_id.as_str().len(), 21);
    }

    #[test]
    fn test_record_login() {
        let mut user = User::new(Email::new("user@example.com").unwrap());
        user.record_login();
        assert!(user.last_login_at.is_some());
    }

    #[test]
    fn test_update_profile() {
        let mut user = User::new(Email::new("user@example.com").unwrap());
        user.update_profile(Some("Ada".to_string()), None, None);

        assert_eq!(user.display_name.as_deref(), Some("Ada"));
        assert!(user.location.is_none());
    }
}
