//! API DTOs (Data Transfer Objects)
//!
//! Form payloads and the view models handed to the rendering layer.

use serde::{Deserialize, Serialize};

// ============================================================================
// Login / Logout
// ============================================================================

/// Login form payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub title: String,
    pub csrf_token: String,
}

// ============================================================================
// Signup
// ============================================================================

/// Signup form payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Signup page view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupView {
    pub title: String,
    pub csrf_token: String,
}

// ============================================================================
// Password recovery
// ============================================================================

/// Forgot-password form payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotForm {
    pub email: String,
}

/// Forgot-password page view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotView {
    pub title: String,
    pub csrf_token: String,
}

/// Acknowledgement after a forgot-password submission
///
/// Identical for known and unknown addresses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotAck {
    pub message: String,
}

/// Reset form payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetForm {
    pub password: String,
    pub confirm_password: String,
}

/// Reset page view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetView {
    pub title: String,
    pub csrf_token: String,
    pub token: String,
}

// ============================================================================
// Account
// ============================================================================

/// Profile form payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
}

/// Password change form payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordForm {
    pub password: String,
    pub confirm_password: String,
}

/// Account page view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub title: String,
    pub csrf_token: String,
    pub public_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub has_password: bool,
    pub linked_providers: Vec<String>,
}

// ============================================================================
// OAuth callback
// ============================================================================

/// Query parameters a provider sends back to the callback route
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
