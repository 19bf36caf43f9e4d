//! Contact Form Handlers
//!
//! Validates submissions and hands them to the mail collaborator via the
//! log; no message store of its own.

use axum::Json;
use axum::extract::Extension;
use serde::{Deserialize, Serialize};

use gate::presentation::middleware::SessionHandle;
use kernel::error::app_error::{AppError, AppResult};

/// Contact page view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    pub title: String,
    pub csrf_token: String,
}

/// Contact form payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Acknowledgement after a contact submission
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactAck {
    pub message: String,
}

/// GET /contact
pub async fn get_contact(Extension(handle): Extension<SessionHandle>) -> Json<ContactView> {
    Json(ContactView {
        title: "Contact".to_string(),
        csrf_token: handle.csrf_token().await,
    })
}

/// POST /contact
pub async fn post_contact(axum::Form(form): axum::Form<ContactForm>) -> AppResult<Json<ContactAck>> {
    if form.name.trim().is_empty() {
        return Err(AppError::bad_request("Name cannot be empty"));
    }
    if !form.email.contains('@') {
        return Err(AppError::bad_request("Invalid email address"));
    }
    if form.message.trim().is_empty() {
        return Err(AppError::bad_request("Message cannot be empty"));
    }

    tracing::info!(
        from = %form.email,
        name = %form.name,
        "Contact message ready for delivery"
    );

    Ok(Json(ContactAck {
        message: "Thanks, your message has been sent".to_string(),
    }))
}
