//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// Registration / ticket edit form payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub attendee_name: String,
    pub affiliation: Option<String>,
    pub ticket_kind: String,
}

/// Registration page view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterView {
    pub title: String,
    pub csrf_token: String,
    pub general_price_cents: i64,
    pub student_price_cents: i64,
    pub sponsor_price_cents: i64,
}

/// Ticket summary shared by the ticket and payment views
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSummary {
    pub attendee_name: String,
    pub affiliation: Option<String>,
    pub ticket_kind: String,
    pub payment_status: String,
    pub amount_cents: i64,
    pub paid_at_ms: Option<i64>,
}

/// Ticket page view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    pub title: String,
    pub csrf_token: String,
    pub ticket: TicketSummary,
}

/// Payment completion response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCompleteResponse {
    pub ticket: TicketSummary,
}
