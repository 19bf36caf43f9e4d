//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{RegistrationId, UserId};
use std::str::FromStr;

/// Ticket category offered at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    General,
    Student,
    Sponsor,
}

impl TicketKind {
    /// Stable lowercase identifier, used in forms and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketKind::General => "general",
            TicketKind::Student => "student",
            TicketKind::Sponsor => "sponsor",
        }
    }
}

impl FromStr for TicketKind {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s {
            "general" => Ok(TicketKind::General),
            "student" => Ok(TicketKind::Student),
            "sponsor" => Ok(TicketKind::Sponsor),
            other => Err(AppError::bad_request(format!(
                "Unknown ticket kind: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TicketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment state of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(AppError::bad_request(format!(
                "Unknown payment status: {}",
                other
            ))),
        }
    }
}

/// Event registration entity
///
/// One registration per user; the payment flow flips it to Paid exactly
/// once.
#[derive(Debug, Clone)]
pub struct Registration {
    pub registration_id: RegistrationId,
    pub user_id: UserId,
    /// Name printed on the badge
    pub attendee_name: String,
    /// Company / university, free form
    pub affiliation: Option<String>,
    pub ticket_kind: TicketKind,
    pub payment_status: PaymentStatus,
    /// Price at registration time
    pub amount_cents: i64,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// Create a new pending registration
    pub fn new(
        user_id: UserId,
        attendee_name: String,
        affiliation: Option<String>,
        ticket_kind: TicketKind,
        amount_cents: i64,
    ) -> Self {
        let now = Utc::now();

        Self {
            registration_id: RegistrationId::new(),
            user_id,
            attendee_name,
            affiliation,
            ticket_kind,
            payment_status: PaymentStatus::Pending,
            amount_cents,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether payment has completed
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Mark the registration paid
    ///
    /// Returns false when it was already paid (idempotent).
    pub fn mark_paid(&mut self) -> bool {
        if self.is_paid() {
            return false;
        }

        let now = Utc::now();
        self.payment_status = PaymentStatus::Paid;
        self.paid_at = Some(now);
        self.updated_at = now;
        true
    }

    /// Update attendee details
    pub fn update_details(&mut self, attendee_name: String, affiliation: Option<String>) {
        self.attendee_name = attendee_name;
        self.affiliation = affiliation;
        self.updated_at = Utc::now();
    }

    /// Switch ticket kind and reprice; only valid while pending
    pub fn change_kind(&mut self, ticket_kind: TicketKind, amount_cents: i64) {
        self.ticket_kind = ticket_kind;
        self.amount_cents = amount_cents;
        self.updated_at = Utc::now();
    }
}
