//! HTTP Handlers
//!
//! Controllers for the guarded registration, ticket and payment routes.

use axum::Json;
use axum::extract::{Extension, State};
use axum::response::{IntoResponse, Redirect, Response};
use std::str::FromStr;
use std::sync::Arc;

use gate::domain::session::Principal;
use gate::presentation::middleware::SessionHandle;

use crate::application::complete_payment::CompletePaymentUseCase;
use crate::application::config::TicketConfig;
use crate::application::register::{RegisterUseCase, RegistrationDetails};
use crate::application::update_ticket::UpdateTicketUseCase;
use crate::domain::entities::{Registration, TicketKind};
use crate::domain::repository::RegistrationRepository;
use crate::error::{TicketError, TicketResult};
use crate::presentation::dto::{
    PaymentCompleteResponse, RegisterView, RegistrationForm, TicketSummary, TicketView,
};

/// Shared state for ticket handlers
#[derive(Clone)]
pub struct TicketAppState<R>
where
    R: RegistrationRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<TicketConfig>,
}

// ============================================================================
// Registration
// ============================================================================

/// GET /register
pub async fn get_register<R>(
    State(state): State<TicketAppState<R>>,
    Extension(handle): Extension<SessionHandle>,
) -> TicketResult<Response>
where
    R: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let principal = require_principal(&handle).await?;

    // An existing registration goes straight to its ticket
    if state
        .repo
        .find_by_user_id(&principal.user_id)
        .await?
        .is_some()
    {
        return Ok(Redirect::to("/ticket").into_response());
    }

    Ok(Json(RegisterView {
        title: "Register".to_string(),
        csrf_token: handle.csrf_token().await,
        general_price_cents: state.config.general_price_cents,
        student_price_cents: state.config.student_price_cents,
        sponsor_price_cents: state.config.sponsor_price_cents,
    })
    .into_response())
}

/// POST /register
pub async fn post_register<R>(
    State(state): State<TicketAppState<R>>,
    Extension(handle): Extension<SessionHandle>,
    axum::Form(form): axum::Form<RegistrationForm>,
) -> TicketResult<Redirect>
where
    R: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let principal = require_principal(&handle).await?;

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());
    use_case
        .execute(&principal.user_id, parse_form(form)?)
        .await?;

    Ok(Redirect::to("/ticket"))
}

// ============================================================================
// Ticket
// ============================================================================

/// GET /ticket
pub async fn get_ticket<R>(
    State(state): State<TicketAppState<R>>,
    Extension(handle): Extension<SessionHandle>,
) -> TicketResult<Response>
where
    R: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let principal = require_principal(&handle).await?;

    let Some(registration) = state.repo.find_by_user_id(&principal.user_id).await? else {
        return Ok(Redirect::to("/register").into_response());
    };

    Ok(Json(TicketView {
        title: "Your Ticket".to_string(),
        csrf_token: handle.csrf_token().await,
        ticket: summarize(&registration),
    })
    .into_response())
}

/// POST /ticket
pub async fn post_ticket<R>(
    State(state): State<TicketAppState<R>>,
    Extension(handle): Extension<SessionHandle>,
    axum::Form(form): axum::Form<RegistrationForm>,
) -> TicketResult<Redirect>
where
    R: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let principal = require_principal(&handle).await?;

    let use_case = UpdateTicketUseCase::new(state.repo.clone(), state.config.clone());
    use_case
        .execute(&principal.user_id, parse_form(form)?)
        .await?;

    Ok(Redirect::to("/ticket"))
}

// ============================================================================
// Payment completion
// ============================================================================

/// POST /payment/complete
pub async fn post_payment_complete<R>(
    State(state): State<TicketAppState<R>>,
    Extension(handle): Extension<SessionHandle>,
) -> TicketResult<Json<PaymentCompleteResponse>>
where
    R: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let principal = require_principal(&handle).await?;

    let use_case = CompletePaymentUseCase::new(state.repo.clone());
    let registration = use_case.execute(&principal.user_id).await?;

    Ok(Json(PaymentCompleteResponse {
        ticket: summarize(&registration),
    }))
}

/// GET /m/payment/complete
///
/// Mobile payment flows land here via a plain GET and are sent back to
/// the ticket page.
pub async fn get_mobile_payment_complete<R>(
    State(state): State<TicketAppState<R>>,
    Extension(handle): Extension<SessionHandle>,
) -> TicketResult<Redirect>
where
    R: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let principal = require_principal(&handle).await?;

    let use_case = CompletePaymentUseCase::new(state.repo.clone());
    use_case.execute(&principal.user_id).await?;

    Ok(Redirect::to("/ticket"))
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn require_principal(handle: &SessionHandle) -> TicketResult<Principal> {
    handle
        .principal()
        .await
        .ok_or(TicketError::SessionRequired)
}

fn parse_form(form: RegistrationForm) -> TicketResult<RegistrationDetails> {
    let ticket_kind = TicketKind::from_str(&form.ticket_kind)
        .map_err(|e| TicketError::Validation(e.to_string()))?;

    Ok(RegistrationDetails {
        attendee_name: form.attendee_name,
        affiliation: form.affiliation.filter(|s| !s.trim().is_empty()),
        ticket_kind,
    })
}

fn summarize(registration: &Registration) -> TicketSummary {
    TicketSummary {
        attendee_name: registration.attendee_name.clone(),
        affiliation: registration.affiliation.clone(),
        ticket_kind: registration.ticket_kind.as_str().to_string(),
        payment_status: registration.payment_status.as_str().to_string(),
        amount_cents: registration.amount_cents,
        paid_at_ms: registration.paid_at.map(|t| t.timestamp_millis()),
    }
}
