//! CSRF Evaluation
//!
//! Pure decision logic for the CSRF check. The exempt upload path skips
//! validation unconditionally (multipart bodies cannot carry the token
//! through the same channel as form bodies); every other path must
//! present the session token on state-changing methods.

use axum::http::Method;

/// Result of evaluating a request against the CSRF rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfOutcome {
    /// Path is the designated exempt path; validation never runs
    Exempt,
    /// Method does not change state; no token required
    NotRequired,
    /// Token presented and matched the session token
    Accepted,
    /// Token absent or mismatched; reject before any handler runs
    Rejected,
}

/// Whether a method is state-changing and therefore requires a token
pub fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Evaluate the CSRF rules for a request
///
/// Pure function of the request line, the presented token and the
/// session token; performs no I/O.
pub fn evaluate_csrf(
    path: &str,
    method: &Method,
    presented: Option<&str>,
    session_token: &str,
    exempt_path: &str,
) -> CsrfOutcome {
    if path == exempt_path {
        return CsrfOutcome::Exempt;
    }

    if !is_state_changing(method) {
        return CsrfOutcome::NotRequired;
    }

    match presented {
        Some(token)
            if platform::crypto::constant_time_eq(
                token.as_bytes(),
                session_token.as_bytes(),
            ) =>
        {
            CsrfOutcome::Accepted
        }
        _ => CsrfOutcome::Rejected,
    }
}
