//! Return-To Computation
//!
//! Decides whether the current request path should be stored in the
//! session as the post-login redirect target.

use crate::application::config::GateConfig;

/// Compute the return-to update for a request
///
/// Returns `Some(path)` when the session's `return_to` should be set to
/// the current path, `None` to leave it unchanged. Pure function of the
/// path and authentication state, so repeated evaluation for the same
/// request yields the same result.
///
/// Rules:
/// - anonymous requests store the path unless it is the login or signup
///   page, sits under the OAuth prefix, or contains a `.` (static asset
///   heuristic)
/// - authenticated requests store the path only when it is the account
///   page (upstream behavior preserved as-is)
pub fn compute_return_to(authenticated: bool, path: &str, config: &GateConfig) -> Option<String> {
    if !authenticated {
        if path != config.login_path
            && path != config.signup_path
            && !path.starts_with(&config.auth_prefix)
            && !path.contains('.')
        {
            return Some(path.to_string());
        }
    } else if path == config.account_path {
        return Some(path.to_string());
    }

    None
}
