//! Presentation Layer
//!
//! Tower middleware and request extensions.

pub mod middleware;

pub use middleware::{
    CurrentUser, GateState, SessionHandle, csrf_gate, load_session, publish_principal,
    remember_return_to, require_principal, security_headers,
};
