//! Route Table
//!
//! The single immutable route table, built once at startup and consulted
//! read-only per request. The gate pipeline wraps it in order: session
//! establishment, CSRF validation, security headers, principal
//! propagation, return-to capture; the authentication guard is attached
//! to the guarded sub-table only. `/api/upload` is the CSRF-exempt path.

use std::sync::Arc;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use gate::config::GateConfig;
use gate::domain::repository::SessionRepository;
use gate::infra::postgres::PgSessionRepository;
use gate::middleware::{
    GateState, csrf_gate, load_session, publish_principal, remember_return_to, require_principal,
    security_headers,
};
use identity::application::oauth::ProviderGateway;
use identity::config::IdentityConfig;
use identity::domain::repository::{
    CredentialRepository, LinkedAccountRepository, UserRepository,
};
use identity::handlers::{self as identity_handlers, IdentityAppState};
use identity::infra::oauth_http::HttpProviderGateway;
use identity::infra::postgres::PgIdentityRepository;
use tickets::application::config::TicketConfig;
use tickets::domain::repository::RegistrationRepository;
use tickets::handlers::{self as ticket_handlers, TicketAppState};
use tickets::infra::postgres::PgTicketRepository;

use crate::config::AppConfig;
use crate::handlers::{contact, home, upload};

/// Build the route table over the PostgreSQL repositories
pub fn pg_router(pool: PgPool, config: &AppConfig) -> Router {
    let identity_config = config.identity_config();
    let gateway = HttpProviderGateway::new(Arc::new(identity_config.clone()));

    app_router(
        PgSessionRepository::new(pool.clone()),
        PgIdentityRepository::new(pool.clone()),
        gateway,
        PgTicketRepository::new(pool),
        config.gate_config(),
        identity_config,
        TicketConfig::default(),
    )
}

/// Build the route table over any repository/gateway implementations
pub fn app_router<S, R, P, T>(
    sessions: S,
    identity_repo: R,
    gateway: P,
    ticket_repo: T,
    gate_config: GateConfig,
    identity_config: IdentityConfig,
    ticket_config: TicketConfig,
) -> Router
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    R: UserRepository + CredentialRepository + LinkedAccountRepository + Clone + Send + Sync + 'static,
    P: ProviderGateway + Clone + Send + Sync + 'static,
    T: RegistrationRepository + Clone + Send + Sync + 'static,
{
    let gate_state = GateState::new(sessions, gate_config);
    let identity_state = IdentityAppState {
        repo: Arc::new(identity_repo),
        gateway: Arc::new(gateway),
        config: Arc::new(identity_config),
    };
    let ticket_state = TicketAppState {
        repo: Arc::new(ticket_repo),
        config: Arc::new(ticket_config),
    };

    // Primary app routes (public)
    let public = Router::new()
        .route("/", get(home::index))
        .route(
            "/login",
            get(identity_handlers::get_login).post(identity_handlers::post_login::<R, P>),
        )
        .route("/logout", get(identity_handlers::get_logout))
        .route(
            "/forgot",
            get(identity_handlers::get_forgot).post(identity_handlers::post_forgot::<R, P>),
        )
        .route(
            "/reset/{token}",
            get(identity_handlers::get_reset::<R, P>).post(identity_handlers::post_reset::<R, P>),
        )
        .route(
            "/signup",
            get(identity_handlers::get_signup).post(identity_handlers::post_signup::<R, P>),
        )
        .route(
            "/contact",
            get(contact::get_contact).post(contact::post_contact),
        )
        .route(
            "/auth/{provider}",
            get(identity_handlers::oauth_start::<R, P>),
        )
        .route(
            "/auth/{provider}/callback",
            get(identity_handlers::oauth_callback::<R, P>),
        )
        .with_state(identity_state.clone());

    // Account routes (require authentication)
    let account = Router::new()
        .route("/account", get(identity_handlers::get_account::<R, P>))
        .route(
            "/account/profile",
            post(identity_handlers::post_profile::<R, P>),
        )
        .route(
            "/account/password",
            post(identity_handlers::post_password::<R, P>),
        )
        .route(
            "/account/unlink/{provider}",
            get(identity_handlers::get_unlink::<R, P>),
        )
        .with_state(identity_state);

    // Registration routes (require authentication)
    let ticketing = Router::new()
        .route(
            "/register",
            get(ticket_handlers::get_register::<T>).post(ticket_handlers::post_register::<T>),
        )
        .route(
            "/ticket",
            get(ticket_handlers::get_ticket::<T>).post(ticket_handlers::post_ticket::<T>),
        )
        .route(
            "/payment/complete",
            post(ticket_handlers::post_payment_complete::<T>),
        )
        .route(
            "/m/payment/complete",
            get(ticket_handlers::get_mobile_payment_complete::<T>),
        )
        .with_state(ticket_state);

    let guarded = account
        .merge(ticketing)
        .route_layer(from_fn_with_state(gate_state.clone(), require_principal::<S>));

    // CSRF-exempt multipart upload
    let api = Router::new().route("/api/upload", post(upload::upload));

    Router::new()
        .merge(public)
        .merge(guarded)
        .merge(api)
        .layer(from_fn_with_state(gate_state.clone(), remember_return_to::<S>))
        .layer(from_fn(publish_principal))
        .layer(from_fn_with_state(gate_state.clone(), security_headers::<S>))
        .layer(from_fn_with_state(gate_state.clone(), csrf_gate::<S>))
        .layer(from_fn_with_state(gate_state, load_session::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}
