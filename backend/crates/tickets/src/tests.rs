//! Use-case tests over an in-memory repository

#![cfg(test)]

use std::sync::Arc;

use crate::application::complete_payment::CompletePaymentUseCase;
use crate::application::config::TicketConfig;
use crate::application::register::{RegisterUseCase, RegistrationDetails};
use crate::application::update_ticket::UpdateTicketUseCase;
use crate::domain::entities::TicketKind;
use crate::domain::repository::RegistrationRepository;
use crate::error::TicketError;
use crate::infra::memory::MemoryTicketRepository;
use kernel::id::UserId;

fn details(kind: TicketKind) -> RegistrationDetails {
    RegistrationDetails {
        attendee_name: "Ada Lovelace".to_string(),
        affiliation: Some("Analytical Engines Ltd".to_string()),
        ticket_kind: kind,
    }
}

fn setup() -> (Arc<MemoryTicketRepository>, Arc<TicketConfig>) {
    (
        Arc::new(MemoryTicketRepository::default()),
        Arc::new(TicketConfig::default()),
    )
}

#[tokio::test]
async fn test_register_prices_by_kind() {
    let (repo, config) = setup();
    let user_id = UserId::new();

    let registration = RegisterUseCase::new(repo.clone(), config.clone())
        .execute(&user_id, details(TicketKind::Student))
        .await
        .unwrap();

    assert_eq!(registration.amount_cents, config.student_price_cents);
    assert!(!registration.is_paid());
}

#[tokio::test]
async fn test_register_twice_rejected() {
    let (repo, config) = setup();
    let user_id = UserId::new();

    let use_case = RegisterUseCase::new(repo, config);
    use_case
        .execute(&user_id, details(TicketKind::General))
        .await
        .unwrap();

    let result = use_case.execute(&user_id, details(TicketKind::General)).await;
    assert!(matches!(result, Err(TicketError::AlreadyRegistered)));
}

#[tokio::test]
async fn test_register_empty_name_rejected() {
    let (repo, config) = setup();

    let result = RegisterUseCase::new(repo, config)
        .execute(
            &UserId::new(),
            RegistrationDetails {
                attendee_name: "   ".to_string(),
                affiliation: None,
                ticket_kind: TicketKind::General,
            },
        )
        .await;

    assert!(matches!(result, Err(TicketError::Validation(_))));
}

#[tokio::test]
async fn test_update_reprices_while_pending() {
    let (repo, config) = setup();
    let user_id = UserId::new();

    RegisterUseCase::new(repo.clone(), config.clone())
        .execute(&user_id, details(TicketKind::General))
        .await
        .unwrap();

    let updated = UpdateTicketUseCase::new(repo, config.clone())
        .execute(&user_id, details(TicketKind::Sponsor))
        .await
        .unwrap();

    assert_eq!(updated.ticket_kind, TicketKind::Sponsor);
    assert_eq!(updated.amount_cents, config.sponsor_price_cents);
}

#[tokio::test]
async fn test_update_kind_refused_after_payment() {
    let (repo, config) = setup();
    let user_id = UserId::new();

    RegisterUseCase::new(repo.clone(), config.clone())
        .execute(&user_id, details(TicketKind::General))
        .await
        .unwrap();
    CompletePaymentUseCase::new(repo.clone())
        .execute(&user_id)
        .await
        .unwrap();

    let result = UpdateTicketUseCase::new(repo.clone(), config)
        .execute(&user_id, details(TicketKind::Student))
        .await;
    assert!(matches!(result, Err(TicketError::PaymentAlreadyCompleted)));

    // Price unchanged by the refused edit
    let registration = repo.find_by_user_id(&user_id).await.unwrap().unwrap();
    assert_eq!(registration.ticket_kind, TicketKind::General);
}

#[tokio::test]
async fn test_update_without_registration_rejected() {
    let (repo, config) = setup();

    let result = UpdateTicketUseCase::new(repo, config)
        .execute(&UserId::new(), details(TicketKind::General))
        .await;

    assert!(matches!(result, Err(TicketError::NotRegistered)));
}

#[tokio::test]
async fn test_complete_payment_is_idempotent() {
    let (repo, config) = setup();
    let user_id = UserId::new();

    RegisterUseCase::new(repo.clone(), config)
        .execute(&user_id, details(TicketKind::General))
        .await
        .unwrap();

    let use_case = CompletePaymentUseCase::new(repo);
    let first = use_case.execute(&user_id).await.unwrap();
    assert!(first.is_paid());

    let second = use_case.execute(&user_id).await.unwrap();
    assert_eq!(second.paid_at, first.paid_at);
}

#[tokio::test]
async fn test_complete_payment_without_registration_rejected() {
    let (repo, _config) = setup();

    let result = CompletePaymentUseCase::new(repo)
        .execute(&UserId::new())
        .await;

    assert!(matches!(result, Err(TicketError::NotRegistered)));
}
