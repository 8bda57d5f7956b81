use chrono::Utc;
use veritrail_core::{ActorContext, AuditError, ResourceId};
use veritrail_domain::AuditEvent;

use crate::EmbeddedAuditService;
use crate::test_support::Harness;

async fn embedded_service(harness: &Harness) -> EmbeddedAuditService {
    let service_resource_id = ResourceId::new();
    harness
        .authorization
        .add_permission_to_init_audit_application(service_resource_id)
        .await
        .unwrap_or_else(|_| unreachable!());

    let service = EmbeddedAuditService::initialize(
        harness.applications.clone(),
        harness.event_types.clone(),
        harness.logging.clone(),
        "platform",
        ActorContext::run_as(service_resource_id),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    harness
        .authorization
        .add_permission_to_log_to_audit_application(service_resource_id, "platform")
        .await
        .unwrap_or_else(|_| unreachable!());

    service
}

#[tokio::test]
async fn initialize_registers_the_bound_application() {
    let harness = Harness::new();
    let service = embedded_service(&harness).await;

    assert_eq!(service.application_name().as_str(), "platform");
    assert_eq!(harness.store.application_row_count("platform").await, 1);
}

#[tokio::test]
async fn calls_run_as_the_service_actor_without_naming_the_application() {
    let harness = Harness::new();
    let service = embedded_service(&harness).await;

    service
        .init_audit_event_types(&["started".to_owned(), "stopped".to_owned()])
        .await
        .unwrap_or_else(|_| unreachable!());

    let event = AuditEvent::builder("started")
        .add_timestamp("at", Utc::now())
        .build()
        .unwrap_or_else(|_| unreachable!());
    service
        .log_event(&event)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(harness.store.events.lock().await.len(), 1);
}

#[tokio::test]
async fn initialize_without_the_init_permission_is_denied() {
    let harness = Harness::new();

    let result = EmbeddedAuditService::initialize(
        harness.applications.clone(),
        harness.event_types.clone(),
        harness.logging.clone(),
        "platform",
        ActorContext::run_as(ResourceId::new()),
    )
    .await;

    assert!(matches!(result, Err(AuditError::Unauthorized { .. })));
    assert_eq!(harness.store.application_row_count("platform").await, 0);
}

#[tokio::test]
async fn blank_bound_name_is_rejected() {
    let harness = Harness::new();

    let result = EmbeddedAuditService::initialize(
        harness.applications.clone(),
        harness.event_types.clone(),
        harness.logging.clone(),
        "  ",
        ActorContext::run_as(ResourceId::new()),
    )
    .await;

    assert!(matches!(result, Err(AuditError::InvalidArgument(_))));
}
