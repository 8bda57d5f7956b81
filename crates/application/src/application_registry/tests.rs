use std::sync::atomic::Ordering;

use veritrail_core::{ActorContext, AuditError, ResourceId};
use veritrail_domain::PermissionAction;

use crate::KeyValueCache;
use crate::test_support::Harness;

#[tokio::test]
async fn init_is_idempotent_and_second_call_hits_cache() {
    let harness = Harness::new();
    let actor = harness
        .actor_with_init_permission()
        .await
        .unwrap_or_else(|_| unreachable!());

    let first = harness
        .applications
        .init_audit_application(&actor, "orders")
        .await
        .unwrap_or_else(|_| unreachable!());
    let second = harness
        .applications
        .init_audit_application(&actor, "orders")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(first.application_id(), second.application_id());
    assert_eq!(harness.store.application_row_count("orders").await, 1);
    // One persisted lookup for the initial miss, none for the repeat.
    assert_eq!(harness.store.find_application_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn clearing_the_cache_between_calls_changes_nothing() {
    let harness = Harness::new();
    let actor = harness
        .actor_with_init_permission()
        .await
        .unwrap_or_else(|_| unreachable!());

    let first = harness
        .applications
        .init_audit_application(&actor, "orders")
        .await
        .unwrap_or_else(|_| unreachable!());

    harness
        .application_cache
        .clear()
        .await
        .unwrap_or_else(|_| unreachable!());

    let second = harness
        .applications
        .init_audit_application(&actor, "orders")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(first.application_id(), second.application_id());
    assert_eq!(harness.store.application_row_count("orders").await, 1);

    let resolved = harness
        .directory
        .find("orders")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(resolved, Some(second));
}

#[tokio::test]
async fn blank_name_is_rejected_before_any_lookup() {
    let harness = Harness::new();
    let actor = harness
        .actor_with_init_permission()
        .await
        .unwrap_or_else(|_| unreachable!());

    let result = harness.applications.init_audit_application(&actor, "  ").await;

    assert!(matches!(result, Err(AuditError::InvalidArgument(_))));
    assert_eq!(harness.store.find_application_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn denial_names_the_action_and_the_evaluated_scope() {
    let harness = Harness::new();
    let actor_resource_id = ResourceId::new();
    let actor = ActorContext::run_as(actor_resource_id);

    let result = harness
        .applications
        .init_audit_application(&actor, "orders")
        .await;

    match result {
        Err(AuditError::Unauthorized { action, scope }) => {
            assert_eq!(action, PermissionAction::InitAuditApplication.as_str());
            assert_eq!(scope, vec![actor_resource_id]);
        }
        other => panic!("expected unauthorized, got {other:?}"),
    }
    assert_eq!(harness.store.application_row_count("orders").await, 0);
}

#[tokio::test]
async fn store_failure_surfaces_unchanged_and_leaves_the_cache_empty() {
    let harness = Harness::new();
    let actor = harness
        .actor_with_init_permission()
        .await
        .unwrap_or_else(|_| unreachable!());

    harness
        .store
        .fail_next_call(AuditError::Store("connection reset".to_owned()))
        .await;

    let result = harness
        .applications
        .init_audit_application(&actor, "orders")
        .await;
    match result {
        Err(AuditError::Store(message)) => assert_eq!(message, "connection reset"),
        other => panic!("expected store failure, got {other:?}"),
    }
    // One lookup miss and one failed insert; nothing persisted, no retry.
    assert_eq!(harness.store.find_application_calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.store.application_row_count("orders").await, 0);
    assert!(
        harness
            .application_cache
            .get(&"orders".to_owned())
            .await
            .unwrap_or_else(|_| unreachable!())
            .is_none()
    );

    // The next call re-resolves from the store and succeeds.
    let recovered = harness
        .applications
        .init_audit_application(&actor, "orders")
        .await;
    assert!(recovered.is_ok());
    assert_eq!(harness.store.find_application_calls.load(Ordering::SeqCst), 2);
    assert_eq!(harness.store.application_row_count("orders").await, 1);
}

#[tokio::test]
async fn revoking_the_permission_denies_the_next_call() {
    let harness = Harness::new();
    let actor = harness
        .actor_with_init_permission()
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(
        harness
            .applications
            .init_audit_application(&actor, "orders")
            .await
            .is_ok()
    );

    harness
        .authorization
        .remove_permission_to_init_audit_application(actor.resource_id())
        .await
        .unwrap_or_else(|_| unreachable!());

    let denied = harness
        .applications
        .init_audit_application(&actor, "orders")
        .await;
    assert!(matches!(denied, Err(AuditError::Unauthorized { .. })));
}
