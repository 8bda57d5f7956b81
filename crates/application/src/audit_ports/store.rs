use async_trait::async_trait;
use veritrail_core::AuditResult;
use veritrail_domain::{
    ApplicationId, AuditApplication, AuditEventId, AuditEventType, EventData, EventTypeId,
};

/// Transactional persistence port for audit records.
///
/// Every `get_or_create` method runs as a single atomic unit of work:
/// two callers racing to create the same name never insert duplicates and
/// never observe "not found" after the other caller's commit. Failures
/// surface as [`veritrail_core::AuditError::Store`] and are never retried
/// here.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Finds an application by its unique name. Read-only; never creates.
    async fn find_application(
        &self,
        application_name: &str,
    ) -> AuditResult<Option<AuditApplication>>;

    /// Inserts an application with a fresh backing resource, or returns the
    /// existing record when the name is already registered.
    async fn get_or_create_application(
        &self,
        application_name: &str,
    ) -> AuditResult<AuditApplication>;

    /// Ensures an event type row exists for every requested name under the
    /// application, all inside one unit of work. Results come back in
    /// request order.
    async fn get_or_create_event_types(
        &self,
        application_id: ApplicationId,
        event_type_names: &[String],
    ) -> AuditResult<Vec<AuditEventType>>;

    /// Persists one event and its ordered data items atomically. The stored
    /// timestamp is assigned by the store; durability is guaranteed when the
    /// call returns.
    async fn insert_event(
        &self,
        event_type_id: EventTypeId,
        data: &[EventData],
    ) -> AuditResult<AuditEventId>;
}
