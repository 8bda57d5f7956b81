use async_trait::async_trait;
use tokio::sync::RwLock;

use veritrail_application::AuditStore;
use veritrail_core::{AuditResult, ResourceId};
use veritrail_domain::{
    ApplicationId, AuditApplication, AuditEventId, AuditEventType, EventData, EventTypeId,
};

/// One persisted event with its ordered data rows.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    /// Identifier assigned at insert time.
    pub event_id: AuditEventId,
    /// Event type the event was recorded under.
    pub event_type_id: EventTypeId,
    /// Data rows in insertion order.
    pub data: Vec<EventData>,
}

#[derive(Default)]
struct StoreState {
    applications: Vec<AuditApplication>,
    event_types: Vec<AuditEventType>,
    events: Vec<StoredEvent>,
}

/// In-memory audit store adapter.
///
/// Mirrors the PostgreSQL adapter's idempotency guarantees behind one lock,
/// which stands in for the unique constraints the database provides. Suits
/// single-process deployments and tests.
#[derive(Default)]
pub struct InMemoryAuditStore {
    state: RwLock<StoreState>,
}

impl InMemoryAuditStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many application rows carry the given name.
    pub async fn application_row_count(&self, application_name: &str) -> usize {
        self.state
            .read()
            .await
            .applications
            .iter()
            .filter(|application| application.application_name().as_str() == application_name)
            .count()
    }

    /// Returns the event type names registered under an application.
    pub async fn event_type_names(&self, application_id: ApplicationId) -> Vec<String> {
        self.state
            .read()
            .await
            .event_types
            .iter()
            .filter(|event_type| event_type.application_id() == application_id)
            .map(|event_type| event_type.event_type_name().as_str().to_owned())
            .collect()
    }

    /// Returns every persisted event in insertion order.
    pub async fn events(&self) -> Vec<StoredEvent> {
        self.state.read().await.events.clone()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn find_application(
        &self,
        application_name: &str,
    ) -> AuditResult<Option<AuditApplication>> {
        Ok(self
            .state
            .read()
            .await
            .applications
            .iter()
            .find(|application| application.application_name().as_str() == application_name)
            .cloned())
    }

    async fn get_or_create_application(
        &self,
        application_name: &str,
    ) -> AuditResult<AuditApplication> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .applications
            .iter()
            .find(|application| application.application_name().as_str() == application_name)
        {
            return Ok(existing.clone());
        }

        let application =
            AuditApplication::new(ApplicationId::new(), application_name, ResourceId::new())?;
        state.applications.push(application.clone());
        Ok(application)
    }

    async fn get_or_create_event_types(
        &self,
        application_id: ApplicationId,
        event_type_names: &[String],
    ) -> AuditResult<Vec<AuditEventType>> {
        let mut state = self.state.write().await;
        let mut resolved = Vec::with_capacity(event_type_names.len());

        for event_type_name in event_type_names {
            let existing = state
                .event_types
                .iter()
                .find(|event_type| {
                    event_type.application_id() == application_id
                        && event_type.event_type_name().as_str() == event_type_name
                })
                .cloned();

            let event_type = match existing {
                Some(event_type) => event_type,
                None => {
                    let created =
                        AuditEventType::new(EventTypeId::new(), application_id, event_type_name)?;
                    state.event_types.push(created.clone());
                    created
                }
            };
            resolved.push(event_type);
        }

        Ok(resolved)
    }

    async fn insert_event(
        &self,
        event_type_id: EventTypeId,
        data: &[EventData],
    ) -> AuditResult<AuditEventId> {
        let event_id = AuditEventId::new();
        self.state.write().await.events.push(StoredEvent {
            event_id,
            event_type_id,
            data: data.to_vec(),
        });
        Ok(event_id)
    }
}
