use std::sync::Arc;

use veritrail_core::{ActorContext, AuditResult};
use veritrail_domain::{AuditEvent, AuditEventId};

use crate::{
    ApplicationDirectory, AuditAuthorizationService, AuditStore, EventTypeRegistry, validate,
};

/// Permission-gated, synchronous persistence of typed audit events.
#[derive(Clone)]
pub struct LoggingService {
    store: Arc<dyn AuditStore>,
    directory: Arc<ApplicationDirectory>,
    authorization: Arc<AuditAuthorizationService>,
    event_types: Arc<EventTypeRegistry>,
}

impl LoggingService {
    /// Creates the logging service from its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn AuditStore>,
        directory: Arc<ApplicationDirectory>,
        authorization: Arc<AuditAuthorizationService>,
        event_types: Arc<EventTypeRegistry>,
    ) -> Self {
        Self {
            store,
            directory,
            authorization,
            event_types,
        }
    }

    /// Persists one event under the named application.
    ///
    /// The application is resolved read-only; the event type is created
    /// lazily on first use. The event row and its ordered data items commit
    /// as one unit of work, so a partial write is never observable, and
    /// durability is guaranteed before this returns.
    ///
    /// The assigned identifier is returned as a convenience for callers
    /// that echo it back, such as the HTTP surface; the logging contract
    /// itself requires nothing of it.
    pub async fn log_event(
        &self,
        actor: &ActorContext,
        application_name: &str,
        audit_event: &AuditEvent,
    ) -> AuditResult<AuditEventId> {
        let application_name = validate::require_not_blank(application_name, "application name")?;

        let application = self.directory.expect(application_name).await?;
        self.authorization
            .check_log_to_audit_application(actor, &application)
            .await?;

        let event_type = self
            .event_types
            .ensure_event_type(&application, audit_event.event_type_name().as_str())
            .await?;

        self.store
            .insert_event(event_type.event_type_id(), audit_event.data())
            .await
    }
}
