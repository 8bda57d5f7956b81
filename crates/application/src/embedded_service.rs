use std::sync::Arc;

use veritrail_core::{ActorContext, AuditResult, NonEmptyString};
use veritrail_domain::{AuditEvent, AuditEventId};

use crate::{ApplicationRegistry, EventTypeRegistry, LoggingService};

/// Audit surface bound to one deployment-wide application.
///
/// Embedded callers never name an application: every call targets the
/// configured one and runs as the deployment's service actor, which must
/// hold the log permission on it. The bound application is registered once,
/// up front, when the service is built.
#[derive(Clone)]
pub struct EmbeddedAuditService {
    event_types: Arc<EventTypeRegistry>,
    logging: Arc<LoggingService>,
    application_name: NonEmptyString,
    service_actor: ActorContext,
}

impl EmbeddedAuditService {
    /// Registers the bound application (idempotent) and returns the service.
    ///
    /// The service actor needs the init permission for this bootstrap and
    /// the log permission for everything after it.
    pub async fn initialize(
        applications: Arc<ApplicationRegistry>,
        event_types: Arc<EventTypeRegistry>,
        logging: Arc<LoggingService>,
        application_name: impl Into<String>,
        service_actor: ActorContext,
    ) -> AuditResult<Self> {
        let application_name = NonEmptyString::new(application_name)?;
        applications
            .init_audit_application(&service_actor, application_name.as_str())
            .await?;

        Ok(Self {
            event_types,
            logging,
            application_name,
            service_actor,
        })
    }

    /// Returns the application every embedded call is scoped to.
    #[must_use]
    pub fn application_name(&self) -> &NonEmptyString {
        &self.application_name
    }

    /// Ensures event types exist under the bound application.
    pub async fn init_audit_event_types(&self, event_type_names: &[String]) -> AuditResult<()> {
        self.event_types
            .init_audit_event_types(
                &self.service_actor,
                self.application_name.as_str(),
                event_type_names,
            )
            .await
    }

    /// Persists one event under the bound application.
    pub async fn log_event(&self, audit_event: &AuditEvent) -> AuditResult<AuditEventId> {
        self.logging
            .log_event(
                &self.service_actor,
                self.application_name.as_str(),
                audit_event,
            )
            .await
    }
}

#[cfg(test)]
mod tests;
