use std::collections::HashSet;
use std::sync::Arc;

use veritrail_core::{ActorContext, AuditError, AuditResult};
use veritrail_domain::{AuditApplication, AuditEventType};

use crate::{
    ApplicationDirectory, AuditAuthorizationService, AuditStore, EventTypeCache, EventTypeCacheKey,
    validate,
};

/// Idempotent, bulk-capable registration of event types under an
/// application.
#[derive(Clone)]
pub struct EventTypeRegistry {
    store: Arc<dyn AuditStore>,
    directory: Arc<ApplicationDirectory>,
    authorization: Arc<AuditAuthorizationService>,
    cache: EventTypeCache,
}

impl EventTypeRegistry {
    /// Creates the registry from its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn AuditStore>,
        directory: Arc<ApplicationDirectory>,
        authorization: Arc<AuditAuthorizationService>,
        cache: EventTypeCache,
    ) -> Self {
        Self {
            store,
            directory,
            authorization,
            cache,
        }
    }

    /// Ensures an event type row exists for every requested name under the
    /// named application.
    ///
    /// The application is resolved read-only: an unknown name fails, it is
    /// never created here. All names missing from the cache go to the store
    /// in one unit of work, so a batch of tens of thousands stays a single
    /// transaction. An empty name list is valid: resolution and the
    /// permission check still run, nothing is written.
    pub async fn init_audit_event_types(
        &self,
        actor: &ActorContext,
        application_name: &str,
        event_type_names: &[String],
    ) -> AuditResult<()> {
        let application_name = validate::require_not_blank(application_name, "application name")?;
        validate::require_no_blank_elements(event_type_names, "event type names")?;

        let application = self.directory.expect(application_name).await?;
        self.authorization
            .check_log_to_audit_application(actor, &application)
            .await?;

        self.ensure_event_types(&application, event_type_names).await
    }

    /// Resolves one event type under an already-authorized application,
    /// creating it lazily on first use. This is the path the logging engine
    /// takes, where creation is implicit and driven purely by the act of
    /// logging.
    pub(crate) async fn ensure_event_type(
        &self,
        application: &AuditApplication,
        event_type_name: &str,
    ) -> AuditResult<AuditEventType> {
        let key = EventTypeCacheKey {
            application_id: application.application_id(),
            event_type_name: event_type_name.to_owned(),
        };

        if let Some(cached) = self.cache.get(&key).await? {
            return Ok(cached);
        }

        let mut created = self
            .store
            .get_or_create_event_types(
                application.application_id(),
                std::slice::from_ref(&key.event_type_name),
            )
            .await?;

        let event_type = created.pop().ok_or_else(|| {
            AuditError::Store(format!(
                "store returned no event type for '{event_type_name}'"
            ))
        })?;

        self.cache.put_if_absent(key, event_type.clone()).await?;
        Ok(event_type)
    }

    async fn ensure_event_types(
        &self,
        application: &AuditApplication,
        event_type_names: &[String],
    ) -> AuditResult<()> {
        let mut seen = HashSet::new();
        let mut missing = Vec::new();

        for event_type_name in event_type_names {
            if !seen.insert(event_type_name.as_str()) {
                continue;
            }

            let key = EventTypeCacheKey {
                application_id: application.application_id(),
                event_type_name: event_type_name.clone(),
            };
            if self.cache.get(&key).await?.is_none() {
                missing.push(event_type_name.clone());
            }
        }

        if missing.is_empty() {
            return Ok(());
        }

        let created = self
            .store
            .get_or_create_event_types(application.application_id(), &missing)
            .await?;

        for event_type in created {
            let key = EventTypeCacheKey {
                application_id: event_type.application_id(),
                event_type_name: event_type.event_type_name().as_str().to_owned(),
            };
            self.cache.put_if_absent(key, event_type).await?;
        }

        Ok(())
    }
}
