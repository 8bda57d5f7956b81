use std::sync::Arc;

use veritrail_core::{ActorContext, AuditResult};
use veritrail_domain::AuditApplication;

use crate::{ApplicationDirectory, AuditAuthorizationService, AuditStore, validate};

/// Idempotent, permission-gated registration of audit applications.
#[derive(Clone)]
pub struct ApplicationRegistry {
    store: Arc<dyn AuditStore>,
    directory: Arc<ApplicationDirectory>,
    authorization: Arc<AuditAuthorizationService>,
}

impl ApplicationRegistry {
    /// Creates the registry from its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn AuditStore>,
        directory: Arc<ApplicationDirectory>,
        authorization: Arc<AuditAuthorizationService>,
    ) -> Self {
        Self {
            store,
            directory,
            authorization,
        }
    }

    /// Registers an audit application, or returns the existing record when
    /// the name is already taken.
    ///
    /// A new row is persisted only on the first-ever call for a given name
    /// system-wide; every repeat call returns the same identifier. The cache
    /// is populated on every successful path, so a cleared cache never
    /// changes the outcome.
    pub async fn init_audit_application(
        &self,
        actor: &ActorContext,
        application_name: &str,
    ) -> AuditResult<AuditApplication> {
        let application_name = validate::require_not_blank(application_name, "application name")?;

        self.authorization.check_init_audit_application(actor).await?;

        if let Some(existing) = self.directory.find(application_name).await? {
            return Ok(existing);
        }

        let application = self.store.get_or_create_application(application_name).await?;
        self.directory.remember(&application).await?;

        Ok(application)
    }
}

#[cfg(test)]
mod tests;
