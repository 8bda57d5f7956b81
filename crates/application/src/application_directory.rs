use std::sync::Arc;

use veritrail_core::{AuditError, AuditResult};
use veritrail_domain::AuditApplication;

use crate::{ApplicationCache, AuditStore};

/// Shared read-only resolution path for audit applications.
///
/// A cache hit short-circuits the store; a miss falls through to a persisted
/// lookup and repopulates the cache. This path never creates applications;
/// an unresolved name surfaces as [`AuditError::UnknownApplication`].
#[derive(Clone)]
pub struct ApplicationDirectory {
    store: Arc<dyn AuditStore>,
    cache: ApplicationCache,
}

impl ApplicationDirectory {
    /// Creates a directory over a store and an application cache.
    #[must_use]
    pub fn new(store: Arc<dyn AuditStore>, cache: ApplicationCache) -> Self {
        Self { store, cache }
    }

    /// Resolves an application by name, consulting the cache first.
    pub async fn find(&self, application_name: &str) -> AuditResult<Option<AuditApplication>> {
        let key = application_name.to_owned();
        if let Some(cached) = self.cache.get(&key).await? {
            return Ok(Some(cached));
        }

        let Some(application) = self.store.find_application(application_name).await? else {
            return Ok(None);
        };

        self.cache.put_if_absent(key, application.clone()).await?;
        Ok(Some(application))
    }

    /// Resolves an application that must exist.
    pub async fn expect(&self, application_name: &str) -> AuditResult<AuditApplication> {
        self.find(application_name)
            .await?
            .ok_or_else(|| AuditError::UnknownApplication {
                application_name: application_name.to_owned(),
            })
    }

    /// Caches a freshly persisted application record.
    pub(crate) async fn remember(&self, application: &AuditApplication) -> AuditResult<()> {
        self.cache
            .put_if_absent(
                application.application_name().as_str().to_owned(),
                application.clone(),
            )
            .await
    }
}
