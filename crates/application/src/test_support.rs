use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use veritrail_core::{ActorContext, AuditError, AuditResult, ResourceId};
use veritrail_domain::{
    ApplicationId, AuditApplication, AuditEventId, AuditEventType, EventData, EventTypeId,
    PermissionAction,
};

use crate::{
    ApplicationDirectory, ApplicationRegistry, AuditAuthorizationService, AuditStore,
    AuthorizationRepository, EventTypeRegistry, KeyValueCache, LoggingService,
};

/// In-memory store fake that counts lookups and records batch shapes, so
/// tests can assert cache hits and unit-of-work boundaries. An injected
/// failure is consumed by the next unit of work and leaves no state behind.
#[derive(Default)]
pub(crate) struct FakeAuditStore {
    pub applications: Mutex<Vec<AuditApplication>>,
    pub event_types: Mutex<Vec<AuditEventType>>,
    pub events: Mutex<Vec<(AuditEventId, EventTypeId, Vec<EventData>)>>,
    pub find_application_calls: AtomicUsize,
    pub event_type_batches: Mutex<Vec<Vec<String>>>,
    pub fail_next: Mutex<Option<AuditError>>,
}

impl FakeAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a one-shot failure for whichever unit of work runs next.
    /// Read-only lookups are unaffected.
    pub async fn fail_next_call(&self, error: AuditError) {
        *self.fail_next.lock().await = Some(error);
    }

    async fn take_failure(&self) -> AuditResult<()> {
        match self.fail_next.lock().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    pub async fn application_row_count(&self, application_name: &str) -> usize {
        self.applications
            .lock()
            .await
            .iter()
            .filter(|application| application.application_name().as_str() == application_name)
            .count()
    }

    pub async fn event_type_names(&self, application_id: ApplicationId) -> Vec<String> {
        self.event_types
            .lock()
            .await
            .iter()
            .filter(|event_type| event_type.application_id() == application_id)
            .map(|event_type| event_type.event_type_name().as_str().to_owned())
            .collect()
    }
}

#[async_trait]
impl AuditStore for FakeAuditStore {
    async fn find_application(
        &self,
        application_name: &str,
    ) -> AuditResult<Option<AuditApplication>> {
        self.find_application_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .applications
            .lock()
            .await
            .iter()
            .find(|application| application.application_name().as_str() == application_name)
            .cloned())
    }

    async fn get_or_create_application(
        &self,
        application_name: &str,
    ) -> AuditResult<AuditApplication> {
        self.take_failure().await?;
        let mut applications = self.applications.lock().await;
        if let Some(existing) = applications
            .iter()
            .find(|application| application.application_name().as_str() == application_name)
        {
            return Ok(existing.clone());
        }

        let application =
            AuditApplication::new(ApplicationId::new(), application_name, ResourceId::new())?;
        applications.push(application.clone());
        Ok(application)
    }

    async fn get_or_create_event_types(
        &self,
        application_id: ApplicationId,
        event_type_names: &[String],
    ) -> AuditResult<Vec<AuditEventType>> {
        self.take_failure().await?;
        self.event_type_batches
            .lock()
            .await
            .push(event_type_names.to_vec());

        let mut event_types = self.event_types.lock().await;
        let mut resolved = Vec::with_capacity(event_type_names.len());

        for event_type_name in event_type_names {
            let existing = event_types
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
                    event_types.push(created.clone());
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
        self.take_failure().await?;
        let event_id = AuditEventId::new();
        self.events
            .lock()
            .await
            .push((event_id, event_type_id, data.to_vec()));
        Ok(event_id)
    }
}

/// Plain map-backed cache fake with put-if-absent semantics.
#[derive(Default)]
pub(crate) struct FakeCache<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> FakeCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<K, V> KeyValueCache<K, V> for FakeCache<K, V>
where
    K: std::hash::Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> AuditResult<Option<V>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put_if_absent(&self, key: K, value: V) -> AuditResult<()> {
        self.entries.lock().await.entry(key).or_insert(value);
        Ok(())
    }

    async fn clear(&self) -> AuditResult<()> {
        self.entries.lock().await.clear();
        Ok(())
    }
}

/// Grant-set permission backend fake. The evaluated scope is the actor's
/// own resource, which is what denial assertions check against.
#[derive(Default)]
pub(crate) struct FakeAuthorizationRepository {
    grants: Mutex<HashSet<(ResourceId, PermissionAction, ResourceId)>>,
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn grant(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<()> {
        self.grants
            .lock()
            .await
            .insert((actor_resource_id, action, target_resource_id));
        Ok(())
    }

    async fn revoke(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<()> {
        self.grants
            .lock()
            .await
            .remove(&(actor_resource_id, action, target_resource_id));
        Ok(())
    }

    async fn has_permission(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<bool> {
        Ok(self
            .grants
            .lock()
            .await
            .contains(&(actor_resource_id, action, target_resource_id)))
    }

    async fn authorization_scope(
        &self,
        actor_resource_id: ResourceId,
    ) -> AuditResult<Vec<ResourceId>> {
        Ok(vec![actor_resource_id])
    }
}

/// Fully wired engine over the fakes above.
pub(crate) struct Harness {
    pub store: Arc<FakeAuditStore>,
    pub application_cache: Arc<FakeCache<String, AuditApplication>>,
    pub event_type_cache: Arc<FakeCache<crate::EventTypeCacheKey, AuditEventType>>,
    pub directory: Arc<ApplicationDirectory>,
    pub authorization: Arc<AuditAuthorizationService>,
    pub applications: Arc<ApplicationRegistry>,
    pub event_types: Arc<EventTypeRegistry>,
    pub logging: Arc<LoggingService>,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(FakeAuditStore::new());
        let application_cache = Arc::new(FakeCache::new());
        let event_type_cache = Arc::new(FakeCache::new());
        let repository = Arc::new(FakeAuthorizationRepository::default());

        let directory = Arc::new(ApplicationDirectory::new(
            store.clone(),
            application_cache.clone(),
        ));
        let authorization = Arc::new(AuditAuthorizationService::new(
            repository,
            directory.clone(),
            ResourceId::new(),
        ));
        let applications = Arc::new(ApplicationRegistry::new(
            store.clone(),
            directory.clone(),
            authorization.clone(),
        ));
        let event_types = Arc::new(EventTypeRegistry::new(
            store.clone(),
            directory.clone(),
            authorization.clone(),
            event_type_cache.clone(),
        ));
        let logging = Arc::new(LoggingService::new(
            store.clone(),
            directory.clone(),
            authorization.clone(),
            event_types.clone(),
        ));

        Self {
            store,
            application_cache,
            event_type_cache,
            directory,
            authorization,
            applications,
            event_types,
            logging,
        }
    }

    /// Creates an actor holding the init-application permission.
    pub async fn actor_with_init_permission(&self) -> AuditResult<ActorContext> {
        let actor_resource_id = ResourceId::new();
        self.authorization
            .add_permission_to_init_audit_application(actor_resource_id)
            .await?;
        Ok(ActorContext::run_as(actor_resource_id))
    }

    /// Registers an application as a privileged actor and grants the given
    /// actor the log permission on it.
    pub async fn application_with_log_permission(
        &self,
        application_name: &str,
        actor_resource_id: ResourceId,
    ) -> AuditResult<AuditApplication> {
        let admin = self.actor_with_init_permission().await?;
        let application = self
            .applications
            .init_audit_application(&admin, application_name)
            .await?;
        self.authorization
            .add_permission_to_log_to_audit_application(actor_resource_id, application_name)
            .await?;
        Ok(application)
    }
}
