use std::sync::Arc;

use async_trait::async_trait;
use veritrail_core::AuditResult;
use veritrail_domain::{ApplicationId, AuditApplication, AuditEventType};

/// Minimal mapping capability backing the registry caches.
///
/// The caches are optional acceleration only: every engine path must stay
/// correct against an always-empty cache, and external actors may clear
/// entries at any time (test teardown does). Entries never expire on their
/// own; the engine never evicts.
#[async_trait]
pub trait KeyValueCache<K, V>: Send + Sync
where
    K: Send + Sync,
    V: Send + Sync,
{
    /// Returns the cached value for a key, if present.
    async fn get(&self, key: &K) -> AuditResult<Option<V>>;

    /// Stores a value unless the key is already present. Losing this race is
    /// harmless: both writers hold equal values by construction.
    async fn put_if_absent(&self, key: K, value: V) -> AuditResult<()>;

    /// Drops every entry. Exposed for external administration; the engine
    /// itself never calls this.
    async fn clear(&self) -> AuditResult<()>;
}

/// Composite key for cached event type records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventTypeCacheKey {
    /// Owning application identifier.
    pub application_id: ApplicationId,
    /// Event type name within the application.
    pub event_type_name: String,
}

/// Shared cache handle mapping application names to application records.
pub type ApplicationCache = Arc<dyn KeyValueCache<String, AuditApplication>>;

/// Shared cache handle mapping composite keys to event type records.
pub type EventTypeCache = Arc<dyn KeyValueCache<EventTypeCacheKey, AuditEventType>>;
