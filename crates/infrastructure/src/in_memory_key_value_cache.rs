use std::collections::HashMap;
use std::hash::Hash;

use async_trait::async_trait;
use tokio::sync::RwLock;

use veritrail_application::KeyValueCache;
use veritrail_core::AuditResult;

/// In-memory cache adapter backed by a plain map.
///
/// Entries never expire; external invalidation goes through `clear`. Suits
/// single-process deployments and tests.
#[derive(Default)]
pub struct InMemoryKeyValueCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryKeyValueCache<K, V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<K, V> KeyValueCache<K, V> for InMemoryKeyValueCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> AuditResult<Option<V>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put_if_absent(&self, key: K, value: V) -> AuditResult<()> {
        self.entries.write().await.entry(key).or_insert(value);
        Ok(())
    }

    async fn clear(&self) -> AuditResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use veritrail_application::KeyValueCache;

    use super::InMemoryKeyValueCache;

    #[tokio::test]
    async fn put_if_absent_keeps_the_first_value() {
        let cache = InMemoryKeyValueCache::new();

        assert!(cache.put_if_absent("key".to_owned(), 1).await.is_ok());
        assert!(cache.put_if_absent("key".to_owned(), 2).await.is_ok());

        let value = cache.get(&"key".to_owned()).await;
        assert_eq!(value.ok().flatten(), Some(1));
    }

    #[tokio::test]
    async fn clear_drops_every_entry() {
        let cache = InMemoryKeyValueCache::new();
        assert!(cache.put_if_absent("key".to_owned(), 1).await.is_ok());

        assert!(cache.clear().await.is_ok());

        let value = cache.get(&"key".to_owned()).await;
        assert_eq!(value.ok().flatten(), None);
    }
}
