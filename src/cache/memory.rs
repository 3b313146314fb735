/// In-memory cache backend with TTL expiration
///
/// Single shared namespace; the context handle is accepted and ignored.
/// Expired entries are dropped lazily on read.
use super::storage::{ CacheContext, CacheStorage, CacheValue };
use crate::errors::CacheResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{ Duration, Instant };

/// Cache entry with TTL tracking
struct Entry {
    value: CacheValue,
    inserted_at: Instant,
    ttl: Duration,
}

impl Entry {
    fn new(value: CacheValue, ttl_ms: u64) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            ttl: Duration::from_millis(ttl_ms),
        }
    }

    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > self.ttl
    }
}

#[derive(Default)]
pub struct InMemoryStorage {
    data: RwLock<HashMap<String, Entry>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (possibly expired but not yet collected) entries
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_entry(&self, key: &str) -> Option<CacheValue> {
        let mut data = self.data.write().unwrap();

        if let Some(entry) = data.get(key) {
            if entry.is_expired() {
                data.remove(key);
                return None;
            }
            return Some(entry.value.clone());
        }

        None
    }
}

#[async_trait]
impl CacheStorage for InMemoryStorage {
    async fn get(&self, _context: &CacheContext, key: &str) -> CacheResult<Option<CacheValue>> {
        Ok(self.read_entry(key))
    }

    async fn put(
        &self,
        _context: &CacheContext,
        key: &str,
        value: CacheValue,
        ttl_ms: u64
    ) -> CacheResult<()> {
        let mut data = self.data.write().unwrap();
        data.insert(key.to_string(), Entry::new(value, ttl_ms));
        Ok(())
    }

    async fn put_many(
        &self,
        _context: &CacheContext,
        values: HashMap<String, CacheValue>,
        ttl_ms: u64
    ) -> CacheResult<()> {
        let mut data = self.data.write().unwrap();
        for (key, value) in values {
            data.insert(key, Entry::new(value, ttl_ms));
        }
        Ok(())
    }

    async fn get_many(
        &self,
        _context: &CacheContext,
        keys: &[String]
    ) -> CacheResult<Vec<Option<CacheValue>>> {
        let results = keys
            .iter()
            .map(|key| self.read_entry(key))
            .collect();
        Ok(results)
    }

    async fn forget(&self, key: &str) -> CacheResult<()> {
        let mut data = self.data.write().unwrap();
        data.remove(key);
        Ok(())
    }

    async fn flush(&self) -> CacheResult<()> {
        let mut data = self.data.write().unwrap();
        data.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::storage::undefined_context;
    use serde_json::json;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_basic_operations() {
        let storage = InMemoryStorage::new();
        let ctx = undefined_context();

        storage.put(&ctx, "key1", json!("value1"), 60_000).await.unwrap();
        assert_eq!(storage.get(&ctx, "key1").await.unwrap(), Some(json!("value1")));

        // Miss
        assert_eq!(storage.get(&ctx, "nonexistent").await.unwrap(), None);

        storage.forget("key1").await.unwrap();
        assert_eq!(storage.get(&ctx, "key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let storage = InMemoryStorage::new();
        let ctx = undefined_context();

        storage.put(&ctx, "key", json!("value"), 50).await.unwrap();
        assert_eq!(storage.get(&ctx, "key").await.unwrap(), Some(json!("value")));

        sleep(Duration::from_millis(120)).await;
        assert_eq!(storage.get(&ctx, "key").await.unwrap(), None);
        assert!(storage.is_empty()); // lazily collected on read
    }

    #[tokio::test]
    async fn test_put_many_and_get_many_alignment() {
        let storage = InMemoryStorage::new();
        let ctx = undefined_context();

        let mut values = HashMap::new();
        values.insert("a".to_string(), json!(1));
        values.insert("c".to_string(), json!(3));
        storage.put_many(&ctx, values, 60_000).await.unwrap();

        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let results = storage.get_many(&ctx, &keys).await.unwrap();
        assert_eq!(results, vec![Some(json!(1)), None, Some(json!(3))]);
    }

    #[tokio::test]
    async fn test_flush_clears_everything() {
        let storage = InMemoryStorage::new();
        let ctx = undefined_context();

        storage.put(&ctx, "a", json!(1), 60_000).await.unwrap();
        storage.put(&ctx, "b", json!(2), 60_000).await.unwrap();
        assert_eq!(storage.len(), 2);

        storage.flush().await.unwrap();
        assert!(storage.is_empty());
    }
}
