use super::manager::CacheManager;
use super::storage::{ CacheContext, CacheStorage, CacheValue };
use crate::errors::CacheResult;
use std::collections::HashMap;
use std::sync::Arc;

/// Temporary view over the manager with one resolution dimension pinned.
///
/// Returned by [`CacheManager::via_storage`] and
/// [`CacheManager::via_context`]; never mutates the manager's active
/// selection. The unpinned dimension is resolved live on every call, so
/// an accessor created before an `enable_*` call still observes it.
pub struct ScopedCache<'a> {
    manager: &'a CacheManager,
    storage: Option<Arc<dyn CacheStorage>>,
    context: Option<CacheContext>,
}

impl<'a> ScopedCache<'a> {
    pub(super) fn with_storage(manager: &'a CacheManager, storage: Arc<dyn CacheStorage>) -> Self {
        Self {
            manager,
            storage: Some(storage),
            context: None,
        }
    }

    pub(super) fn with_context(manager: &'a CacheManager, context: CacheContext) -> Self {
        Self {
            manager,
            storage: None,
            context: Some(context),
        }
    }

    pub async fn get(&self, key: &str) -> CacheResult<Option<CacheValue>> {
        self.manager.op_get(self.storage.as_ref(), self.context.as_ref(), key).await
    }

    pub async fn put(&self, key: &str, value: CacheValue, ttl_ms: Option<u64>) -> CacheResult<()> {
        self.manager.op_put(self.storage.as_ref(), self.context.as_ref(), key, value, ttl_ms).await
    }

    pub async fn put_many(
        &self,
        values: HashMap<String, CacheValue>,
        ttl_ms: Option<u64>
    ) -> CacheResult<()> {
        self.manager.op_put_many(self.storage.as_ref(), self.context.as_ref(), values, ttl_ms).await
    }

    pub async fn get_many(&self, keys: &[&str]) -> CacheResult<Vec<Option<CacheValue>>> {
        self.manager.op_get_many(self.storage.as_ref(), self.context.as_ref(), keys).await
    }

    pub async fn forget(&self, key: &str) -> CacheResult<()> {
        self.manager.op_forget(self.storage.as_ref(), key).await
    }

    pub async fn flush(&self) -> CacheResult<()> {
        self.manager.op_flush(self.storage.as_ref()).await
    }
}
