use super::memory::InMemoryStorage;
use super::scoped::ScopedCache;
use super::storage::{ undefined_context, CacheContext, CacheStorage, CacheValue };
use crate::config::SharedConfig;
use crate::errors::{ CacheError, CacheResult };
use serde::{ Serialize, de::DeserializeOwned };
use std::collections::HashMap;
use std::sync::{ Arc, RwLock };

/// Cache manager: routes every operation to the active (or overridden)
/// storage and context, applying the configured key prefix and default
/// TTL on the way through.
///
/// Registries and active-selection pointers live behind locks so the
/// manager can be shared across tasks; guards are released before any
/// storage call is awaited.
pub struct CacheManager {
    storages: RwLock<HashMap<String, Arc<dyn CacheStorage>>>,
    contexts: RwLock<HashMap<String, CacheContext>>,
    active_storage: RwLock<Option<String>>,
    active_context: RwLock<Option<String>>,
    config: SharedConfig,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut storages: Vec<String> = self.storages.read().unwrap().keys().cloned().collect();
        storages.sort();
        let mut contexts: Vec<String> = self.contexts.read().unwrap().keys().cloned().collect();
        contexts.sort();
        f.debug_struct("CacheManager")
            .field("storages", &storages)
            .field("contexts", &contexts)
            .field("active_storage", &*self.active_storage.read().unwrap())
            .field("active_context", &*self.active_context.read().unwrap())
            .finish()
    }
}

impl CacheManager {
    /// Create a manager over a live configuration handle
    pub fn new(config: SharedConfig) -> Self {
        Self {
            storages: RwLock::new(HashMap::new()),
            contexts: RwLock::new(HashMap::new()),
            active_storage: RwLock::new(None),
            active_context: RwLock::new(None),
            config,
        }
    }

    /// Register built-in storages listed in `enabled_cache_storages` and
    /// seed the active storage from `current_cache_storage`.
    ///
    /// The seed name is not validated against the registry; a bootstrap
    /// pointing at a storage registered later is fine, and lookups fail
    /// at call time if it never shows up.
    pub fn initialize(&self) -> CacheResult<()> {
        log::info!("🗄️ Initializing cache system...");

        let (enabled, current) = {
            let config = self.config.read().unwrap();
            (config.enabled_cache_storages.clone(), config.current_cache_storage.clone())
        };

        for name in &enabled {
            match name.as_str() {
                "memory" => {
                    self.register_storage(name, Arc::new(InMemoryStorage::new()));
                    log::debug!("Registered built-in storage '{}'", name);
                }
                other => {
                    return Err(CacheError::UnknownStorage(other.to_string()));
                }
            }
        }

        if !current.is_empty() {
            *self.active_storage.write().unwrap() = Some(current);
        }

        log::info!("✅ Cache system initialized");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Registration and selection
    // ------------------------------------------------------------------

    /// Insert or replace a storage registration. Does not touch the
    /// active selection. Fluent.
    pub fn register_storage(&self, name: &str, storage: Arc<dyn CacheStorage>) -> &Self {
        self.storages.write().unwrap().insert(name.to_string(), storage);
        self
    }

    /// Make a registered storage the default for unscoped operations.
    /// Last call wins. Fluent, so misses stay chainable with `?`.
    pub fn enable_storage(&self, name: &str) -> CacheResult<&Self> {
        if !self.storages.read().unwrap().contains_key(name) {
            return Err(CacheError::UnknownStorage(name.to_string()));
        }
        *self.active_storage.write().unwrap() = Some(name.to_string());
        Ok(self)
    }

    /// Insert or replace a context registration. Fluent.
    pub fn register_context(&self, name: &str, context: CacheContext) -> &Self {
        self.contexts.write().unwrap().insert(name.to_string(), context);
        self
    }

    /// Make a registered context the default for unscoped operations.
    /// Last call wins.
    pub fn enable_context(&self, name: &str) -> CacheResult<&Self> {
        if !self.contexts.read().unwrap().contains_key(name) {
            return Err(CacheError::UnknownContext(name.to_string()));
        }
        *self.active_context.write().unwrap() = Some(name.to_string());
        Ok(self)
    }

    /// Scoped view pinned to the named storage. The context dimension is
    /// still resolved live at each call. Does not mutate the active
    /// selection.
    pub fn via_storage(&self, name: &str) -> CacheResult<ScopedCache<'_>> {
        let storage = self.storage_by_name(name)?;
        Ok(ScopedCache::with_storage(self, storage))
    }

    /// Scoped view pinned to the named context, symmetric to
    /// [`via_storage`](Self::via_storage).
    pub fn via_context(&self, name: &str) -> CacheResult<ScopedCache<'_>> {
        let context = self.context_by_name(name)?;
        Ok(ScopedCache::with_context(self, context))
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    pub async fn get(&self, key: &str) -> CacheResult<Option<CacheValue>> {
        self.op_get(None, None, key).await
    }

    pub async fn put(&self, key: &str, value: CacheValue, ttl_ms: Option<u64>) -> CacheResult<()> {
        self.op_put(None, None, key, value, ttl_ms).await
    }

    pub async fn put_many(
        &self,
        values: HashMap<String, CacheValue>,
        ttl_ms: Option<u64>
    ) -> CacheResult<()> {
        self.op_put_many(None, None, values, ttl_ms).await
    }

    pub async fn get_many(&self, keys: &[&str]) -> CacheResult<Vec<Option<CacheValue>>> {
        self.op_get_many(None, None, keys).await
    }

    pub async fn forget(&self, key: &str) -> CacheResult<()> {
        self.op_forget(None, key).await
    }

    pub async fn flush(&self) -> CacheResult<()> {
        self.op_flush(None).await
    }

    /// Serialize any value through [`CacheValue`] before storing
    pub async fn put_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_ms: Option<u64>
    ) -> CacheResult<()> {
        let value = serde_json::to_value(value)?;
        self.put(key, value, ttl_ms).await
    }

    /// Fetch and deserialize; a miss stays `None`
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Shared dispatch internals (also used by ScopedCache)
    // ------------------------------------------------------------------

    pub(super) async fn op_get(
        &self,
        storage: Option<&Arc<dyn CacheStorage>>,
        context: Option<&CacheContext>,
        key: &str
    ) -> CacheResult<Option<CacheValue>> {
        let storage = self.resolve_storage(storage)?;
        let context = self.resolve_context(context)?;
        let key = self.prefixed(key);
        storage.get(&context, &key).await
    }

    pub(super) async fn op_put(
        &self,
        storage: Option<&Arc<dyn CacheStorage>>,
        context: Option<&CacheContext>,
        key: &str,
        value: CacheValue,
        ttl_ms: Option<u64>
    ) -> CacheResult<()> {
        let storage = self.resolve_storage(storage)?;
        let context = self.resolve_context(context)?;
        let key = self.prefixed(key);
        let ttl = self.effective_ttl(ttl_ms);
        storage.put(&context, &key, value, ttl).await
    }

    pub(super) async fn op_put_many(
        &self,
        storage: Option<&Arc<dyn CacheStorage>>,
        context: Option<&CacheContext>,
        values: HashMap<String, CacheValue>,
        ttl_ms: Option<u64>
    ) -> CacheResult<()> {
        let storage = self.resolve_storage(storage)?;
        let context = self.resolve_context(context)?;
        let values = self.prefixed_map(values);
        let ttl = self.effective_ttl(ttl_ms);
        storage.put_many(&context, values, ttl).await
    }

    pub(super) async fn op_get_many(
        &self,
        storage: Option<&Arc<dyn CacheStorage>>,
        context: Option<&CacheContext>,
        keys: &[&str]
    ) -> CacheResult<Vec<Option<CacheValue>>> {
        let storage = self.resolve_storage(storage)?;
        let context = self.resolve_context(context)?;
        let keys = self.prefixed_keys(keys);
        storage.get_many(&context, &keys).await
    }

    // Context is not part of the storage capability's forget/flush
    // signatures, so only the storage dimension is resolved here.

    pub(super) async fn op_forget(
        &self,
        storage: Option<&Arc<dyn CacheStorage>>,
        key: &str
    ) -> CacheResult<()> {
        let storage = self.resolve_storage(storage)?;
        let key = self.prefixed(key);
        storage.forget(&key).await
    }

    pub(super) async fn op_flush(&self, storage: Option<&Arc<dyn CacheStorage>>) -> CacheResult<()> {
        let storage = self.resolve_storage(storage)?;
        storage.flush().await
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    fn storage_by_name(&self, name: &str) -> CacheResult<Arc<dyn CacheStorage>> {
        self.storages
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| CacheError::UnknownStorage(name.to_string()))
    }

    fn context_by_name(&self, name: &str) -> CacheResult<CacheContext> {
        self.contexts
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| CacheError::UnknownContext(name.to_string()))
    }

    /// Scoped override, else the active storage. The storage dimension is
    /// mandatory: nothing set means the operation cannot proceed.
    fn resolve_storage(
        &self,
        storage: Option<&Arc<dyn CacheStorage>>
    ) -> CacheResult<Arc<dyn CacheStorage>> {
        if let Some(storage) = storage {
            return Ok(storage.clone());
        }

        let name = self.active_storage.read().unwrap().clone();
        match name {
            Some(name) => self.storage_by_name(&name),
            None => Err(CacheError::NoActiveStorage),
        }
    }

    /// Scoped override, else the active context, else the
    /// undefined-context marker. The context dimension is optional.
    fn resolve_context(&self, context: Option<&CacheContext>) -> CacheResult<CacheContext> {
        if let Some(context) = context {
            return Ok(context.clone());
        }

        let name = self.active_context.read().unwrap().clone();
        match name {
            Some(name) => self.context_by_name(&name),
            None => Ok(undefined_context()),
        }
    }

    // ------------------------------------------------------------------
    // Key prefixing and TTL defaulting (configuration read live)
    // ------------------------------------------------------------------

    fn prefixed(&self, key: &str) -> String {
        let prefix = self.config.read().unwrap().cache_key_prefix.clone();
        format!("{}{}", prefix, key)
    }

    fn prefixed_keys(&self, keys: &[&str]) -> Vec<String> {
        let prefix = self.config.read().unwrap().cache_key_prefix.clone();
        keys.iter()
            .map(|key| format!("{}{}", prefix, key))
            .collect()
    }

    fn prefixed_map(&self, values: HashMap<String, CacheValue>) -> HashMap<String, CacheValue> {
        let prefix = self.config.read().unwrap().cache_key_prefix.clone();
        values
            .into_iter()
            .map(|(key, value)| (format!("{}{}", prefix, key), value))
            .collect()
    }

    fn effective_ttl(&self, ttl_ms: Option<u64>) -> u64 {
        ttl_ms.unwrap_or_else(|| self.config.read().unwrap().record_ttl)
    }
}
