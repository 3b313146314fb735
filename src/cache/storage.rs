use crate::errors::CacheResult;
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Value passed through the façade. JSON keeps backends oblivious to
/// caller-side types.
pub type CacheValue = serde_json::Value;

/// Opaque context handle forwarded untouched to storage calls.
///
/// The manager never inspects it; backends that scope cached data by
/// tenant or environment may downcast to whatever type was registered.
pub type CacheContext = Arc<dyn Any + Send + Sync>;

/// Marker passed when no context was ever enabled or bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndefinedContext;

/// Context handle used by operations running without any context.
pub fn undefined_context() -> CacheContext {
    Arc::new(UndefinedContext)
}

/// Check whether a context handle is the undefined-context marker
pub fn is_undefined_context(context: &CacheContext) -> bool {
    context.downcast_ref::<UndefinedContext>().is_some()
}

/// Capability every pluggable cache backend implements.
///
/// Keys arrive already prefixed and TTLs are milliseconds; `get_many`
/// results must align positionally with the input keys. `forget` and
/// `flush` take no context, matching the rest of the capability's
/// context-first signatures only where the context is meaningful.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    async fn get(&self, context: &CacheContext, key: &str) -> CacheResult<Option<CacheValue>>;

    async fn put(
        &self,
        context: &CacheContext,
        key: &str,
        value: CacheValue,
        ttl_ms: u64
    ) -> CacheResult<()>;

    async fn put_many(
        &self,
        context: &CacheContext,
        values: HashMap<String, CacheValue>,
        ttl_ms: u64
    ) -> CacheResult<()>;

    async fn get_many(
        &self,
        context: &CacheContext,
        keys: &[String]
    ) -> CacheResult<Vec<Option<CacheValue>>>;

    async fn forget(&self, key: &str) -> CacheResult<()>;

    async fn flush(&self) -> CacheResult<()>;
}
