pub mod cache;
pub mod config;
pub mod errors;

pub use cache::{
    cache_manager,
    is_undefined_context,
    undefined_context,
    CacheContext,
    CacheManager,
    CacheStorage,
    CacheValue,
    InMemoryStorage,
    ScopedCache,
    UndefinedContext,
};
pub use config::{ get_config, update_config, CacheConfig, SharedConfig };
pub use errors::{ CacheError, CacheResult };
