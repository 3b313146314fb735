//! Cache-access façade
//!
//! One API over swappable named storage backends and named contexts:
//!
//! - register storages/contexts by name, pick the default with
//!   `enable_storage` / `enable_context` (last call wins)
//! - `via_storage` / `via_context` target a non-default dimension for a
//!   single call site without touching global state
//! - the configured key prefix and default TTL are applied uniformly to
//!   single and batch operations, read live from [`crate::config`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cachefront::{CacheConfig, CacheManager, InMemoryStorage};
//!
//! # async fn demo() -> cachefront::CacheResult<()> {
//! let manager = CacheManager::new(CacheConfig::default().into_shared());
//! manager
//!     .register_storage("memory", Arc::new(InMemoryStorage::new()))
//!     .enable_storage("memory")?;
//!
//! manager.put("greeting", serde_json::json!("hello"), None).await?;
//! let hit = manager.get("greeting").await?;
//! # Ok(())
//! # }
//! ```

use crate::config::CACHE_CONFIG;
use once_cell::sync::Lazy;

pub mod manager;
pub mod memory;
pub mod scoped;
pub mod storage;


pub use manager::CacheManager;
pub use memory::InMemoryStorage;
pub use scoped::ScopedCache;
pub use storage::{
    is_undefined_context,
    undefined_context,
    CacheContext,
    CacheStorage,
    CacheValue,
    UndefinedContext,
};

/// Process-wide manager over the global configuration. Call
/// [`CacheManager::initialize`] once at startup to register the built-in
/// storages and seed the active selection.
pub static CACHE_MANAGER: Lazy<CacheManager> = Lazy::new(|| CacheManager::new(CACHE_CONFIG.clone()));

/// Global manager accessor
pub fn cache_manager() -> &'static CacheManager {
    &CACHE_MANAGER
}
