use anyhow::{ Context, Result };
use once_cell::sync::Lazy;
use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::Path;
use std::sync::{ Arc, RwLock };

/// Runtime configuration for the cache façade.
///
/// The manager reads this through a [`SharedConfig`] handle on every
/// operation, so changes to `cache_key_prefix` or `record_ttl` take
/// effect on the next call without restarting anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default TTL in milliseconds, used when an operation omits one
    pub record_ttl: u64,
    /// Storage name activated at startup
    pub current_cache_storage: String,
    /// Built-in storages to register at startup
    #[serde(default)]
    pub enabled_cache_storages: Vec<String>,
    /// Prefix prepended verbatim to every user key
    #[serde(default)]
    pub cache_key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            record_ttl: 60_000, // 1 minute
            current_cache_storage: "memory".to_string(),
            enabled_cache_storages: vec!["memory".to_string()],
            cache_key_prefix: String::new(),
        }
    }
}

impl CacheConfig {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            let default_config = Self::default();
            default_config.save(path)?;
            return Ok(default_config);
        }

        let content = fs
            ::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = serde_json
            ::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = serde_json
            ::to_string_pretty(self)
            .with_context(|| "Failed to serialize config")?;

        fs::write(path, content).with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    pub fn reload(&mut self, path: &str) -> Result<()> {
        *self = Self::load(path)?;
        Ok(())
    }

    /// Wrap into the externally mutable handle the manager reads live.
    pub fn into_shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }
}

/// Externally mutable configuration source shared with the manager.
pub type SharedConfig = Arc<RwLock<CacheConfig>>;

/// Process-wide configuration, backing the global cache manager.
pub static CACHE_CONFIG: Lazy<SharedConfig> = Lazy::new(|| CacheConfig::default().into_shared());

/// Snapshot of the process-wide configuration
pub fn get_config() -> CacheConfig {
    CACHE_CONFIG.read().unwrap().clone()
}

/// Mutate the process-wide configuration in place
pub fn update_config<F: FnOnce(&mut CacheConfig)>(f: F) {
    let mut config = CACHE_CONFIG.write().unwrap();
    f(&mut config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.record_ttl, 60_000);
        assert_eq!(config.current_cache_storage, "memory");
        assert_eq!(config.enabled_cache_storages, vec!["memory".to_string()]);
        assert!(config.cache_key_prefix.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let path = path.to_str().unwrap();

        let mut config = CacheConfig::default();
        config.record_ttl = 5_000;
        config.cache_key_prefix = "app:".to_string();
        config.save(path).unwrap();

        let loaded = CacheConfig::load(path).unwrap();
        assert_eq!(loaded.record_ttl, 5_000);
        assert_eq!(loaded.cache_key_prefix, "app:");
    }

    #[test]
    fn test_load_creates_default_file_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let path = path.to_str().unwrap();

        let config = CacheConfig::load(path).unwrap();
        assert_eq!(config.record_ttl, CacheConfig::default().record_ttl);
        assert!(Path::new(path).exists());
    }

    #[test]
    fn test_shared_handle_observes_mutation() {
        let shared = CacheConfig::default().into_shared();
        shared.write().unwrap().cache_key_prefix = "P".to_string();
        assert_eq!(shared.read().unwrap().cache_key_prefix, "P");
    }
}
