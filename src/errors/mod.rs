use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Unknown cache storage: {0}")] UnknownStorage(String),

    #[error("Unknown cache context: {0}")] UnknownContext(String),

    #[error("No cache storage enabled")] NoActiveStorage,

    #[error("Storage backend error: {0}")] Backend(String),

    #[error("Serialization error: {0}")] Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// True for errors raised during name resolution, before any backend
    /// call was attempted.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            CacheError::UnknownStorage(_) |
                CacheError::UnknownContext(_) |
                CacheError::NoActiveStorage
        )
    }
}

pub type CacheResult<T> = Result<T, CacheError>;
