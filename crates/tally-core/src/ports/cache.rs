//! Key/value cache port. Holds serialized vote lists keyed by post.

use async_trait::async_trait;
use std::time::Duration;

/// String cache shared by the projector and the invalidator.
///
/// Reads are infallible: a backend that cannot answer reports a miss.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value`. `None` keeps it until deleted.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Remove `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn exists(&self, key: &str) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    Connection(String),

    #[error("Cache operation failed: {0}")]
    Operation(String),
}
