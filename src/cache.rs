//! # Shared Cache
//!
//! Key/value store shared by every robot in the process. Entries expire a
//! fixed time after insertion; eviction itself is left entirely to
//! [`moka::future::Cache`].

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;

/// Default entry lifetime: one hour
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Cheap-to-clone handle to the process-wide TTL cache.
#[derive(Clone)]
pub struct SharedCache {
    inner: Cache<Arc<str>, Value>,
    ttl: Duration,
}

impl SharedCache {
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder().time_to_live(ttl).build();
        Self { inner, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: impl Into<Arc<str>>, value: Value) {
        self.inner.insert(key.into(), value).await;
    }

    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// Concurrent misses for the same key share one computation.
    pub async fn get_or_insert_with<F>(&self, key: &str, init: F) -> Value
    where
        F: std::future::Future<Output = Value>,
    {
        self.inner.get_with(Arc::from(key), init).await
    }
}

impl Default for SharedCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl std::fmt::Debug for SharedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}
