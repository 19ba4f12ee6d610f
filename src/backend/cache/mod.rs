//! Cache Module
//!
//! Best-effort caching of serialized entities with a fixed expiry. A miss,
//! a deserialization failure and an unreachable store all look the same to
//! callers: no value. Failures are logged, never returned.
//!
//! # Module Structure
//!
//! ```text
//! cache/
//! ├── mod.rs          - Cache helper
//! ├── store.rs        - CacheStore trait and CacheError
//! └── redis_store.rs  - Redis implementation
//! ```

pub mod store;
pub mod redis_store;

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

pub use redis_store::RedisCache;
pub use store::{CacheError, CacheStore};

/// Expiry applied to every cached entry
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache key for the article stored under `slug`
pub fn article_key(slug: &str) -> String {
    format!("article:{}", slug)
}

/// Optional cache store plus the fixed TTL
#[derive(Clone)]
pub struct Cache {
    store: Option<Arc<dyn CacheStore>>,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store.as_ref()?;
        let raw = match store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("cache miss: {}", key);
                return None;
            }
            Err(e) => {
                tracing::warn!("cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!("cache hit: {}", key);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("discarding undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("failed to serialize cache entry {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = store.set_with_ttl(key, raw, CACHE_TTL).await {
            tracing::warn!("cache write failed for {}: {}", key, e);
        }
    }

    pub async fn invalidate(&self, key: &str) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if let Err(e) = store.delete(key).await {
            tracing::warn!("cache invalidation failed for {}: {}", key, e);
        }
    }
}
