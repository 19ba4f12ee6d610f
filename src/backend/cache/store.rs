/**
 * Cache Store
 *
 * The key-value seam the cache helper talks to. Values are opaque strings
 * (serialized JSON); expiry is set per write.
 */

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection failed: {0}")]
    Connection(String),

    #[error("cache command failed: {0}")]
    Command(String),
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration)
        -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use tokio::sync::Mutex;

    use super::*;

    /// In-process store for tests; expiry is ignored
    #[derive(Default)]
    pub struct MemoryCache {
        entries: Mutex<HashMap<String, String>>,
        failing: AtomicBool,
    }

    impl MemoryCache {
        /// Make every subsequent call fail
        pub fn fail(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }

        pub async fn raw(&self, key: &str) -> Option<String> {
            self.entries.lock().await.get(key).cloned()
        }

        pub async fn put_raw(&self, key: &str, value: &str) {
            self.entries
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
        }

        fn check(&self) -> Result<(), CacheError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(CacheError::Connection("cache is down".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CacheStore for MemoryCache {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.check()?;
            Ok(self.entries.lock().await.get(key).cloned())
        }

        async fn set_with_ttl(
            &self,
            key: &str,
            value: String,
            _ttl: Duration,
        ) -> Result<(), CacheError> {
            self.check()?;
            self.entries.lock().await.insert(key.to_string(), value);
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.check()?;
            self.entries.lock().await.remove(key);
            Ok(())
        }
    }
}
