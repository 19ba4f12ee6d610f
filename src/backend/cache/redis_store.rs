/**
 * Redis Cache Store
 *
 * `CacheStore` over a multiplexed async Redis connection. A connection is
 * obtained per call; the client handles reuse.
 */

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use crate::backend::cache::store::{CacheError, CacheStore};

#[derive(Clone)]
pub struct RedisCache {
    client: Client,
}

impl RedisCache {
    /// Open a client for `url`; no connection is made until first use
    pub fn new(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(|e| CacheError::Connection(e.to_string()))?;
        Ok(Self { client })
    }

    /// Round-trip a PING so startup can report an unreachable server
    pub async fn check_connection(&self) -> Result<(), CacheError> {
        let mut con = self.connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut con)
            .await
            .map_err(|e| CacheError::Command(e.to_string()))?;
        Ok(())
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, CacheError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut con = self.connection().await?;
        con.get(key)
            .await
            .map_err(|e| CacheError::Command(e.to_string()))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut con = self.connection().await?;
        let _: () = con
            .set_ex(key, value, ttl.as_secs())
            .await
            .map_err(|e| CacheError::Command(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut con = self.connection().await?;
        let _: () = con
            .del(key)
            .await
            .map_err(|e| CacheError::Command(e.to_string()))?;
        Ok(())
    }
}
