//! Redis set implementation of the availability cache.
//!
//! All claimed handles live under a single set key, so membership
//! (`SISMEMBER`), insertion (`SADD`), cardinality (`SCARD`) and bulk reload
//! (`DEL` + batched `SADD`) are each a single command.

use crate::{AvailabilityCache, CacheResult};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tracing::{debug, info};

/// Availability cache backed by a shared Redis set.
pub struct RedisAvailabilityCache {
    conn: MultiplexedConnection,
    set_key: String,
}

impl RedisAvailabilityCache {
    /// Connect to Redis and bind to the given set key.
    pub async fn connect(redis_url: &str, set_key: impl Into<String>) -> CacheResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        let set_key = set_key.into();

        info!(set_key = %set_key, "Connected availability cache to Redis");

        Ok(Self { conn, set_key })
    }

    /// The Redis key holding the handle set.
    pub fn set_key(&self) -> &str {
        &self.set_key
    }
}

#[async_trait]
impl AvailabilityCache for RedisAvailabilityCache {
    async fn contains(&self, name: &str) -> CacheResult<bool> {
        let mut conn = self.conn.clone();
        let member: bool = conn.sismember(&self.set_key, name).await?;
        Ok(member)
    }

    async fn add(&self, name: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.sadd(&self.set_key, name).await?;
        Ok(())
    }

    async fn add_batch(&self, names: &[String]) -> CacheResult<()> {
        if names.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        let added: i64 = conn.sadd(&self.set_key, names).await?;

        debug!(
            batch_size = names.len(),
            added,
            "Added handle batch to cache"
        );

        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(&self.set_key).await?;
        Ok(())
    }

    async fn count(&self) -> CacheResult<u64> {
        let mut conn = self.conn.clone();
        let count: u64 = conn.scard(&self.set_key).await?;
        Ok(count)
    }
}
