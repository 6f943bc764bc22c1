//! Redis `SET NX EX` implementation of the lock backend.

use crate::{LockBackend, LockResult};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tracing::info;

/// Lock backend using the standard Redis distributed-lock pattern:
/// `SET key value NX EX ttl` to acquire, `DEL key` to release.
pub struct RedisLockBackend {
    conn: MultiplexedConnection,
}

impl RedisLockBackend {
    /// Connect to Redis.
    pub async fn connect(redis_url: &str) -> LockResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;

        info!("Connected lock backend to Redis");

        Ok(Self { conn })
    }
}

#[async_trait]
impl LockBackend for RedisLockBackend {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> LockResult<bool> {
        let mut conn = self.conn.clone();

        // EX takes whole seconds; a sub-second TTL still needs to expire.
        let ttl_secs = ttl.as_secs().max(1);

        // A nil reply means the key already exists (lock held by someone else).
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await?;

        Ok(reply.as_deref() == Some("OK"))
    }

    async fn release(&self, key: &str) -> LockResult<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(key).await?;
        Ok(())
    }
}
