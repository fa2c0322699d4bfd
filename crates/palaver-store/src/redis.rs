//! Redis-backed [`KvStore`].
//!
//! A single multiplexed [`ConnectionManager`] is shared by clone; it
//! reconnects on its own, so request handlers never hold a pool.

use async_trait::async_trait;
use ::redis::aio::ConnectionManager;
use ::redis::AsyncCommands;
use tracing::info;

use crate::error::Result;
use crate::kv::KvStore;

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = ::redis::Client::open(url)
            .map_err(crate::error::StoreError::from)?;
        let conn = client.get_connection_manager().await?;
        info!(url = %url, "connected to store");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<i64> {
        let mut conn = self.conn.clone();
        Ok(conn.del(key).await?)
    }

    async fn expire(&self, key: &str, seconds: i64) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.expire(key, seconds).await?;
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.hget(key, field).await?)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<i64> {
        let mut conn = self.conn.clone();
        Ok(conn.hset(key, field, value).await?)
    }

    async fn hgetall(&self, key: &str) -> Result<Vec<(String, String)>> {
        let mut conn = self.conn.clone();
        let all: std::collections::HashMap<String, String> = conn.hgetall(key).await?;
        let mut fields: Vec<(String, String)> = all.into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(fields)
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<i64> {
        let mut conn = self.conn.clone();
        Ok(conn.rpush(key, value).await?)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.lrange(key, start as isize, stop as isize).await?)
    }

    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.ltrim(key, start as isize, stop as isize).await?;
        Ok(())
    }
}
