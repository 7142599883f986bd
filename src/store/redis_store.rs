//! Redis-backed config store

use super::ConfigStore;
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

/// Config store on a Redis server
#[derive(Clone)]
pub struct RedisStore {
    url: String,
    conn: MultiplexedConnection,
}

impl RedisStore {
    /// Connect and verify the server answers `PING`
    pub async fn connect(url: &str) -> Result<Self> {
        let connection_error = |e: redis::RedisError| AgentError::StoreConnection {
            url: url.to_string(),
            message: e.to_string(),
        };

        let client = redis::Client::open(url).map_err(connection_error)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(connection_error)?;

        let store = Self {
            url: url.to_string(),
            conn,
        };
        store.ping().await.map_err(|e| AgentError::StoreConnection {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tracing::info!(url = %url, "Connected to config store");
        Ok(store)
    }
}

#[async_trait]
impl ConfigStore for RedisStore {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: usize = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let mut keys: Vec<String> = conn.keys(pattern).await?;
        keys.sort();
        Ok(keys)
    }
}
