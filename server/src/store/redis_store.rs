use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use bb8_redis::redis::AsyncCommands;
use bb8_redis::RedisConnectionManager;
use tracing::{debug, info, instrument};

use super::{StoreError, TodoStore};
use crate::settings::RedisSettings;

/// Todos stored as fields of one Redis hash.
#[derive(Debug)]
pub struct RedisStore {
    pool: Pool<RedisConnectionManager>,
    namespace: String,
}

impl RedisStore {
    /// Build the pool and check out one connection to prove the server is
    /// reachable.
    pub async fn connect(settings: &RedisSettings, namespace: &str) -> Result<Self, StoreError> {
        let manager = RedisConnectionManager::new(settings.connection_info())?;
        let pool = Pool::builder()
            .max_size(settings.pool_size)
            .build(manager)
            .await?;

        pool.get()
            .await
            .map(drop)
            .map_err(|e| StoreError::Pool(e.to_string()))?;

        info!(
            host = %settings.host,
            port = settings.port,
            db = settings.db,
            namespace,
            "connected to redis"
        );

        Ok(Self {
            pool,
            namespace: namespace.to_string(),
        })
    }

    async fn conn(&self) -> Result<PooledConnection<'_, RedisConnectionManager>, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))
    }
}

#[async_trait]
impl TodoStore for RedisStore {
    #[instrument(level = "debug", skip(self))]
    async fn get(&self, id: u64) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn.hget(&self.namespace, id).await?;
        Ok(value)
    }

    #[instrument(level = "debug", skip(self))]
    async fn values(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn().await?;
        let values: Vec<String> = conn.hvals(&self.namespace).await?;
        debug!(count = values.len(), "loaded todos");
        Ok(values)
    }

    #[instrument(level = "debug", skip(self, value))]
    async fn set(&self, id: u64, value: String) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        conn.hset::<_, _, _, ()>(&self.namespace, id, value).await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn remove(&self, id: u64) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        let removed: i64 = conn.hdel(&self.namespace, id).await?;
        debug!(removed, "hdel");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn clear(&self) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(&self.namespace).await?;
        Ok(())
    }
}
