//! Hash-map storage behind the todo routes.
//!
//! # Design
//! All todos live as fields of one hash: the field is the decimal id and the
//! value is the JSON-encoded `Todo`. The trait deals in raw JSON strings so a
//! backend never needs to understand the record, and decoding failures stay
//! distinguishable from transport failures.
//!
//! * **RedisStore**: a Redis hash under a single namespace key (production).
//! * **MemoryStore**: an in-process map (tests and `--memory`).

mod memory;
mod redis_store;

use async_trait::async_trait;
use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

/// Failure reported by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] bb8_redis::redis::RedisError),

    #[error("connection pool error: {0}")]
    Pool(String),
}

/// Hash-map operations the service needs from its backing store.
#[async_trait]
pub trait TodoStore: Send + Sync + std::fmt::Debug {
    /// Raw JSON of one todo, or `None` when the id is absent.
    async fn get(&self, id: u64) -> Result<Option<String>, StoreError>;

    /// Raw JSON of every todo, in no particular order.
    async fn values(&self) -> Result<Vec<String>, StoreError>;

    /// Insert or overwrite one todo.
    async fn set(&self, id: u64, value: String) -> Result<(), StoreError>;

    /// Remove one todo. Removing an absent id is not an error.
    async fn remove(&self, id: u64) -> Result<(), StoreError>;

    /// Remove every todo in the namespace.
    async fn clear(&self) -> Result<(), StoreError>;
}
