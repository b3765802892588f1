use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, TodoStore};

/// In-process stand-in for the Redis hash.
#[derive(Debug, Default)]
pub struct MemoryStore {
    fields: RwLock<HashMap<u64, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn get(&self, id: u64) -> Result<Option<String>, StoreError> {
        Ok(self.fields.read().await.get(&id).cloned())
    }

    async fn values(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.fields.read().await.values().cloned().collect())
    }

    async fn set(&self, id: u64, value: String) -> Result<(), StoreError> {
        self.fields.write().await.insert(id, value);
        Ok(())
    }

    async fn remove(&self, id: u64) -> Result<(), StoreError> {
        self.fields.write().await.remove(&id);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.fields.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get(1).await.unwrap().is_none());

        store.set(1, "{\"id\":1}".to_string()).await.unwrap();
        assert_eq!(store.get(1).await.unwrap().as_deref(), Some("{\"id\":1}"));

        store.remove(1).await.unwrap();
        store.remove(1).await.unwrap();
        assert!(store.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_empties_values() {
        let store = MemoryStore::new();
        store.set(1, "a".to_string()).await.unwrap();
        store.set(2, "b".to_string()).await.unwrap();
        assert_eq!(store.values().await.unwrap().len(), 2);

        store.clear().await.unwrap();
        assert!(store.values().await.unwrap().is_empty());
    }
}
