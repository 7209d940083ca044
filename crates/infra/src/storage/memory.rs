use std::collections::HashMap;

use async_trait::async_trait;
use eyecare_core::ports::KeyValueStore;
use eyecare_domain::Result;
use parking_lot::RwLock;

/// Process-lifetime store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_replaces_and_remove_is_idempotent() {
        let store = MemoryStore::new();
        assert_eq!(store.get("user").await.unwrap(), None);

        store.set("user", "u1").await.unwrap();
        store.set("user", "u2").await.unwrap();
        assert_eq!(store.get("user").await.unwrap().as_deref(), Some("u2"));

        store.remove("user").await.unwrap();
        store.remove("user").await.unwrap();
        assert_eq!(store.get("user").await.unwrap(), None);
    }
}
