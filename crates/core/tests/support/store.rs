use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use eyecare_core::ports::KeyValueStore;
use eyecare_domain::Result as DomainResult;
use parking_lot::Mutex;

/// In-memory mock for `KeyValueStore`.
///
/// A sticky store ignores removals, for exercising logout verification.
#[derive(Default, Clone)]
pub struct MockStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    sticky: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one entry.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.values.lock().insert(key.to_string(), value.to_string());
        self
    }

    /// Store whose `remove` silently keeps the value.
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MockStore {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        if !self.sticky {
            self.values.lock().remove(key);
        }
        Ok(())
    }
}
