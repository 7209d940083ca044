//! Session store implementations of [`KeyValueStore`]

mod memory;
mod sqlite;

use std::sync::Arc;

use eyecare_core::ports::KeyValueStore;
use eyecare_domain::{Result, StorageConfig};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Open the store selected by configuration: SQLite when a path is set,
/// otherwise an in-memory map.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.path.as_deref() {
        Some(path) => Ok(Arc::new(SqliteStore::open(path)?)),
        None => {
            tracing::debug!("no store path configured, keeping the session in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
