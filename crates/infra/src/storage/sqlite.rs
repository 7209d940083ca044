//! SQLite-backed session store
//!
//! Values live in a single `kv_store` table. Connections come from an r2d2
//! pool and every query runs on the blocking thread pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use eyecare_core::ports::KeyValueStore;
use eyecare_domain::{EyeCareError, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use tokio::task;
use tracing::info;

use crate::errors::InfraError;

const POOL_SIZE: u32 = 4;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
)";

type SqlitePool = Pool<SqliteConnectionManager>;

/// Persistent [`KeyValueStore`] in a SQLite file
#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (creating if needed) the store at `path` and ensure its schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(EyeCareError::Storage(format!(
                    "session store directory does not exist: {}",
                    parent.display()
                )));
            }
        }
        let manager = SqliteConnectionManager::file(&path);
        let pool = Pool::builder().max_size(POOL_SIZE).build(manager).map_err(map_pool_error)?;

        let store = Self { pool: Arc::new(pool), path };
        store.connection()?.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;

        info!(db_path = %store.path.display(), max_connections = POOL_SIZE, "session store opened");
        Ok(store)
    }

    /// Return the database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(map_pool_error)
    }

    /// Run `work` with a pooled connection on the blocking thread pool.
    async fn with_connection<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let store = self.clone();
        task::spawn_blocking(move || -> Result<T> {
            let conn = store.connection()?;
            work(&conn).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").field("path", &self.path).finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.with_connection(move |conn| {
            conn.query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, CAST(strftime('%s','now') AS INTEGER))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value],
            )
            .map(|_| ())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.with_connection(move |conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key]).map(|_| ())
        })
        .await
    }
}

fn map_sql_error(err: rusqlite::Error) -> EyeCareError {
    EyeCareError::from(InfraError::from(err))
}

fn map_pool_error(err: r2d2::Error) -> EyeCareError {
    EyeCareError::from(InfraError::from(err))
}

fn map_join_error(err: task::JoinError) -> EyeCareError {
    EyeCareError::Internal(format!("session store task failed: {err}"))
}
