//! Shared helpers for `eyecare-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use eyecare_common::resilience::{RetryPolicy, Sleeper};
use eyecare_common::testing::RecordingSleeper;
use eyecare_core::Fetcher;
use eyecare_infra::{HttpClient, PortalApiClient, SqliteStore};
use tempfile::TempDir;
use wiremock::MockServer;

/// API client pointed at a wiremock server.
pub fn portal_client(server: &MockServer) -> Arc<PortalApiClient> {
    let http = HttpClient::new().expect("http client should build");
    Arc::new(PortalApiClient::new(http, &server.uri()).expect("mock server uri is valid"))
}

/// Fetcher with the default policy whose waits are recorded, not slept.
pub fn recording_fetcher() -> (Fetcher, RecordingSleeper) {
    let sleeper = RecordingSleeper::new();
    let shared: Arc<dyn Sleeper> = Arc::new(sleeper.clone());
    (Fetcher::new(RetryPolicy::default()).with_sleeper(shared), sleeper)
}

/// SQLite store in a temporary directory that lives as long as the guard.
pub struct TempStore {
    pub store: Arc<SqliteStore>,
    _dir: TempDir,
}

impl TempStore {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = SqliteStore::open(dir.path().join("session.db")).expect("store should open");
        Self { store: Arc::new(store), _dir: dir }
    }
}
