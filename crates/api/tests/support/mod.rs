//! Shared helpers for command integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use eyecare_common::resilience::{RetryPolicy, Sleeper};
use eyecare_common::testing::RecordingSleeper;
use eyecare_core::ports::KeyValueStore;
use eyecare_core::Fetcher;
use eyecare_domain::PortalConfig;
use eyecare_infra::{HttpClient, MemoryStore, PortalApiClient};
use eyecare_lib::AppContext;
use wiremock::MockServer;

/// Context wired to a wiremock backend with an in-memory session and a
/// recording sleeper in place of real backoff waits.
pub fn test_context(server: &MockServer) -> (AppContext, RecordingSleeper) {
    test_context_with_store(server, Arc::new(MemoryStore::new()))
}

/// Like [`test_context`], over a store the caller keeps a handle to; two
/// contexts sharing one store stand in for two runs over a persistent store.
pub fn test_context_with_store(
    server: &MockServer,
    store: Arc<dyn KeyValueStore>,
) -> (AppContext, RecordingSleeper) {
    let mut config = PortalConfig::default();
    config.api.base_url = server.uri();

    let http = HttpClient::new().expect("http client should build");
    let api = Arc::new(PortalApiClient::new(http, &server.uri()).expect("mock uri is valid"));

    let sleeper = RecordingSleeper::new();
    let shared: Arc<dyn Sleeper> = Arc::new(sleeper.clone());
    let fetcher = Fetcher::new(RetryPolicy::default()).with_sleeper(shared);

    (AppContext::from_parts(config, api, store, fetcher), sleeper)
}
