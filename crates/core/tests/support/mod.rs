//! Shared test helpers for `eyecare-core` integration tests.
//!
//! These helpers provide scripted backend and store doubles so that service
//! tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod portal;
pub mod store;

use std::sync::Arc;

use eyecare_common::resilience::{RetryPolicy, Sleeper};
use eyecare_common::testing::RecordingSleeper;
use eyecare_core::Fetcher;

/// Fetcher with the default policy whose waits are recorded, not slept.
pub fn recording_fetcher() -> (Fetcher, RecordingSleeper) {
    let sleeper = RecordingSleeper::new();
    let shared: Arc<dyn Sleeper> = Arc::new(sleeper.clone());
    (Fetcher::new(RetryPolicy::default()).with_sleeper(shared), sleeper)
}
