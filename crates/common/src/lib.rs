//! Modular common utilities shared across EyeCare crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error plumbing without side effects
//! - `runtime`: async infrastructure (resilience)
//! - `observability`: tracing (pulled in by `runtime`)
//! - `test-utils`: deterministic test doubles for the runtime tier

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "test-utils")]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use resilience::{
    fetch_with_retry, retry_with_policy, FailureClassifier, FailureKind, RetryConfigError,
    RetryError, RetryExecutor, RetryPolicy, RetryPolicyBuilder, RetryStep, Sleeper, TokioSleeper,
};
