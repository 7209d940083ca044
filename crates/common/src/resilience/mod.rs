//! Resilience patterns for fault tolerance
//!
//! This module provides the retry-with-exponential-backoff primitive used by
//! every read path of the portal client. It is generic over the operation's
//! success and error types so that the final error reaches the caller exactly
//! as the operation produced it.
//!
//! ## Pieces
//!
//! - [`RetryPolicy`]: attempt bound and base delay; computes the backoff
//!   series and turns each attempt result into a [`RetryStep`].
//! - [`FailureClassifier`]: decides whether an error is worth another attempt
//!   ([`policies::RetryAnyError`] retries everything).
//! - [`Sleeper`]: the delay primitive, injectable so tests never wait.
//! - [`RetryExecutor`]: drives the attempt loop, optionally under a
//!   [`CancellationToken`](tokio_util::sync::CancellationToken).

pub mod retry;

pub use retry::{
    fetch_with_retry, policies, retry_with_policy, FailureClassifier, FailureKind,
    RetryConfigError, RetryError, RetryExecutor, RetryPolicy, RetryPolicyBuilder, RetryStep,
    Sleeper, TokioSleeper, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS,
};
