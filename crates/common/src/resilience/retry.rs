//! Retry with exponential backoff for fallible async operations
//!
//! The executor attempts an operation, and on failure suspends for
//! `base_delay * 2^attempt` before the next attempt, up to
//! [`RetryPolicy::max_attempts`] attempts in total. When the bound is reached
//! the error of the final attempt is returned unchanged so callers can inspect
//! the concrete cause.
//!
//! Each attempt result is first converted into a [`RetryStep`] by the policy,
//! which keeps the retry decision as plain data instead of control flow spread
//! across the loop.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Attempts made when no explicit bound is given.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base of the backoff series; the wait before attempt `k` is
/// `DEFAULT_BASE_DELAY * 2^(k-1)`.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Errors raised while building a [`RetryPolicy`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryConfigError {
    /// The retry policy configuration is invalid
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Errors surfaced by [`RetryExecutor::run_cancellable`]
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The cancellation token fired before the sequence finished
    #[error("Retry sequence cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },

    /// The operation failed on its final permitted attempt, or with a
    /// terminal error
    #[error("{0}")]
    Failed(E),
}

impl<E> RetryError<E> {
    /// Returns the operation error, if the sequence was not cancelled.
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Cancelled { .. } => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Whether a failure is worth another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Retry after the backoff delay
    Transient,
    /// Propagate immediately
    Terminal,
}

/// Trait for deciding whether an error should be retried
pub trait FailureClassifier<E> {
    fn classify(&self, error: &E) -> FailureKind;
}

/// What the executor does after an attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryStep<T, E> {
    /// The attempt succeeded; no further attempts are made
    Complete(T),
    /// Suspend for `delay`, then attempt again
    RetryAfter { delay: Duration, error: E },
    /// Stop and hand `error` to the caller unchanged
    GiveUp { attempts: u32, error: E },
}

/// Attempt bound and backoff series for one logical fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, base_delay: DEFAULT_BASE_DELAY }
    }
}

impl RetryPolicy {
    /// Create a policy, clamping `max_attempts` to at least one attempt.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_delay }
    }

    /// Default base delay with a custom attempt bound
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self::new(max_attempts, DEFAULT_BASE_DELAY)
    }

    /// Create a policy builder that validates instead of clamping
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Suspension before attempt `attempt` (1-based).
    ///
    /// The first attempt never waits; attempt `k >= 2` waits
    /// `base_delay * 2^(k-1)`, saturating at [`Duration::MAX`].
    pub fn delay_before_attempt(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Sum of every backoff wait a fully failing sequence performs.
    pub fn total_backoff(&self) -> Duration {
        (2..=self.max_attempts)
            .map(|attempt| self.delay_before_attempt(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Decide what follows attempt number `attempt` (1-based).
    pub fn step<T, E, C>(&self, attempt: u32, result: Result<T, E>, classifier: &C) -> RetryStep<T, E>
    where
        C: FailureClassifier<E> + ?Sized,
    {
        match result {
            Ok(value) => RetryStep::Complete(value),
            Err(error) => {
                if attempt >= self.max_attempts
                    || classifier.classify(&error) == FailureKind::Terminal
                {
                    RetryStep::GiveUp { attempts: attempt, error }
                } else {
                    RetryStep::RetryAfter { delay: self.delay_before_attempt(attempt + 1), error }
                }
            }
        }
    }
}

/// Builder for [`RetryPolicy`] with fluent API
#[derive(Debug)]
pub struct RetryPolicyBuilder {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicyBuilder {
    pub fn new() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, base_delay: DEFAULT_BASE_DELAY }
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn build(self) -> Result<RetryPolicy, RetryConfigError> {
        if self.max_attempts == 0 {
            return Err(RetryConfigError::InvalidConfiguration {
                message: "max_attempts must be greater than 0".to_string(),
            });
        }
        Ok(RetryPolicy { max_attempts: self.max_attempts, base_delay: self.base_delay })
    }
}

/// The delay primitive used between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl<S: Sleeper + ?Sized> Sleeper for Arc<S> {
    async fn sleep(&self, delay: Duration) {
        (**self).sleep(delay).await;
    }
}

/// Drives the attempt loop for one logical fetch
#[derive(Debug, Clone)]
pub struct RetryExecutor<C = policies::RetryAnyError, S = TokioSleeper> {
    policy: RetryPolicy,
    classifier: C,
    sleeper: S,
}

impl RetryExecutor {
    /// Executor that retries every failure and sleeps on the tokio timer
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, classifier: policies::RetryAnyError, sleeper: TokioSleeper }
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl<C, S> RetryExecutor<C, S> {
    /// Replace the failure classifier
    pub fn with_classifier<C2>(self, classifier: C2) -> RetryExecutor<C2, S> {
        RetryExecutor { policy: self.policy, classifier, sleeper: self.sleeper }
    }

    /// Replace the delay primitive
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryExecutor<C, S2> {
        RetryExecutor { policy: self.policy, classifier: self.classifier, sleeper }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<C, S: Sleeper> RetryExecutor<C, S> {
    /// Execute an operation with retry logic.
    ///
    /// Runs until the operation succeeds or the policy gives up; the error of
    /// the final attempt is returned unchanged.
    #[instrument(skip_all, fields(max_attempts = self.policy.max_attempts))]
    pub async fn run<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        C: FailureClassifier<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = AtomicU32::new(0);
        self.run_counted(operation, &attempts).await
    }

    /// Execute an operation with retry logic until it finishes or `token`
    /// is cancelled.
    ///
    /// Cancellation drops the in-flight attempt or backoff wait; no further
    /// attempts are started.
    #[instrument(skip_all, fields(max_attempts = self.policy.max_attempts))]
    pub async fn run_cancellable<F, Fut, T, E>(
        &self,
        token: &CancellationToken,
        operation: F,
    ) -> Result<T, RetryError<E>>
    where
        C: FailureClassifier<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = AtomicU32::new(0);
        tokio::select! {
            biased;
            () = token.cancelled() => {
                let attempts = attempts.load(Ordering::SeqCst);
                debug!(attempts, "retry sequence cancelled");
                Err(RetryError::Cancelled { attempts })
            }
            result = self.run_counted(operation, &attempts) => result.map_err(RetryError::Failed),
        }
    }

    async fn run_counted<F, Fut, T, E>(&self, mut operation: F, attempts: &AtomicU32) -> Result<T, E>
    where
        C: FailureClassifier<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        loop {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            debug!("Executing operation (attempt {}/{})", attempt, self.policy.max_attempts);

            match self.policy.step(attempt, operation().await, &self.classifier) {
                RetryStep::Complete(value) => {
                    if attempt > 1 {
                        debug!("Operation succeeded after {} retries", attempt - 1);
                    }
                    return Ok(value);
                }
                RetryStep::GiveUp { attempts, error } => {
                    warn!(attempts, error = %error, "giving up on operation");
                    return Err(error);
                }
                RetryStep::RetryAfter { delay, error } => {
                    warn!(
                        "Operation failed (attempt {}): {}; retrying after {:?}",
                        attempt, error, delay
                    );
                    self.sleeper.sleep(delay).await;
                }
            }
        }
    }
}

/// Convenience function: retry every failure under `policy`
pub async fn retry_with_policy<F, Fut, T, E>(policy: RetryPolicy, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    RetryExecutor::new(policy).run(operation).await
}

/// Convenience function: up to `max_attempts` attempts with the default
/// one-second backoff base
pub async fn fetch_with_retry<F, Fut, T, E>(max_attempts: u32, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    retry_with_policy(RetryPolicy::with_max_attempts(max_attempts), operation).await
}

/// Pre-defined failure classifiers
pub mod policies {
    use super::{FailureClassifier, FailureKind};

    /// Treats every failure as transient
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RetryAnyError;

    impl<E> FailureClassifier<E> for RetryAnyError {
        fn classify(&self, _error: &E) -> FailureKind {
            FailureKind::Transient
        }
    }

    /// Treats every failure as terminal (single attempt)
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NeverRetry;

    impl<E> FailureClassifier<E> for NeverRetry {
        fn classify(&self, _error: &E) -> FailureKind {
            FailureKind::Terminal
        }
    }

    /// Predicate-based classifier: `true` means transient
    #[derive(Debug, Clone)]
    pub struct RetryIf<F> {
        predicate: F,
    }

    impl<F> RetryIf<F> {
        pub fn new(predicate: F) -> Self {
            Self { predicate }
        }
    }

    impl<F, E> FailureClassifier<E> for RetryIf<F>
    where
        F: Fn(&E) -> bool,
    {
        fn classify(&self, error: &E) -> FailureKind {
            if (self.predicate)(error) {
                FailureKind::Transient
            } else {
                FailureKind::Terminal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the retry policy and executor
    //!
    //! Delays are captured by a local recording sleeper so no test waits on
    //! the real timer.

    use std::sync::Mutex;

    use super::policies::*;
    use super::*;

    #[derive(Default)]
    struct Recorder {
        delays: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for Recorder {
        async fn sleep(&self, delay: Duration) {
            self.delays.lock().unwrap().push(delay);
        }
    }

    fn executor(max_attempts: u32) -> (RetryExecutor<RetryAnyError, Arc<Recorder>>, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let executor = RetryExecutor::new(RetryPolicy::with_max_attempts(max_attempts))
            .with_sleeper(Arc::clone(&recorder));
        (executor, recorder)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.base_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_delay_series_doubles_from_second_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before_attempt(1), Duration::ZERO);
        assert_eq!(policy.delay_before_attempt(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_before_attempt(3), Duration::from_millis(4000));
        assert_eq!(policy.delay_before_attempt(4), Duration::from_millis(8000));
    }

    #[test]
    fn test_delay_saturates_for_large_attempts() {
        let policy = RetryPolicy::new(100, Duration::from_secs(1));
        assert_eq!(policy.delay_before_attempt(33), Duration::from_secs(u64::from(u32::MAX)));
        let huge = RetryPolicy::new(100, Duration::MAX);
        assert_eq!(huge.delay_before_attempt(5), Duration::MAX);
    }

    #[test]
    fn test_total_backoff_sums_series() {
        assert_eq!(RetryPolicy::default().total_backoff(), Duration::from_millis(6000));
        assert_eq!(RetryPolicy::with_max_attempts(1).total_backoff(), Duration::ZERO);
    }

    #[test]
    fn test_new_clamps_zero_attempts() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[test]
    fn test_builder_rejects_zero_attempts() {
        let err = RetryPolicy::builder().max_attempts(0).build().unwrap_err();
        assert!(matches!(err, RetryConfigError::InvalidConfiguration { .. }));

        let policy = RetryPolicy::builder()
            .max_attempts(5)
            .base_delay(Duration::from_millis(10))
            .build()
            .unwrap();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.base_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_step_decisions() {
        let policy = RetryPolicy::default();

        let step: RetryStep<i32, &str> = policy.step(1, Ok(7), &RetryAnyError);
        assert_eq!(step, RetryStep::Complete(7));

        let step: RetryStep<i32, &str> = policy.step(1, Err("boom"), &RetryAnyError);
        assert_eq!(
            step,
            RetryStep::RetryAfter { delay: Duration::from_millis(2000), error: "boom" }
        );

        let step: RetryStep<i32, &str> = policy.step(3, Err("boom"), &RetryAnyError);
        assert_eq!(step, RetryStep::GiveUp { attempts: 3, error: "boom" });

        let step: RetryStep<i32, &str> = policy.step(1, Err("boom"), &NeverRetry);
        assert_eq!(step, RetryStep::GiveUp { attempts: 1, error: "boom" });
    }

    #[test]
    fn test_retry_if_predicate() {
        let classifier = RetryIf::new(|e: &String| e.contains("timeout"));
        assert_eq!(classifier.classify(&"Connection timeout".to_string()), FailureKind::Transient);
        assert_eq!(classifier.classify(&"Access denied".to_string()), FailureKind::Terminal);
    }

    #[tokio::test]
    async fn test_succeeds_on_first_attempt() {
        let (executor, recorder) = executor(3);
        let calls = AtomicU32::new(0);

        let result = executor
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<i32, String>(42) }
            })
            .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(recorder.delays.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_propagates_final_error_unchanged() {
        let (executor, recorder) = executor(3);
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = executor
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(format!("failure {n}")) }
            })
            .await;

        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            *recorder.delays.lock().unwrap(),
            vec![Duration::from_millis(2000), Duration::from_millis(4000)]
        );
    }

    #[tokio::test]
    async fn test_terminal_error_stops_immediately() {
        let (executor, recorder) = executor(5);
        let executor = executor.with_classifier(RetryIf::new(|e: &String| e != "denied"));
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = executor
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("denied".to_string()) }
            })
            .await;

        assert_eq!(result, Err("denied".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(recorder.delays.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_start_makes_no_attempt() {
        let (executor, _recorder) = executor(3);
        let token = CancellationToken::new();
        token.cancel();
        let calls = AtomicU32::new(0);

        let result: Result<(), RetryError<String>> = executor
            .run_cancellable(&token, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("unreachable".to_string()) }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Cancelled { attempts: 0 })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff_stops_sequence() {
        let executor = RetryExecutor::new(RetryPolicy::default());
        let token = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));

        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(500)).await;
                token.cancel();
            })
        };

        let result: Result<(), RetryError<String>> = executor
            .run_cancellable(&token, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("offline".to_string()) }
            })
            .await;
        canceller.await.unwrap();

        assert!(matches!(result, Err(RetryError::Cancelled { attempts: 1 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_variant_carries_error() {
        let (executor, _recorder) = executor(1);
        let token = CancellationToken::new();

        let result: Result<(), RetryError<String>> =
            executor.run_cancellable(&token, || async { Err("bad".to_string()) }).await;

        let err = result.unwrap_err();
        assert!(!err.is_cancelled());
        assert_eq!(err.into_failure(), Some("bad".to_string()));
    }
}
