//! Retried reads against the portal backend
//!
//! [`Fetcher`] binds the generic retry executor to [`EyeCareError`]: only
//! transient failures (network, 5xx, 429, malformed body) are retried, and an optional
//! cancellation token turns an abandoned sequence into
//! [`EyeCareError::Cancelled`].

use std::future::Future;
use std::sync::Arc;

use eyecare_common::resilience::{
    policies, FailureClassifier, FailureKind, RetryError, RetryExecutor, RetryPolicy, Sleeper,
    TokioSleeper,
};
use eyecare_domain::{EyeCareError, Result, RetrySettings};
use tokio_util::sync::CancellationToken;

/// Retries [`EyeCareError::is_transient`] failures only
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientErrors;

impl FailureClassifier<EyeCareError> for TransientErrors {
    fn classify(&self, error: &EyeCareError) -> FailureKind {
        if error.is_transient() {
            FailureKind::Transient
        } else {
            FailureKind::Terminal
        }
    }
}

/// Runs one backend read under the retry policy
#[derive(Clone)]
pub struct Fetcher {
    executor: RetryExecutor<TransientErrors, Arc<dyn Sleeper>>,
    single: RetryExecutor<policies::NeverRetry>,
    cancellation: Option<CancellationToken>,
}

impl Fetcher {
    pub fn new(policy: RetryPolicy) -> Self {
        let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
        Self {
            executor: RetryExecutor::new(policy)
                .with_classifier(TransientErrors)
                .with_sleeper(sleeper),
            single: RetryExecutor::new(RetryPolicy::with_max_attempts(1))
                .with_classifier(policies::NeverRetry),
            cancellation: None,
        }
    }

    /// Fetcher configured from the `[retry]` settings
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(RetryPolicy::new(settings.max_attempts, settings.base_delay()))
    }

    /// Replace the delay primitive
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.executor = self.executor.with_sleeper(sleeper);
        self
    }

    /// Abandon in-flight sequences when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        self.executor.policy()
    }

    /// Run `operation` until it succeeds, fails terminally, or the attempt
    /// bound is reached. The final error is returned as produced.
    pub async fn fetch<F, Fut, T>(&self, what: &str, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.drive(&self.executor, what, operation).await
    }

    /// Run `operation` exactly once, still honouring cancellation.
    pub async fn attempt_once<F, Fut, T>(&self, what: &str, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.drive(&self.single, what, operation).await
    }

    async fn drive<C, S, F, Fut, T>(
        &self,
        executor: &RetryExecutor<C, S>,
        what: &str,
        operation: F,
    ) -> Result<T>
    where
        C: FailureClassifier<EyeCareError>,
        S: Sleeper,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(token) = &self.cancellation else {
            return executor.run(operation).await;
        };

        executor.run_cancellable(token, operation).await.map_err(|err| match err {
            RetryError::Failed(error) => error,
            RetryError::Cancelled { attempts } => {
                EyeCareError::Cancelled(format!("{what} cancelled after {attempts} attempt(s)"))
            }
        })
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("policy", self.policy())
            .field("cancellable", &self.cancellation.is_some())
            .finish()
    }
}
