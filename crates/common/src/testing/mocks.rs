//! Mock implementations of retryable operations
//!
//! Provides scripted operations for exercising retry loops.

use std::collections::VecDeque;
use std::future::{ready, Ready};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Async operation that returns scripted results and counts invocations
///
/// Results are returned in script order; once the script is drained every
/// further call returns the fallback result.
///
/// # Examples
///
/// ```
/// use eyecare_common::testing::ScriptedOperation;
///
/// let op = ScriptedOperation::always_fail("offline");
/// assert_eq!(op.next_result(), Err::<(), _>("offline"));
/// assert_eq!(op.calls(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedOperation<T, E> {
    script: Arc<Mutex<VecDeque<Result<T, E>>>>,
    fallback: Result<T, E>,
    calls: Arc<AtomicU32>,
}

impl<T: Clone, E: Clone> ScriptedOperation<T, E> {
    /// Operation returning each of `script` once, then `fallback` forever
    pub fn new(script: Vec<Result<T, E>>, fallback: Result<T, E>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            fallback,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Fails once per entry of `errors`, then succeeds with `value`
    pub fn fail_then_succeed(errors: Vec<E>, value: T) -> Self {
        Self::new(errors.into_iter().map(Err).collect(), Ok(value))
    }

    /// Fails with `error` on every call
    pub fn always_fail(error: E) -> Self {
        Self::new(Vec::new(), Err(error))
    }

    /// Produce the next scripted result, counting the call
    pub fn next_result(&self) -> Result<T, E> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().pop_front().unwrap_or_else(|| self.fallback.clone())
    }

    /// Invoke the operation as a future, matching retry executor closures
    pub fn invoke(&self) -> Ready<Result<T, E>> {
        ready(self.next_result())
    }

    /// Number of invocations so far
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_script_then_uses_fallback() {
        let op = ScriptedOperation::fail_then_succeed(vec!["a", "b"], 1);
        assert_eq!(op.next_result(), Err("a"));
        assert_eq!(op.next_result(), Err("b"));
        assert_eq!(op.next_result(), Ok(1));
        assert_eq!(op.next_result(), Ok(1));
        assert_eq!(op.calls(), 4);
    }

    #[test]
    fn clones_share_call_count() {
        let op = ScriptedOperation::<(), _>::always_fail("down");
        let other = op.clone();
        let _ = other.next_result();
        let _ = op.next_result();
        assert_eq!(op.calls(), 2);
    }
}
