//! Testing utilities and helpers
//!
//! This module provides deterministic doubles for the runtime tier:
//! - **[`sleeper`]**: a [`Sleeper`](crate::resilience::Sleeper) that records
//!   requested delays and returns immediately
//! - **[`mocks`]**: scripted async operations that count their invocations
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use eyecare_common::resilience::{RetryExecutor, RetryPolicy};
//! use eyecare_common::testing::{RecordingSleeper, ScriptedOperation};
//!
//! # tokio_test_block_on(async {
//! let sleeper = RecordingSleeper::new();
//! let op = ScriptedOperation::fail_then_succeed(vec!["offline".to_string()], 7);
//! let executor = RetryExecutor::new(RetryPolicy::default()).with_sleeper(sleeper.clone());
//!
//! assert_eq!(executor.run(|| op.invoke()).await, Ok(7));
//! assert_eq!(op.calls(), 2);
//! assert_eq!(sleeper.delays(), vec![Duration::from_millis(2000)]);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod mocks;
pub mod sleeper;

pub use mocks::ScriptedOperation;
pub use sleeper::RecordingSleeper;
