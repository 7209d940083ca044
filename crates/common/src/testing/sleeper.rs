//! Recording delay primitive

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::resilience::Sleeper;

/// Sleeper that records every requested delay without waiting
///
/// Clones share the same record, so a test can keep one handle and give the
/// other to the code under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in call order
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }

    /// Number of sleeps requested
    pub fn count(&self) -> usize {
        self.delays.lock().len()
    }

    /// Sum of all requested delays
    pub fn total(&self) -> Duration {
        self.delays.lock().iter().copied().fold(Duration::ZERO, Duration::saturating_add)
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().push(delay);
        // Keep the suspension point so callers still yield between attempts
        tokio::task::yield_now().await;
    }
}
