//! Stream parameters — aggregator batching control.
//!
//! [`StreamParams`] groups the static parameters that control how
//! [`StreamReplyUseCase`](crate::use_cases::stream_reply::StreamReplyUseCase)
//! batches chunks into broadcast events. These are application-layer
//! concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default flush window: bounds broadcast rate to ~10 events/second while
/// adding at most one window of latency.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(100);

/// Batching parameters for the streaming aggregator.
///
/// The flush policy is time-triggered, not size-triggered: a single pending
/// character is flushed once the window elapses, and an arbitrarily large
/// pending buffer goes out in one event if the window has already elapsed
/// at append time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamParams {
    /// Minimum time between two non-terminal broadcast events.
    pub flush_interval: Duration,
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl StreamParams {
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }
}
