//! Uniform random delay strategy.

use rand::Rng;
use std::time::Duration;

use super::Backoff;

/// Returns a delay drawn uniformly from `[min, max]` (inclusive) on each call.
#[derive(Debug, Clone, Copy)]
pub struct Random {
    min_ms: u64,
    max_ms: u64,
}

impl Random {
    /// # Panics
    ///
    /// Panics if `max < min`; an inverted range is a contract violation.
    pub fn new(min: Duration, max: Duration) -> Self {
        assert!(max >= min, "random backoff range inverted: max < min");
        Self {
            min_ms: min.as_millis() as u64,
            max_ms: max.as_millis() as u64,
        }
    }
}

impl Backoff for Random {
    fn next_delay(&mut self) -> Duration {
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }
}
