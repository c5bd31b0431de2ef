//! Jittered exponential delay strategy.

use rand::Rng;
use std::time::Duration;

use super::Backoff;

/// Draws uniformly from `[0, 2^n)` milliseconds, where `n` grows by one per
/// call while `2^n` is still below `max`. The cap applies to range growth,
/// not to individual draws: once growth stops the range stays at its last
/// (possibly above-`max`) width and draws from it are never clamped. Wrap in
/// [`Limited`](super::Limited) to bound the output itself.
#[derive(Debug, Clone, Copy)]
pub struct Exponential {
    max_range_ms: u64,
    exponent: u32,
}

impl Exponential {
    /// `max` is the growth ceiling for the draw range, in wall time.
    pub fn new(max: Duration) -> Self {
        Self {
            max_range_ms: max.as_millis() as u64,
            exponent: 0,
        }
    }

    fn range_ms(&self) -> u64 {
        1u64.checked_shl(self.exponent).unwrap_or(u64::MAX)
    }
}

impl Backoff for Exponential {
    fn next_delay(&mut self) -> Duration {
        let range = self.range_ms();
        let ms = rand::rng().random_range(0..range.max(1));
        if range < self.max_range_ms {
            self.exponent += 1;
        }
        Duration::from_millis(ms)
    }
}
