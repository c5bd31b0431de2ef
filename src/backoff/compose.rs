//! Decorators that reshape an inner strategy's delays.

use std::time::Duration;

use super::Backoff;

/// Scales the inner delay by a fixed factor. Useful to widen a small jitter
/// range, e.g. `0..1024` multiplied by 100 gives `0..102400` milliseconds.
#[derive(Debug, Clone)]
pub struct Multiplier<B> {
    factor: u32,
    inner: B,
}

impl<B: Backoff> Multiplier<B> {
    pub fn new(factor: u32, inner: B) -> Self {
        Self { factor, inner }
    }
}

impl<B: Backoff> Backoff for Multiplier<B> {
    fn next_delay(&mut self) -> Duration {
        self.inner.next_delay() * self.factor
    }
}

/// Rounds the inner delay up to the nearest multiple of `unit`.
#[derive(Debug, Clone)]
pub struct Nearest<B> {
    unit_ms: u64,
    inner: B,
}

impl<B: Backoff> Nearest<B> {
    pub fn new(unit: Duration, inner: B) -> Self {
        let unit_ms = unit.as_millis() as u64;
        assert!(unit_ms > 0, "rounding unit must be non-zero");
        Self { unit_ms, inner }
    }
}

impl<B: Backoff> Backoff for Nearest<B> {
    fn next_delay(&mut self) -> Duration {
        let ms = self.inner.next_delay().as_millis() as u64;
        let rounded = ms.div_ceil(self.unit_ms) * self.unit_ms;
        Duration::from_millis(rounded)
    }
}

/// Clamps the inner delay into `[min, max]`. Out-of-range values are pinned
/// to the nearer bound, not rejected or re-sampled.
#[derive(Debug, Clone)]
pub struct Limited<B> {
    min: Duration,
    max: Duration,
    inner: B,
}

impl<B: Backoff> Limited<B> {
    pub fn new(min: Duration, max: Duration, inner: B) -> Self {
        Self { min, max, inner }
    }
}

impl<B: Backoff> Backoff for Limited<B> {
    fn next_delay(&mut self) -> Duration {
        self.inner.next_delay().clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::{Constant, Random};

    #[test]
    fn multiplier_scales() {
        let mut b = Multiplier::new(100, Constant::new(Duration::from_millis(7)));
        assert_eq!(b.next_delay(), Duration::from_millis(700));
    }

    #[test]
    fn nearest_rounds_up_to_grid() {
        let mut b = Nearest::new(Duration::from_millis(25), Constant::new(Duration::from_millis(26)));
        assert_eq!(b.next_delay(), Duration::from_millis(50));

        let mut exact = Nearest::new(Duration::from_millis(25), Constant::new(Duration::from_millis(75)));
        assert_eq!(exact.next_delay(), Duration::from_millis(75));

        let mut zero = Nearest::new(Duration::from_millis(25), Constant::new(Duration::ZERO));
        assert_eq!(zero.next_delay(), Duration::ZERO);
    }

    #[test]
    fn nearest_always_on_grid_for_random_inner() {
        let mut b = Nearest::new(
            Duration::from_millis(10),
            Random::new(Duration::ZERO, Duration::from_millis(500)),
        );
        for _ in 0..100 {
            assert_eq!(b.next_delay().as_millis() % 10, 0);
        }
    }

    #[test]
    fn limited_pins_to_bounds() {
        let min = Duration::from_millis(50);
        let max = Duration::from_millis(100);

        let mut below = Limited::new(min, max, Constant::new(Duration::from_millis(5)));
        assert_eq!(below.next_delay(), min);

        let mut above = Limited::new(min, max, Constant::new(Duration::from_millis(5000)));
        assert_eq!(above.next_delay(), max);

        let mut inside = Limited::new(min, max, Constant::new(Duration::from_millis(75)));
        assert_eq!(inside.next_delay(), Duration::from_millis(75));
    }
}
