//! Fixed delay strategy.

use std::time::Duration;

use super::Backoff;

/// Always returns the same delay.
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    delay: Duration,
}

impl Constant {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Backoff for Constant {
    fn next_delay(&mut self) -> Duration {
        self.delay
    }
}
