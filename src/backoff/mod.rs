//! Composable inter-retry delay strategies.
//!
//! Each strategy produces the next wait duration on demand, mutating its own
//! state as needed (e.g. the exponential strategy's growing range). Policies
//! are assembled by wrapping: growth shape, grid alignment, and hard bounds
//! are separate single-purpose decorators, so
//! `Limited::new(min, max, Nearest::new(step, Exponential::new(cap)))` yields
//! a floor-clamped, grid-aligned, growing-jitter delay sequence.
//!
//! Backoff state is per retry session: create a fresh instance for each
//! session, or growth compounds across unrelated operations.

mod compose;
mod constant;
mod exponential;
mod random;

pub use compose::{Limited, Multiplier, Nearest};
pub use constant::Constant;
pub use exponential::Exponential;
pub use random::Random;

use std::time::Duration;

/// Stateful producer of successive inter-retry delays.
pub trait Backoff: Send {
    /// The next delay to wait before the following attempt. May mutate
    /// internal state; never negative (durations are unsigned by type).
    fn next_delay(&mut self) -> Duration;
}
