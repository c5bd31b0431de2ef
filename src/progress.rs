//! Transfer progress reporting.
//!
//! A transfer pushes [`TransferProgress`] snapshots through a plain callback;
//! there is no persisted state and no observer hierarchy. Callbacks run on
//! the transfer task and must not block it materially.

/// Snapshot of an in-flight transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    /// Bytes transferred so far.
    pub current: u64,
    /// Total bytes to transfer.
    pub max: u64,
}

impl TransferProgress {
    /// Fraction complete in `[0.0, 1.0]`.
    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            return 1.0;
        }
        (self.current as f64 / self.max as f64).min(1.0)
    }
}

/// Progress observer: invoked zero or more times during one upload.
pub type ProgressFn = Box<dyn FnMut(TransferProgress) + Send>;
