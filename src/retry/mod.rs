//! Retry orchestration.
//!
//! This module encapsulates error classification (connectivity, timeouts,
//! authentication) and the bounded retry loop so that transport adapters
//! (command execution, file transfer) can share a consistent policy.

mod error;
mod run;

pub use error::{classify, ErrorKind, ExecError};
pub use run::{run_session, run_with_retry, Retryable};
