pub mod config;
pub mod logging;

// Core modules
pub mod backoff;
pub mod endpoint;
pub mod output;
pub mod progress;
pub mod retry;
pub mod ssh;
