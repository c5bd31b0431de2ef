//! Error taxonomy for remote execution and its retry classification.
//!
//! Connectivity and timeout failures are worth retrying; authentication and
//! local resource failures never are; protocol-level failures default to
//! fatal but individual retryables may override (a remote exit code is not
//! an error at all — it is data in the execution result).

use std::io;
use thiserror::Error;

/// Error raised by one invocation of a remote unit of work.
#[derive(Debug, Error)]
pub enum ExecError {
    /// TCP-level connection establishment failed.
    #[error("connection to {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    /// Credential was rejected by the server.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Server host key did not match the expected identity.
    #[error("host key verification failed")]
    HostKeyMismatch,

    /// SSH protocol or session error.
    #[error("ssh error: {0}")]
    Ssh(#[from] russh::Error),

    /// SFTP subsystem error.
    #[error("sftp error: {0}")]
    Sftp(#[from] russh_sftp::client::error::Error),

    /// The transfer data stream broke mid-flight.
    #[error("transfer stream error: {0}")]
    Transfer(#[source] io::Error),

    /// Local I/O failed (sink stream creation, source file read).
    #[error("local i/o error: {0}")]
    Io(#[from] io::Error),

    /// A required parameter was missing or empty.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network-level failure (refused, reset, no route).
    Connectivity,
    /// Connect/read/keepalive deadline expired.
    Timeout,
    /// Bad credential or host-key mismatch.
    Auth,
    /// SSH/SFTP protocol-level failure.
    Protocol,
    /// Local resource failure (file creation, missing parameter).
    Resource,
}

impl ErrorKind {
    /// Default retry predicate: only transient network conditions retry.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Connectivity | ErrorKind::Timeout)
    }
}

/// Classify an I/O error from connection establishment.
fn classify_connect_io(e: &io::Error) -> ErrorKind {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ErrorKind::Timeout,
        _ => ErrorKind::Connectivity,
    }
}

/// Classify an SSH-level error.
fn classify_ssh(e: &russh::Error) -> ErrorKind {
    use russh::Error as E;
    match e {
        E::ConnectionTimeout | E::KeepaliveTimeout | E::InactivityTimeout => ErrorKind::Timeout,
        E::Disconnect | E::HUP | E::SendError => ErrorKind::Connectivity,
        E::IO(io_err) => classify_connect_io(io_err),
        E::NotAuthenticated => ErrorKind::Auth,
        E::KeyChanged { .. } => ErrorKind::Auth,
        _ => ErrorKind::Protocol,
    }
}

/// Classify an execution error into a retry [`ErrorKind`].
pub fn classify(e: &ExecError) -> ErrorKind {
    match e {
        ExecError::Connect { source, .. } => classify_connect_io(source),
        ExecError::Auth(_) | ExecError::HostKeyMismatch => ErrorKind::Auth,
        ExecError::Ssh(ssh) => classify_ssh(ssh),
        ExecError::Sftp(_) => ErrorKind::Protocol,
        ExecError::Transfer(io_err) => classify_connect_io(io_err),
        ExecError::Io(_) | ExecError::MissingParameter(_) => ErrorKind::Resource,
    }
}
