//! SSH transport: connection, authentication, command execution, and SFTP
//! upload, powered by russh.
//!
//! [`Client`] is a thin session wrapper; [`RemoteCommand`] and [`SftpUpload`]
//! adapt it to the retry engine's [`Retryable`](crate::retry::Retryable)
//! contract.

mod auth;
mod command;
mod connection;
mod result;
mod transfer;

pub use auth::{AuthMethod, ServerCheckMethod};
pub use command::RemoteCommand;
pub use connection::Client;
pub use result::{ExecutionResult, ExitSignal};
pub use transfer::SftpUpload;
