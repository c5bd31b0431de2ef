//! Remote command execution with captured output.

use async_trait::async_trait;
use russh::ChannelMsg;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

use crate::endpoint::RemoteEndpoint;
use crate::output::OutputSink;
use crate::retry::{ExecError, Retryable};

use super::auth::{AuthMethod, ServerCheckMethod};
use super::connection::Client;
use super::result::ExecutionResult;

impl Client {
    /// Run one shell command, streaming stdout/stderr into `sink`.
    ///
    /// Requests fresh sink streams for this attempt, so prior captured
    /// output is discarded. Every invocation is a new shell context; `cd`
    /// and environment changes do not carry over. A non-zero remote exit is
    /// data in the [`ExecutionResult`], not an error; if the channel closes
    /// before any status arrives, both exit code and signal stay unset.
    pub async fn execute(
        &self,
        command: &str,
        sink: &mut dyn OutputSink,
    ) -> Result<ExecutionResult, ExecError> {
        if command.trim().is_empty() {
            return Err(ExecError::MissingParameter("command"));
        }

        let mut stdout = sink.output_stream()?;
        let mut stderr = sink.error_stream()?;

        let mut channel = self.handle.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut exit_code: Option<u32> = None;
        let mut signal = None;
        let mut message = None;

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => {
                    stdout.write_all(data)?;
                }
                ChannelMsg::ExtendedData { ref data, ext } => {
                    if ext == 1 {
                        stderr.write_all(data)?;
                    }
                }
                // Status can arrive before the last data message; keep
                // draining the channel after recording it.
                ChannelMsg::ExitStatus { exit_status } => exit_code = Some(exit_status),
                ChannelMsg::ExitSignal {
                    signal_name,
                    error_message,
                    ..
                } => {
                    signal = Some(signal_name.into());
                    if !error_message.is_empty() {
                        message = Some(error_message);
                    }
                }
                _ => {}
            }
        }

        stdout.flush()?;
        stderr.flush()?;

        let result = ExecutionResult {
            exit_code,
            message,
            signal,
        };
        debug!(endpoint = %self.endpoint(), %command, status = %result, "command finished");
        Ok(result)
    }
}

/// "Run a shell command over SSH" as a retryable unit of work.
///
/// `invoke` reuses the open connection when there is one, otherwise
/// establishes a new session. A failed attempt closes its connection before
/// returning, so the next attempt always starts clean.
pub struct RemoteCommand<S> {
    endpoint: RemoteEndpoint,
    auth: AuthMethod,
    server_check: ServerCheckMethod,
    inactivity_timeout: Option<Duration>,
    command: String,
    sink: S,
    client: Option<Client>,
}

impl<S: OutputSink> RemoteCommand<S> {
    pub fn new(
        endpoint: RemoteEndpoint,
        auth: AuthMethod,
        server_check: ServerCheckMethod,
        command: impl Into<String>,
        sink: S,
    ) -> Self {
        Self {
            endpoint,
            auth,
            server_check,
            inactivity_timeout: None,
            command: command.into(),
            sink,
            client: None,
        }
    }

    /// Bound how long a dead link can hang an attempt.
    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = Some(timeout);
        self
    }

    /// Access the sink, e.g. to read back captured output after the session.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[async_trait]
impl<S: OutputSink> Retryable for RemoteCommand<S> {
    type Output = ExecutionResult;

    async fn invoke(&mut self) -> Result<ExecutionResult, ExecError> {
        let client = match self.client.take().filter(|c| !c.is_closed()) {
            Some(open) => self.client.insert(open),
            None => {
                let fresh = Client::connect(
                    &self.endpoint,
                    &self.auth,
                    &self.server_check,
                    self.inactivity_timeout,
                )
                .await?;
                self.client.insert(fresh)
            }
        };

        match client.execute(&self.command, &mut self.sink).await {
            Ok(result) => Ok(result),
            Err(err) => {
                // Close before the next attempt can start.
                if let Some(failed) = self.client.take() {
                    failed.close().await;
                }
                Err(err)
            }
        }
    }

    async fn release(&mut self) {
        if let Some(client) = self.client.take() {
            client.close().await;
        }
    }
}
