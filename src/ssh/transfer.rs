//! SFTP file upload with progress reporting.

use async_trait::async_trait;
use russh_sftp::client::SftpSession;
use russh_sftp::protocol::OpenFlags;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use crate::endpoint::RemoteEndpoint;
use crate::progress::{ProgressFn, TransferProgress};
use crate::retry::{ExecError, Retryable};

use super::auth::{AuthMethod, ServerCheckMethod};
use super::connection::Client;

/// Chunk size for streaming uploads; keeps memory bounded for large files.
const UPLOAD_CHUNK_SIZE: usize = 32 * 1024;

impl Client {
    /// Upload one local file to `remote_path` over SFTP.
    ///
    /// The file is streamed in chunks; after each chunk the observer (if
    /// any) receives a [`TransferProgress`] snapshot. The remote sshd must
    /// have the sftp subsystem enabled.
    pub async fn upload(
        &self,
        local_path: &Path,
        remote_path: &str,
        mut progress: Option<&mut (dyn FnMut(TransferProgress) + Send)>,
    ) -> Result<(), ExecError> {
        // A missing or unreadable source file is a local resource failure.
        let max = tokio::fs::metadata(local_path)
            .await
            .map_err(ExecError::Io)?
            .len();
        let mut src = tokio::fs::File::open(local_path)
            .await
            .map_err(ExecError::Io)?;

        let channel = self.handle.channel_open_session().await?;
        channel.request_subsystem(true, "sftp").await?;
        let sftp = SftpSession::new(channel.into_stream()).await?;

        let mut remote_file = sftp
            .open_with_flags(
                remote_path,
                OpenFlags::CREATE | OpenFlags::TRUNCATE | OpenFlags::WRITE,
            )
            .await?;

        let mut buf = vec![0u8; UPLOAD_CHUNK_SIZE];
        let mut current: u64 = 0;
        loop {
            let n = src.read(&mut buf).await.map_err(ExecError::Io)?;
            if n == 0 {
                break;
            }
            remote_file
                .write_all(&buf[..n])
                .await
                .map_err(ExecError::Transfer)?;
            current += n as u64;
            if let Some(observer) = progress.as_mut() {
                observer(TransferProgress { current, max });
            }
        }

        remote_file.flush().await.map_err(ExecError::Transfer)?;
        remote_file.shutdown().await.map_err(ExecError::Transfer)?;

        debug!(endpoint = %self.endpoint(), remote_path, bytes = current, "upload finished");
        Ok(())
    }
}

/// "Upload a file over SFTP" as a retryable unit of work.
///
/// Same connection lifecycle as [`RemoteCommand`](super::RemoteCommand): a
/// failed attempt closes its connection before returning. A retried upload
/// restarts from the beginning (the remote file is truncated on open), and
/// the observer sees progress reset accordingly.
pub struct SftpUpload {
    endpoint: RemoteEndpoint,
    auth: AuthMethod,
    server_check: ServerCheckMethod,
    inactivity_timeout: Option<Duration>,
    local_path: PathBuf,
    remote_path: String,
    progress: Option<ProgressFn>,
    client: Option<Client>,
}

impl SftpUpload {
    pub fn new(
        endpoint: RemoteEndpoint,
        auth: AuthMethod,
        server_check: ServerCheckMethod,
        local_path: impl Into<PathBuf>,
        remote_path: impl Into<String>,
    ) -> Self {
        Self {
            endpoint,
            auth,
            server_check,
            inactivity_timeout: None,
            local_path: local_path.into(),
            remote_path: remote_path.into(),
            progress: None,
            client: None,
        }
    }

    /// Observe transfer progress; called zero or more times per attempt.
    pub fn with_progress(mut self, observer: ProgressFn) -> Self {
        self.progress = Some(observer);
        self
    }

    /// Bound how long a dead link can hang an attempt.
    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Retryable for SftpUpload {
    type Output = ();

    async fn invoke(&mut self) -> Result<(), ExecError> {
        if self.remote_path.is_empty() {
            return Err(ExecError::MissingParameter("remote_path"));
        }

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

        let observer = self
            .progress
            .as_mut()
            .map(|f| &mut **f as &mut (dyn FnMut(TransferProgress) + Send));
        match client
            .upload(&self.local_path, &self.remote_path, observer)
            .await
        {
            Ok(()) => Ok(()),
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
