//! SSH connection establishment and lifecycle.

use russh::client::{Config, Handle, Handler};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::endpoint::RemoteEndpoint;
use crate::retry::ExecError;

use super::auth::{authenticate, AuthMethod, ServerCheckMethod};

/// An authenticated SSH session with one endpoint.
///
/// Owned by a single retryable for the duration of a retry session; the
/// endpoint value itself is freely shared, the session never is.
pub struct Client {
    pub(super) handle: Handle<ClientHandler>,
    endpoint: RemoteEndpoint,
}

impl Client {
    /// Connect to `endpoint` and authenticate.
    ///
    /// TCP-level failures surface as [`ExecError::Connect`] (retryable),
    /// rejected credentials as [`ExecError::Auth`] (fatal). An
    /// `inactivity_timeout` bounds how long a dead link can hang the session.
    pub async fn connect(
        endpoint: &RemoteEndpoint,
        auth: &AuthMethod,
        server_check: &ServerCheckMethod,
        inactivity_timeout: Option<Duration>,
    ) -> Result<Self, ExecError> {
        let config = Arc::new(Config {
            inactivity_timeout,
            ..Config::default()
        });
        let handler = ClientHandler {
            hostname: endpoint.host().to_string(),
            port: endpoint.port(),
            server_check: server_check.clone(),
        };

        let mut handle = match russh::client::connect(
            config,
            (endpoint.host(), endpoint.port()),
            handler,
        )
        .await
        {
            Ok(handle) => handle,
            Err(ExecError::Ssh(russh::Error::IO(source))) => {
                return Err(ExecError::Connect {
                    endpoint: endpoint.to_string(),
                    source,
                });
            }
            Err(e) => return Err(e),
        };

        authenticate(&mut handle, endpoint.principal(), auth).await?;
        info!(endpoint = %endpoint, "connected");

        Ok(Self {
            handle,
            endpoint: endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &RemoteEndpoint {
        &self.endpoint
    }

    /// Whether the underlying connection has been closed.
    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    /// Disconnect from the remote host.
    pub async fn disconnect(&self) -> Result<(), ExecError> {
        self.handle
            .disconnect(russh::Disconnect::ByApplication, "", "")
            .await
            .map_err(ExecError::Ssh)
    }

    /// Best-effort close, consuming the session. Never fails; used by
    /// retryables whose `release` must be safe on every path.
    pub async fn close(self) {
        if !self.is_closed() {
            if let Err(e) = self.disconnect().await {
                debug!(endpoint = %self.endpoint, error = %e, "disconnect during close failed");
            } else {
                info!(endpoint = %self.endpoint, "disconnected");
            }
        }
    }
}

/// Verifies the server host key according to the configured policy.
pub struct ClientHandler {
    hostname: String,
    port: u16,
    server_check: ServerCheckMethod,
}

impl Handler for ClientHandler {
    type Error = ExecError;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        let ok = match &self.server_check {
            ServerCheckMethod::NoCheck => true,
            ServerCheckMethod::DefaultKnownHostsFile => {
                russh::keys::check_known_hosts(&self.hostname, self.port, server_public_key)
                    .map_err(|_| ExecError::HostKeyMismatch)?
            }
            ServerCheckMethod::KnownHostsFile(path) => russh::keys::check_known_hosts_path(
                &self.hostname,
                self.port,
                server_public_key,
                path,
            )
            .map_err(|_| ExecError::HostKeyMismatch)?,
        };
        if !ok {
            return Err(ExecError::HostKeyMismatch);
        }
        Ok(true)
    }
}
