//! Authentication credentials and server host-key verification policy.
//!
//! Credentials are opaque to the retry engine; it only ever sees the
//! resulting [`ExecError`] classification (authentication failures are
//! fatal, never retried).

use russh::client::{Handle, Handler};
use std::path::PathBuf;
use std::sync::Arc;
use zeroize::Zeroizing;

use crate::retry::ExecError;

/// A credential for one endpoint.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    Password(Zeroizing<String>),
    PrivateKeyFile {
        key_file_path: PathBuf,
        key_pass: Option<Zeroizing<String>>,
    },
}

impl AuthMethod {
    pub fn with_password(password: &str) -> Self {
        Self::Password(Zeroizing::new(password.to_string()))
    }

    pub fn with_key_file<T: AsRef<std::path::Path>>(
        key_file_path: T,
        passphrase: Option<&str>,
    ) -> Self {
        Self::PrivateKeyFile {
            key_file_path: key_file_path.as_ref().to_path_buf(),
            key_pass: passphrase.map(|p| Zeroizing::new(p.to_string())),
        }
    }
}

/// How to verify the server's host key during connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerCheckMethod {
    /// Accept any host key (testing only).
    NoCheck,
    /// Check against `~/.ssh/known_hosts`.
    DefaultKnownHostsFile,
    /// Check against a specific known_hosts file.
    KnownHostsFile(String),
}

/// Authenticate an established session with the given credential.
pub(super) async fn authenticate<H: Handler>(
    handle: &mut Handle<H>,
    username: &str,
    auth: &AuthMethod,
) -> Result<(), ExecError> {
    match auth {
        AuthMethod::Password(password) => {
            let outcome = handle
                .authenticate_password(username, password.as_str())
                .await
                .map_err(ExecError::Ssh)?;
            if !outcome.success() {
                return Err(ExecError::Auth(format!("password rejected for {username}")));
            }
        }
        AuthMethod::PrivateKeyFile {
            key_file_path,
            key_pass,
        } => {
            let key = russh::keys::load_secret_key(
                key_file_path,
                key_pass.as_ref().map(|p| p.as_str()),
            )
            .map_err(|e| ExecError::Auth(format!("cannot load private key: {e}")))?;
            let hash_alg = handle
                .best_supported_rsa_hash()
                .await
                .map_err(ExecError::Ssh)?
                .flatten();
            let outcome = handle
                .authenticate_publickey(
                    username,
                    russh::keys::PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                )
                .await
                .map_err(ExecError::Ssh)?;
            if !outcome.success() {
                return Err(ExecError::Auth(format!("key rejected for {username}")));
            }
        }
    }
    Ok(())
}
