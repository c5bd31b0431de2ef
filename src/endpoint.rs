//! Remote endpoint identity.
//!
//! An endpoint names a connection target (host, port, login principal) and
//! nothing else: no credential, no connection state. Two endpoints with the
//! same fields are interchangeable as map keys, pool keys, or retry-scope
//! identifiers.

use std::fmt;

/// Default SSH port.
pub const DEFAULT_PORT: u16 = 22;

/// Default login principal.
pub const DEFAULT_PRINCIPAL: &str = "root";

/// Immutable identity of a remote host. Equality and hash are structural
/// over host, port, and principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteEndpoint {
    host: String,
    port: u16,
    principal: String,
}

impl RemoteEndpoint {
    /// Endpoint for `host` with the default port (22) and principal ("root").
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            principal: DEFAULT_PRINCIPAL.to_string(),
        }
    }

    /// Returns a copy of this endpoint with a different port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Returns a copy of this endpoint with a different login principal.
    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = principal.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn principal(&self) -> &str {
        &self.principal
    }
}

impl fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.principal, self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_applied() {
        let ep = RemoteEndpoint::new("10.0.0.5");
        assert_eq!(ep.port(), 22);
        assert_eq!(ep.principal(), "root");
    }

    #[test]
    fn structural_equality() {
        let a = RemoteEndpoint::new("10.0.0.5");
        let b = RemoteEndpoint::new("10.0.0.5").with_port(22).with_principal("root");
        assert_eq!(a, b);
        assert_ne!(a, RemoteEndpoint::new("10.0.0.5").with_port(2222));
        assert_ne!(a, RemoteEndpoint::new("10.0.0.5").with_principal("deploy"));
    }

    #[test]
    fn usable_as_map_key() {
        let mut pool: HashMap<RemoteEndpoint, u32> = HashMap::new();
        pool.insert(RemoteEndpoint::new("a").with_port(22), 1);
        pool.insert(RemoteEndpoint::new("a").with_port(2222), 2);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(&RemoteEndpoint::new("a")), Some(&1));
    }

    #[test]
    fn display_format() {
        let ep = RemoteEndpoint::new("web1").with_port(2200).with_principal("deploy");
        assert_eq!(ep.to_string(), "deploy@web1:2200");
    }
}
