//! Remote endpoint descriptor

use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_DOMAIN, DEFAULT_PORT};
use crate::error::{Error, Result};

/// Remote server address: host plus service
///
/// The host may be a hostname or an IP literal. The service is either a
/// decimal port or a name from the system services database. Neither is
/// resolved here; lookup happens when the transport connects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    service: String,
}

impl Endpoint {
    /// Create an endpoint, rejecting empty host or service
    ///
    /// Surrounding whitespace is stripped from both.
    pub fn new(host: impl AsRef<str>, service: impl AsRef<str>) -> Result<Self> {
        let host = host.as_ref().trim();
        let service = service.as_ref().trim();

        if host.is_empty() {
            return Err(Error::Validation("host must not be empty".into()));
        }
        if service.is_empty() {
            return Err(Error::Validation("service must not be empty".into()));
        }

        Ok(Self {
            host: host.to_string(),
            service: service.to_string(),
        })
    }

    /// The stock cloud server
    pub fn default_server() -> Self {
        Self {
            host: DEFAULT_DOMAIN.to_string(),
            service: DEFAULT_PORT.to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Port number when the service is written as a decimal port
    ///
    /// Named services return `None`; they are looked up by the resolver.
    pub fn port(&self) -> Option<u16> {
        self.service.parse().ok()
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::default_server()
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    /// Parse `host:service`, with IPv6 literals written as `[addr]:service`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        let (host, service) = if let Some(rest) = s.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| Error::Parse(format!("unclosed IPv6 bracket in {s:?}")))?;
            let service = tail
                .strip_prefix(':')
                .ok_or_else(|| Error::Parse(format!("missing service in {s:?}")))?;
            (host, service)
        } else {
            s.rsplit_once(':')
                .ok_or_else(|| Error::Parse(format!("expected host:service, got {s:?}")))?
        };

        Self::new(host, service)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.service)
        } else {
            write!(f, "{}:{}", self.host, self.service)
        }
    }
}
