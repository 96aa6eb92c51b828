//! Transport errors

use std::io;
use std::net::SocketAddr;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Endpoint not configured")]
    NotConfigured,

    #[error("Not connected")]
    NotConnected,
    
    #[error("Already connected")]
    AlreadyConnected,

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] linkwire_types::Error),

    #[error("Cannot resolve {0}")]
    Resolution(String),

    #[error("Cannot create socket: {0}")]
    SocketCreation(#[source] io::Error),

    #[error("Cannot connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Connection to {0} timed out")]
    ConnectionTimeout(SocketAddr),

    #[error("Cannot configure socket: {0}")]
    SocketOption(#[source] io::Error),
    
    #[error("Connection closed by remote")]
    ConnectionClosed,
    
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Check if the failure is momentary and the same call may succeed later
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionTimeout(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Check if the engine has to connect again before further I/O
    pub fn requires_reconnect(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::ConnectionClosed
                | Self::Connect { .. }
                | Self::ConnectionTimeout(_)
                | Self::Io(_)
        )
    }
}
