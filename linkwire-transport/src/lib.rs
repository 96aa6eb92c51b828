//! Transport layer for linkwire
//!
//! Carries a device protocol's byte stream over a single blocking TCP
//! connection.

pub mod diagnostics;
pub mod error;
pub mod outcome;
pub mod tcp;

pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{Error, Result};
pub use outcome::ReadOutcome;
pub use tcp::TcpTransport;

use linkwire_types::Endpoint;

/// Capability a protocol engine drives to talk to its server
pub trait Transport: Send {
    /// Store the remote endpoint; no I/O
    fn configure(&mut self, host: &str, service: &str) -> Result<()>;

    /// Connect to the configured endpoint
    fn connect(&mut self) -> Result<()>;
    
    /// Close the connection; no-op when unconnected
    fn disconnect(&mut self);

    /// Single receive attempt into `buf`, bounded by the receive timeout
    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome;
    
    /// Single send attempt; returns bytes actually written
    fn write(&mut self, buf: &[u8]) -> Result<usize>;
    
    /// Check if connected
    fn connected(&self) -> bool;

    /// Largest read worth attempting in one call
    fn available(&self) -> usize;
    
    /// Configured endpoint, if any
    fn endpoint(&self) -> Option<&Endpoint>;
}
