//! # linkwire
//!
//! Blocking TCP transport for IoT device protocol clients.
//!
//! A protocol engine drives a [`Transport`]: it connects, polls `read` in its
//! own loop (each call waits at most the receive timeout), writes frames, and
//! reconnects when a read reports the connection lost.
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkwire::{ReadOutcome, Transport};
//!
//! fn main() -> linkwire::Result<()> {
//!     let mut transport = linkwire::open("127.0.0.1:8442")?;
//!
//!     transport.write(b"\x02\x00\x01\x00\x04ping")?;
//!
//!     let mut buf = vec![0u8; transport.available()];
//!     if let ReadOutcome::Received(n) = transport.read(&mut buf) {
//!         println!("{:02X?}", &buf[..n]);
//!     }
//!
//!     transport.disconnect();
//!     Ok(())
//! }
//! ```

pub mod error;

use tracing::debug;

// Re-exports
pub use error::{Error, Result};
pub use linkwire_transport::{
    Diagnostics, ReadOutcome, TcpTransport, TracingDiagnostics, Transport,
};
pub use linkwire_types::{constants, Endpoint};

/// Parse `host:service` and connect with default settings
pub fn open(address: &str) -> Result<TcpTransport> {
    let endpoint: Endpoint = address.parse()?;
    debug!("Opening transport to {}", endpoint);

    let mut transport = TcpTransport::for_endpoint(endpoint);
    transport.connect()?;
    Ok(transport)
}
