//! Diagnostic sink for connection lifecycle events
//!
//! The transport reports through this capability instead of a global logger,
//! so callers can route or capture its messages.

use linkwire_types::Endpoint;
use tracing::{info, warn};

use crate::error::Error;

/// Receiver for transport lifecycle messages
#[cfg_attr(test, mockall::automock)]
pub trait Diagnostics {
    /// A connection attempt is starting
    fn connecting(&self, endpoint: &Endpoint);

    /// A connection attempt failed; the transport is unconnected
    fn connect_failed(&self, endpoint: &Endpoint, error: &Error);

    /// A fatal read tore an established connection down
    fn connection_lost(&self, endpoint: &Endpoint, error: &Error);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn connecting(&self, endpoint: &Endpoint) {
        info!("Connecting to {}", endpoint);
    }

    fn connect_failed(&self, endpoint: &Endpoint, error: &Error) {
        warn!("Can't connect to {}: {}", endpoint, error);
    }

    fn connection_lost(&self, endpoint: &Endpoint, error: &Error) {
        warn!("Connection to {} lost: {}", endpoint, error);
    }
}
