//! Result of a single read attempt

use crate::error::Error;

/// Outcome of [`Transport::read`](crate::Transport::read)
///
/// A read either finds nothing within the receive timeout, fills part of the
/// buffer, or hits a failure that has already torn the connection down.
#[derive(Debug)]
#[must_use]
pub enum ReadOutcome {
    /// Nothing arrived within the receive timeout; the connection is still up
    NoData,

    /// Bytes written to the front of the buffer
    Received(usize),

    /// The connection is gone; the transport has already disconnected
    Fatal(Error),
}

impl ReadOutcome {
    /// Convert into a `Result`, mapping `NoData` to `Ok(0)`
    pub fn into_result(self) -> crate::Result<usize> {
        match self {
            Self::NoData => Ok(0),
            Self::Received(n) => Ok(n),
            Self::Fatal(e) => Err(e),
        }
    }
}
