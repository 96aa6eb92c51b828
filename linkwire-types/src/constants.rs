//! Transport constants

use std::time::Duration;

/// Default server hostname
pub const DEFAULT_DOMAIN: &str = "blynk-cloud.com";

/// Default server port
pub const DEFAULT_PORT: u16 = 8442;

/// Default receive timeout
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Largest read the protocol engine should attempt in one call
pub const DEFAULT_MAX_READ_BYTES: usize = 256;

/// Attempts made to shut a socket down before giving up on it
pub const CLOSE_RETRY_LIMIT: usize = 10;

/// Pause between shutdown attempts
pub const CLOSE_RETRY_DELAY: Duration = Duration::from_millis(10);
