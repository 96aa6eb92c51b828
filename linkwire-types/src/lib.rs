//! Type definitions for linkwire

pub mod constants;
pub mod endpoint;
pub mod error;

pub use endpoint::Endpoint;
pub use error::{Error, Result};
