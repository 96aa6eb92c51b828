//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] linkwire_transport::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] linkwire_types::Error),
}

impl Error {
    /// Check if the engine should reconnect before retrying
    pub fn requires_reconnect(&self) -> bool {
        match self {
            Self::Transport(e) => e.requires_reconnect(),
            Self::Types(_) => false,
        }
    }
}
