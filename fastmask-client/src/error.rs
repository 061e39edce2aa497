// fastmask-client/src/error.rs
use thiserror::Error;

/// Failures surfaced by masked email operations. Every variant is terminal
/// for the command that raised it.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or empty username/token
    #[error("Credential error: {0}")]
    Credential(String),

    /// Network failure or non-2xx HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response did not carry the expected JMAP structure
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Identifier resolution found no record
    #[error("Unable to find Masked Email \"{0}\"")]
    NotFound(String),

    /// Missing or invalid user input
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<jmap_client::Error> for Error {
    fn from(err: jmap_client::Error) -> Self {
        match err {
            jmap_client::Error::Transport(e) => Self::Transport(e.to_string()),
            other => Self::Protocol(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
