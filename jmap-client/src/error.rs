// jmap-client/src/error.rs
use crate::http::HttpError;
use thiserror::Error;

/// Errors raised while talking to a JMAP server
#[derive(Debug, Error)]
pub enum Error {
    /// Network failure or non-2xx status
    #[error("{0}")]
    Transport(#[from] HttpError),

    /// Well-formed HTTP response missing the expected JMAP structure
    #[error("Invalid JMAP response: {0}")]
    Protocol(String),

    /// Server answered the call with an `error` method response (RFC 8620 3.6.2)
    #[error("JMAP method error {type_}{}", describe(.description))]
    Method {
        type_: String,
        description: Option<String>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn describe(description: &Option<String>) -> String {
    description
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}
