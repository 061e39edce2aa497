// jmap-client/src/lib.rs
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{JmapClient, JMAP_CORE_CAPABILITY};
pub use error::{Error, Result};
pub use http::{HttpClient, HttpError};
pub use types::{
    AccountData, Invocation, Request, Response, Session, SessionInfo, SetError, SetResponse,
};

// Re-export reqwest client when feature is enabled
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
