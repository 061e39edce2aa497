pub mod client;
pub mod config;
pub mod error;
pub mod masked_email;
pub mod query;
pub mod resolve;

pub use client::{
    CreatedMaskedEmail, MaskedEmailClient, MaskedEmailUpdate, NewMaskedEmail,
    FASTMAIL_MASKED_EMAIL_CAPABILITY,
};
pub use config::{load_dotenv, Config, Credentials, TOKEN_ENV, USERNAME_ENV};
pub use error::{Error, Result};
pub use masked_email::{Field, MaskedEmail, MaskedEmailState};
pub use resolve::{resolve_identifier, resolve_record, Identifier, MaskedEmailSource};

// Re-export JMAP types for convenience
pub use jmap_client::SessionInfo;
