// fastmask-client/src/resolve.rs
//! Turning a user-supplied reference into a masked email.
//!
//! Precedence is fixed: `masked-<digits>`, then bare digits, then an email
//! address, then the description. A token that looks numeric is never
//! looked up as a description, even when a description equals it.

use crate::client::MaskedEmailClient;
use crate::error::{Error, Result};
use crate::masked_email::MaskedEmail;
use crate::query::{filter, Predicate};
use async_trait::async_trait;
use jmap_client::HttpClient;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const ID_PREFIX: &str = "masked-";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// How a token will be looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Canonical `masked-<digits>` id, confirmed with a get-by-id
    Id(String),
    /// Exact match on `email`
    Email(String),
    /// Case-insensitive exact match on `description`
    Description(String),
}

impl Identifier {
    pub fn parse(token: &str) -> Self {
        if let Some(digits) = token.strip_prefix(ID_PREFIX) {
            if is_digits(digits) {
                return Self::Id(token.to_string());
            }
        }
        if is_digits(token) {
            return Self::Id(format!("{}{}", ID_PREFIX, token));
        }
        if EMAIL_PATTERN.is_match(token) {
            return Self::Email(token.to_string());
        }
        Self::Description(token.to_string())
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Anything that can list masked emails, by id or in full
#[async_trait]
pub trait MaskedEmailSource: Send + Sync {
    async fn fetch(&self, ids: Option<&[String]>) -> Result<Vec<MaskedEmail>>;
}

#[async_trait]
impl<C: HttpClient> MaskedEmailSource for MaskedEmailClient<C> {
    async fn fetch(&self, ids: Option<&[String]>) -> Result<Vec<MaskedEmail>> {
        MaskedEmailClient::fetch(self, ids).await
    }
}

/// Resolve `token` to a record; the first match wins
pub async fn resolve_record<S>(source: &S, token: &str) -> Result<MaskedEmail>
where
    S: MaskedEmailSource + ?Sized,
{
    let identifier = Identifier::parse(token);
    debug!(?identifier, "resolving masked email");

    let matches = match &identifier {
        Identifier::Id(id) => source.fetch(Some(std::slice::from_ref(id))).await?,
        Identifier::Email(email) => filter(
            source.fetch(None).await?,
            &Predicate::email_eq(email.as_str()),
        ),
        Identifier::Description(description) => filter(
            source.fetch(None).await?,
            &Predicate::description_eq_ignore_case(description),
        ),
    };

    matches
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(token.to_string()))
}

/// Resolve `token` to a canonical `masked-<digits>` id
pub async fn resolve_identifier<S>(source: &S, token: &str) -> Result<String>
where
    S: MaskedEmailSource + ?Sized,
{
    Ok(resolve_record(source, token).await?.id)
}
