// fastmask-client/src/masked_email.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp layout used by `createdAt` and `lastMessageAt`
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Masked Email (Fastmail extension)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaskedEmail {
    pub id: String,
    pub email: String,
    pub state: MaskedEmailState,
    #[serde(rename = "forDomain")]
    #[serde(default)]
    pub for_domain: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "lastMessageAt")]
    #[serde(default)]
    pub last_message_at: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "createdBy")]
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl MaskedEmail {
    /// Value of a field as text, `None` when the field is null
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Id => Some(&self.id),
            Field::Email => Some(&self.email),
            Field::State => Some(self.state.as_str()),
            Field::Description => Some(&self.description),
            Field::ForDomain => Some(&self.for_domain),
            Field::Url => self.url.as_deref(),
            Field::CreatedAt => Some(&self.created_at),
            Field::LastMessageAt => self.last_message_at.as_deref(),
            Field::CreatedBy => Some(&self.created_by),
        }
    }

    pub fn created_at(&self) -> Option<chrono::NaiveDateTime> {
        parse_timestamp(&self.created_at)
    }

    pub fn last_message_at(&self) -> Option<chrono::NaiveDateTime> {
        self.last_message_at.as_deref().and_then(parse_timestamp)
    }
}

pub fn parse_timestamp(value: &str) -> Option<chrono::NaiveDateTime> {
    chrono::NaiveDateTime::parse_from_str(value, TIME_FORMAT).ok()
}

/// Masked Email state (Fastmail extension)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MaskedEmailState {
    Pending,
    Enabled,
    Disabled,
    Deleted,
}

impl MaskedEmailState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for MaskedEmailState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record fields addressable by search, sort and export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Email,
    State,
    Description,
    ForDomain,
    Url,
    CreatedAt,
    LastMessageAt,
    CreatedBy,
}

impl Field {
    /// Export column order
    pub const EXPORT_ORDER: [Field; 9] = [
        Field::Email,
        Field::ForDomain,
        Field::Description,
        Field::State,
        Field::LastMessageAt,
        Field::Url,
        Field::Id,
        Field::CreatedAt,
        Field::CreatedBy,
    ];

    /// Wire name of the field
    pub fn name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
            Self::State => "state",
            Self::Description => "description",
            Self::ForDomain => "forDomain",
            Self::Url => "url",
            Self::CreatedAt => "createdAt",
            Self::LastMessageAt => "lastMessageAt",
            Self::CreatedBy => "createdBy",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = crate::Error;

    /// Accepts the wire name in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::EXPORT_ORDER
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::Validation(format!("Unknown field \"{}\"", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_applies_defaults() {
        let me: MaskedEmail = serde_json::from_value(json!({
            "id": "masked-1",
            "email": "abc@fastmail.com",
            "state": "pending",
            "createdAt": "2023-05-01T12:00:00Z",
            "url": null,
            "lastMessageAt": null
        }))
        .unwrap();
        assert_eq!(me.state, MaskedEmailState::Pending);
        assert_eq!(me.description, "");
        assert_eq!(me.for_domain, "");
        assert_eq!(me.field(Field::Url), None);
        assert_eq!(me.field(Field::State), Some("pending"));
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2023-01-02T03:04:05Z").unwrap();
        assert_eq!(ts.to_string(), "2023-01-02 03:04:05");
        assert!(parse_timestamp("2023-01-02").is_none());
    }

    #[test]
    fn test_field_from_str_is_case_insensitive() {
        assert_eq!("forDomain".parse::<Field>().unwrap(), Field::ForDomain);
        assert_eq!("LASTMESSAGEAT".parse::<Field>().unwrap(), Field::LastMessageAt);
        assert!("nope".parse::<Field>().is_err());
    }
}
