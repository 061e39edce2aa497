// jmap-client/src/types.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// JMAP Session response (RFC 8620 Section 2)
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// The URL to use for JMAP API requests
    #[serde(rename = "apiUrl")]
    pub api_url: String,
    /// Primary account id per capability urn
    #[serde(rename = "primaryAccounts")]
    pub primary_accounts: HashMap<String, String>,
    /// The accounts available to the user
    #[serde(default)]
    pub accounts: HashMap<String, AccountData>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub capabilities: HashMap<String, serde_json::Value>,
}

impl Session {
    /// Primary account id for the given capability, if the server names one
    pub fn primary_account(&self, capability: &str) -> Option<&str> {
        self.primary_accounts.get(capability).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountData {
    pub name: Option<String>,
    #[serde(rename = "isPersonal")]
    pub is_personal: Option<bool>,
    #[serde(rename = "isReadOnly")]
    pub is_read_only: Option<bool>,
    #[serde(rename = "accountCapabilities")]
    pub account_capabilities: Option<HashMap<String, serde_json::Value>>,
}

/// The two values a client needs from the session for every method call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub api_url: String,
    pub account_id: String,
}

/// A single method call or response: `[name, arguments, callId]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invocation(pub String, pub serde_json::Value, pub String);

impl Invocation {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn arguments(&self) -> &serde_json::Value {
        &self.1
    }

    pub fn call_id(&self) -> &str {
        &self.2
    }

    pub fn into_arguments(self) -> serde_json::Value {
        self.1
    }
}

/// JMAP request envelope (RFC 8620 Section 3.3)
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub using: Vec<String>,
    #[serde(rename = "methodCalls")]
    pub method_calls: Vec<Invocation>,
}

/// JMAP response envelope (RFC 8620 Section 3.4)
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    #[serde(rename = "methodResponses")]
    pub method_responses: Vec<Invocation>,
    #[serde(default)]
    #[serde(rename = "sessionState")]
    pub session_state: Option<String>,
}

/// Result arguments of a `Foo/set` call (RFC 8620 Section 5.3)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetResponse {
    #[serde(default)]
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
    #[serde(default)]
    pub created: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub updated: Option<HashMap<String, Option<serde_json::Value>>>,
    #[serde(default)]
    pub destroyed: Option<Vec<String>>,
    #[serde(default)]
    #[serde(rename = "notCreated")]
    pub not_created: Option<HashMap<String, SetError>>,
    #[serde(default)]
    #[serde(rename = "notUpdated")]
    pub not_updated: Option<HashMap<String, SetError>>,
}

/// Per-object failure in a set response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SetError {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Option<Vec<String>>,
}

impl std::fmt::Display for SetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_)?;
        if let Some(description) = &self.description {
            write!(f, ": {}", description)?;
        }
        if let Some(properties) = &self.properties {
            write!(f, " ({})", properties.join(", "))?;
        }
        Ok(())
    }
}
