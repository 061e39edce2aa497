// fastmask-client/src/client.rs
use crate::config::{Credentials, FASTMAIL_SESSION_URL};
use crate::error::{Error, Result};
use crate::masked_email::{MaskedEmail, MaskedEmailState};
use jmap_client::{HttpClient, JmapClient, ReqwestClient, SessionInfo, SetResponse, JMAP_CORE_CAPABILITY};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

pub const FASTMAIL_MASKED_EMAIL_CAPABILITY: &str = "https://www.fastmail.com/dev/maskedemail";

const USING: [&str; 2] = [JMAP_CORE_CAPABILITY, FASTMAIL_MASKED_EMAIL_CAPABILITY];

/// Client-chosen creation key inside `MaskedEmail/set`
const CREATE_KEY: &str = "new-masked-email";

/// Properties of a masked email to create
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewMaskedEmail {
    pub state: MaskedEmailState,
    pub description: String,
    pub url: Option<String>,
    #[serde(rename = "forDomain")]
    pub for_domain: String,
}

impl Default for NewMaskedEmail {
    fn default() -> Self {
        Self {
            state: MaskedEmailState::Enabled,
            description: String::new(),
            url: None,
            for_domain: String::new(),
        }
    }
}

/// Changes to apply to an existing masked email. Unset fields are left
/// untouched on the server; there is no way to null a field.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MaskedEmailUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<MaskedEmailState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "forDomain")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_domain: Option<String>,
}

impl MaskedEmailUpdate {
    pub fn state(state: MaskedEmailState) -> Self {
        Self {
            state: Some(state),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none()
            && self.description.is_none()
            && self.url.is_none()
            && self.for_domain.is_none()
    }
}

/// Server-assigned identity of a newly created masked email
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreatedMaskedEmail {
    pub id: String,
    pub email: String,
}

/// Masked email operations over a lazily resolved JMAP session
pub struct MaskedEmailClient<C: HttpClient = ReqwestClient> {
    inner: JmapClient<C>,
    username: String,
}

impl MaskedEmailClient<ReqwestClient> {
    pub fn new(credentials: &Credentials) -> Self {
        Self::with_session_url(credentials, FASTMAIL_SESSION_URL)
    }

    pub fn with_session_url(credentials: &Credentials, session_url: impl Into<String>) -> Self {
        let http = ReqwestClient::new().with_token(credentials.token().to_string());
        Self::with_http(http, session_url, credentials)
    }
}

impl<C: HttpClient> MaskedEmailClient<C> {
    /// Build over any transport; `http` is responsible for attaching the
    /// credentials' token
    pub fn with_http(http: C, session_url: impl Into<String>, credentials: &Credentials) -> Self {
        Self {
            inner: JmapClient::new(http, session_url),
            username: credentials.username().to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub async fn session(&self) -> Result<&SessionInfo> {
        Ok(self.inner.session().await?)
    }

    pub async fn account_id(&self) -> Result<&str> {
        Ok(self.inner.account_id().await?)
    }

    /// Issue one method call with the masked email capability and return its
    /// result arguments
    pub async fn invoke(&self, method: &str, args: Value) -> Result<Value> {
        Ok(self.inner.call_method_with_using(&USING, method, args).await?)
    }

    /// `MaskedEmail/get`; `None` fetches every masked email in the account
    pub async fn fetch(&self, ids: Option<&[String]>) -> Result<Vec<MaskedEmail>> {
        let account_id = self.account_id().await?;
        let args = self
            .invoke(
                "MaskedEmail/get",
                json!({
                    "accountId": account_id,
                    "ids": ids,
                }),
            )
            .await?;

        let list = args
            .get("list")
            .and_then(|v| v.as_array())
            .ok_or_else(|| Error::Protocol("no list in MaskedEmail/get response".to_string()))?;

        debug!(count = list.len(), "fetched masked emails");
        list.iter()
            .map(|v| serde_json::from_value(v.clone()).map_err(Into::into))
            .collect()
    }

    pub async fn create(&self, new: &NewMaskedEmail) -> Result<CreatedMaskedEmail> {
        let account_id = self.account_id().await?;
        let args = self
            .invoke(
                "MaskedEmail/set",
                json!({
                    "accountId": account_id,
                    "create": { CREATE_KEY: new },
                }),
            )
            .await?;

        let resp: SetResponse = serde_json::from_value(args)?;
        let created = resp
            .created
            .and_then(|mut created| created.remove(CREATE_KEY))
            .ok_or_else(|| {
                let detail = resp
                    .not_created
                    .as_ref()
                    .and_then(|errors| errors.get(CREATE_KEY))
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no created entry in response".to_string());
                Error::Protocol(format!("Masked email not created: {}", detail))
            })?;

        let created: CreatedMaskedEmail = serde_json::from_value(created)?;
        info!(id = %created.id, email = %created.email, "created masked email");
        Ok(created)
    }

    /// Apply `changes` to `id`, returning the id the server reports as updated
    pub async fn update(&self, id: &str, changes: &MaskedEmailUpdate) -> Result<String> {
        if changes.is_empty() {
            return Err(Error::Validation("Specify fields to update".to_string()));
        }

        let account_id = self.account_id().await?;
        let args = self
            .invoke(
                "MaskedEmail/set",
                json!({
                    "accountId": account_id,
                    "update": { id: changes },
                }),
            )
            .await?;

        let resp: SetResponse = serde_json::from_value(args)?;
        let updated = resp.updated.as_ref().and_then(|updated| {
            if updated.contains_key(id) {
                Some(id.to_string())
            } else {
                updated.keys().next().cloned()
            }
        });

        match updated {
            Some(updated) => {
                info!(id = %updated, "updated masked email");
                Ok(updated)
            }
            None => {
                let detail = resp
                    .not_updated
                    .as_ref()
                    .and_then(|errors| errors.get(id))
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no updated entry in response".to_string());
                Err(Error::Protocol(format!("Masked email {} not updated: {}", id, detail)))
            }
        }
    }

    pub async fn enable(&self, id: &str) -> Result<String> {
        self.update(id, &MaskedEmailUpdate::state(MaskedEmailState::Enabled))
            .await
    }

    pub async fn disable(&self, id: &str) -> Result<String> {
        self.update(id, &MaskedEmailUpdate::state(MaskedEmailState::Disabled))
            .await
    }

    /// Mark as deleted. The address stays recoverable from the Fastmail UI.
    pub async fn delete(&self, id: &str) -> Result<String> {
        self.update(id, &MaskedEmailUpdate::state(MaskedEmailState::Deleted))
            .await
    }
}
