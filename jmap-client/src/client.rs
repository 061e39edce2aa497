// jmap-client/src/client.rs
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::{Invocation, Request, Response, Session, SessionInfo};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

pub const JMAP_CORE_CAPABILITY: &str = "urn:ietf:params:jmap:core";

/// Call id used for the single invocation in each request
const CALL_ID: &str = "0";

/// JMAP client bound to one discovery endpoint.
///
/// The session is resolved on the first call and reused for the lifetime of
/// the client; a failed discovery is not cached.
pub struct JmapClient<C: HttpClient> {
    http: C,
    session_url: String,
    session: OnceCell<SessionInfo>,
}

impl<C: HttpClient> JmapClient<C> {
    pub fn new(http: C, session_url: impl Into<String>) -> Self {
        Self {
            http,
            session_url: session_url.into(),
            session: OnceCell::new(),
        }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// Resolve (once) and return the API url and primary account id
    pub async fn session(&self) -> Result<&SessionInfo> {
        self.session.get_or_try_init(|| self.fetch_session()).await
    }

    pub async fn account_id(&self) -> Result<&str> {
        Ok(&self.session().await?.account_id)
    }

    async fn fetch_session(&self) -> Result<SessionInfo> {
        debug!(url = %self.session_url, "fetching JMAP session");
        let resp_bytes = self.http.get(&self.session_url).await?;

        let session: Session = serde_json::from_slice(&resp_bytes)
            .map_err(|e| Error::Protocol(format!("malformed session: {}", e)))?;

        let account_id = session
            .primary_account(JMAP_CORE_CAPABILITY)
            .ok_or_else(|| {
                Error::Protocol(format!(
                    "session has no primary account for {}",
                    JMAP_CORE_CAPABILITY
                ))
            })?
            .to_string();

        debug!(api_url = %session.api_url, account_id = %account_id, "JMAP session resolved");
        Ok(SessionInfo {
            api_url: session.api_url,
            account_id,
        })
    }

    /// Make a JMAP request with a single method call, returning the
    /// arguments of the first method response
    pub async fn call_method_with_using(
        &self,
        using: &[&str],
        method: &str,
        params: Value,
    ) -> Result<Value> {
        let session = self.session().await?;

        let request = Request {
            using: using.iter().map(|s| s.to_string()).collect(),
            method_calls: vec![Invocation(method.to_string(), params, CALL_ID.to_string())],
        };
        let body = serde_json::to_vec(&request)?;

        debug!(method, api_url = %session.api_url, "JMAP call");
        let resp_bytes = self.http.post_json(&session.api_url, body).await?;

        let resp: Response = serde_json::from_slice(&resp_bytes)
            .map_err(|e| Error::Protocol(format!("malformed response: {}", e)))?;

        let invocation = resp
            .method_responses
            .into_iter()
            .next()
            .ok_or_else(|| Error::Protocol("empty methodResponses".to_string()))?;
        debug!(name = invocation.name(), call_id = invocation.call_id(), "JMAP response");

        // Method-level failures come back as ["error", {type, description}, callId]
        if invocation.name() == "error" {
            let args = invocation.arguments();
            return Err(Error::Method {
                type_: args
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                description: args
                    .get("description")
                    .and_then(Value::as_str)
                    .map(String::from),
            });
        }

        Ok(invocation.into_arguments())
    }

    /// Make a JMAP request using only the core capability
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        self.call_method_with_using(&[JMAP_CORE_CAPABILITY], method, params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeHttp {
        session: Option<Value>,
        post_reply: Option<Value>,
        gets: Mutex<usize>,
        posts: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl HttpClient for FakeHttp {
        async fn post_json(&self, _url: &str, body: Vec<u8>) -> std::result::Result<Vec<u8>, HttpError> {
            self.posts
                .lock()
                .unwrap()
                .push(serde_json::from_slice(&body).unwrap());
            Ok(serde_json::to_vec(self.post_reply.as_ref().unwrap()).unwrap())
        }

        async fn get(&self, _url: &str) -> std::result::Result<Vec<u8>, HttpError> {
            *self.gets.lock().unwrap() += 1;
            match &self.session {
                Some(s) => Ok(serde_json::to_vec(s).unwrap()),
                None => Err(HttpError {
                    status: Some(401),
                    message: "Unauthorized".to_string(),
                }),
            }
        }
    }

    fn session_json() -> Value {
        json!({
            "apiUrl": "https://api.example.com/jmap/api/",
            "primaryAccounts": {"urn:ietf:params:jmap:core": "u42"},
            "accounts": {}
        })
    }

    #[tokio::test]
    async fn test_session_is_fetched_once() {
        let http = FakeHttp {
            session: Some(session_json()),
            ..Default::default()
        };
        let client = JmapClient::new(http, "https://api.example.com/.well-known/jmap");

        let first = client.session().await.unwrap().clone();
        let second = client.session().await.unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(first.account_id, "u42");
        assert_eq!(*client.http.gets.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_session_without_core_account_is_protocol_error() {
        let http = FakeHttp {
            session: Some(json!({"apiUrl": "https://x/", "primaryAccounts": {}})),
            ..Default::default()
        };
        let client = JmapClient::new(http, "https://x/.well-known/jmap");

        assert!(matches!(client.session().await, Err(Error::Protocol(_))));
    }

    #[tokio::test]
    async fn test_session_http_failure_is_transport_error() {
        let client = JmapClient::new(FakeHttp::default(), "https://x/.well-known/jmap");

        match client.session().await {
            Err(Error::Transport(e)) => assert_eq!(e.status, Some(401)),
            other => panic!("Expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_call_builds_envelope_and_returns_first_arguments() {
        let http = FakeHttp {
            session: Some(session_json()),
            post_reply: Some(json!({
                "methodResponses": [["Foo/get", {"list": []}, "0"]],
                "sessionState": "s1"
            })),
            ..Default::default()
        };
        let client = JmapClient::new(http, "https://x/.well-known/jmap");

        let args = client
            .call_method_with_using(&["a", "b"], "Foo/get", json!({"accountId": "u42"}))
            .await
            .unwrap();

        assert_eq!(args, json!({"list": []}));
        let posts = client.http.posts.lock().unwrap();
        assert_eq!(
            posts[0],
            json!({"using": ["a", "b"], "methodCalls": [["Foo/get", {"accountId": "u42"}, "0"]]})
        );
    }

    #[tokio::test]
    async fn test_call_surfaces_method_error() {
        let http = FakeHttp {
            session: Some(session_json()),
            post_reply: Some(json!({
                "methodResponses": [["error", {"type": "unknownMethod"}, "0"]]
            })),
            ..Default::default()
        };
        let client = JmapClient::new(http, "https://x/.well-known/jmap");

        let err = client.call("Foo/get", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::Method { ref type_, .. } if type_ == "unknownMethod"));
    }
}
