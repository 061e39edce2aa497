//! End-to-end tests against a mock JMAP server.

use fastmask_client::query::search;
use fastmask_client::{
    resolve_identifier, Credentials, Error, Field, MaskedEmailClient, MaskedEmailState,
    MaskedEmailUpdate, NewMaskedEmail,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "fmu1-test-token";
const CORE: &str = "urn:ietf:params:jmap:core";
const MASKED: &str = "https://www.fastmail.com/dev/maskedemail";

async fn mount_session(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/.well-known/jmap"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "apiUrl": format!("{}/jmap/api/", server.uri()),
            "primaryAccounts": {CORE: "u1", MASKED: "u1"},
            "accounts": {"u1": {"name": "me@fastmail.com", "isPersonal": true}},
            "username": "me@fastmail.com"
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> MaskedEmailClient {
    let creds = Credentials::new("me@fastmail.com", TOKEN).unwrap();
    MaskedEmailClient::with_session_url(&creds, format!("{}/.well-known/jmap", server.uri()))
}

fn method_response(name: &str, args: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "methodResponses": [[name, args, "0"]],
        "sessionState": "abc"
    }))
}

fn record(id: &str, description: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{}@fastmail.com", id),
        "state": "enabled",
        "description": description,
        "forDomain": "",
        "url": null,
        "createdAt": "2024-01-01T00:00:00Z",
        "lastMessageAt": null,
        "createdBy": "API Token: fastmask"
    })
}

#[tokio::test]
async fn fetch_reuses_session_and_sends_envelope() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .and(path("/jmap/api/"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(body_json(json!({
            "using": [CORE, MASKED],
            "methodCalls": [["MaskedEmail/get", {"accountId": "u1", "ids": null}, "0"]]
        })))
        .respond_with(method_response(
            "MaskedEmail/get",
            json!({"accountId": "u1", "list": [record("masked-1", "a"), record("masked-2", "b")], "notFound": []}),
        ))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    let first = client.fetch(None).await.unwrap();
    let second = client.fetch(None).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(client.account_id().await.unwrap(), "u1");
}

#[tokio::test]
async fn created_record_is_found_by_search() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .and(body_string_contains("MaskedEmail/set"))
        .respond_with(method_response(
            "MaskedEmail/set",
            json!({
                "accountId": "u1",
                "created": {"new-masked-email": {"id": "masked-9", "email": "masked-9@fastmail.com"}}
            }),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("MaskedEmail/get"))
        .respond_with(method_response(
            "MaskedEmail/get",
            json!({"accountId": "u1", "list": [record("masked-1", "other"), record("masked-9", "X")]}),
        ))
        .mount(&server)
        .await;

    let client = client(&server);
    let created = client
        .create(&NewMaskedEmail {
            description: "X".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let records = client.fetch(None).await.unwrap();
    let found = search(records, "x", &[Field::Description]);

    assert_eq!(created.email, "masked-9@fastmail.com");
    assert!(found.iter().any(|r| r.id == created.id));
}

#[tokio::test]
async fn resolve_then_update_by_number() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "using": [CORE, MASKED],
            "methodCalls": [["MaskedEmail/get", {"accountId": "u1", "ids": ["masked-42"]}, "0"]]
        })))
        .respond_with(method_response(
            "MaskedEmail/get",
            json!({"accountId": "u1", "list": [record("masked-42", "")], "notFound": []}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "using": [CORE, MASKED],
            "methodCalls": [["MaskedEmail/set", {"accountId": "u1", "update": {"masked-42": {"state": "disabled"}}}, "0"]]
        })))
        .respond_with(method_response(
            "MaskedEmail/set",
            json!({"accountId": "u1", "updated": {"masked-42": null}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let id = resolve_identifier(&client, "42").await.unwrap();
    let updated = client
        .update(&id, &MaskedEmailUpdate::state(MaskedEmailState::Disabled))
        .await
        .unwrap();

    assert_eq!(updated, "masked-42");
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .respond_with(method_response(
            "MaskedEmail/get",
            json!({"accountId": "u1", "list": [], "notFound": ["masked-404"]}),
        ))
        .mount(&server)
        .await;

    let err = resolve_identifier(&client(&server), "masked-404")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(err.to_string(), "Unable to find Masked Email \"masked-404\"");
}

#[tokio::test]
async fn rejected_session_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/jmap"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authorization header not a valid format"))
        .mount(&server)
        .await;

    let err = client(&server).fetch(None).await.unwrap_err();

    match err {
        Error::Transport(msg) => assert!(msg.contains("401")),
        other => panic!("Expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn server_error_on_call_is_transport_error() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).fetch(None).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn set_without_updated_entry_is_protocol_error() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("POST"))
        .respond_with(method_response(
            "MaskedEmail/set",
            json!({
                "accountId": "u1",
                "updated": null,
                "notUpdated": {"masked-1": {"type": "notFound"}}
            }),
        ))
        .mount(&server)
        .await;

    let changes = MaskedEmailUpdate {
        url: Some("https://example.com".to_string()),
        ..Default::default()
    };
    let err = client(&server).update("masked-1", &changes).await.unwrap_err();

    match err {
        Error::Protocol(msg) => assert!(msg.contains("notFound")),
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[tokio::test]
async fn method_error_is_protocol_error() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("POST"))
        .respond_with(method_response("error", json!({"type": "accountNotFound"})))
        .mount(&server)
        .await;

    let err = client(&server).fetch(None).await.unwrap_err();

    match err {
        Error::Protocol(msg) => assert!(msg.contains("accountNotFound")),
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_session_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/jmap"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"capabilities": {}})))
        .mount(&server)
        .await;

    let err = client(&server).account_id().await.unwrap_err();

    assert!(matches!(err, Error::Protocol(_)));
}
