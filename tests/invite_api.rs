use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use calenvite::api;
use calenvite::config::{Config, MailgunConfig};
use calenvite::error::Result;
use calenvite::invite::InviteService;
use calenvite::mail::{EmailTransport, OutgoingEmail};
use calenvite::state::AppState;

/// Transport stub that records recipient lists and attachment presence.
struct StubTransport {
    sends: Mutex<Vec<(Vec<String>, bool)>>,
}

impl StubTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sends: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl EmailTransport for StubTransport {
    async fn send(&self, email: &OutgoingEmail<'_>) -> Result<String> {
        self.sends
            .lock()
            .unwrap()
            .push((email.recipients.to_vec(), email.attachment.is_some()));
        Ok("<stub-id>".to_string())
    }
}

fn complete_mailgun_config() -> Config {
    Config {
        send_using: Some("MAILGUN".to_string()),
        sender_address: Some("noreply@example.com".to_string()),
        mailgun: MailgunConfig {
            domain: Some("mg.example.com".to_string()),
            api_key: Some("key-secret".to_string()),
        },
        ..Config::default()
    }
}

fn app(config: Config, transport: Option<Arc<StubTransport>>) -> axum::Router {
    let invites = transport.map(|t| InviteService::new(t as Arc<dyn EmailTransport>));
    api::create_router(AppState::new(config, invites))
}

fn post_invite(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/invite/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthcheck_fails_when_mailgun_key_missing() {
    let mut config = complete_mailgun_config();
    config.mailgun.api_key = None;
    let app = app(config, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthcheck")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn healthcheck_ok_when_config_complete() {
    let app = app(complete_mailgun_config(), None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthcheck")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_payload_is_rejected_with_field_errors() {
    let transport = StubTransport::new();
    let app = app(complete_mailgun_config(), Some(transport.clone()));

    let response = app.oneshot(post_invite("{}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["message"], "INVALID_PAYLOAD");
    assert_eq!(json["status_code"], 400);

    let fields: Vec<&str> = json["error_fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["users", "email_subject", "email_body"]);

    assert_eq!(transport.sends.lock().unwrap().len(), 0);
}

#[tokio::test]
async fn malformed_user_email_is_rejected() {
    let transport = StubTransport::new();
    let app = app(complete_mailgun_config(), Some(transport.clone()));

    let body = r#"{
        "users": [{"email": "not-an-email"}],
        "email_subject": "Hi",
        "email_body": "Body"
    }"#;
    let response = app.oneshot(post_invite(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error_fields"][0]["field"], "email");
    assert_eq!(json["error_fields"][0]["code"], "email");
    assert_eq!(transport.sends.lock().unwrap().len(), 0);
}

#[tokio::test]
async fn invite_without_invitation_sends_once() {
    let transport = StubTransport::new();
    let app = app(complete_mailgun_config(), Some(transport.clone()));

    let body = r#"{
        "users": [{"email": "a@x.com"}],
        "email_subject": "Hi",
        "email_body": "Body",
        "email_is_html": false
    }"#;
    let response = app.oneshot(post_invite(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["message"], "SENT_OK");
    assert_eq!(json["status_code"], 200);

    let sends = transport.sends.lock().unwrap();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].0, vec!["a@x.com".to_string()]);
    assert!(!sends[0].1, "no attachment expected without an invitation");
}

#[tokio::test]
async fn invite_with_invitation_also_notifies_organizer() {
    let transport = StubTransport::new();
    let app = app(complete_mailgun_config(), Some(transport.clone()));

    let body = r#"{
        "users": [{"full_name": "Ada", "email": "a@x.com"}],
        "invitation": {
            "start_at": "2030-01-01T10:00:00Z",
            "end_at": "2030-01-01T11:00:00Z",
            "organizer_email": "org@x.com",
            "organizer_full_name": "Org"
        },
        "email_subject": "Hi",
        "email_body": "Body"
    }"#;
    let response = app.oneshot(post_invite(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["message"], "SENT_OK");

    let sends = transport.sends.lock().unwrap();
    assert_eq!(sends.len(), 2);
    assert_eq!(sends[0].0, vec!["a@x.com".to_string()]);
    assert!(sends[0].1);
    assert_eq!(sends[1].0, vec!["org@x.com".to_string()]);
    assert!(sends[1].1);
}

#[tokio::test]
async fn malformed_start_at_is_an_internal_error() {
    let transport = StubTransport::new();
    let app = app(complete_mailgun_config(), Some(transport.clone()));

    let body = r#"{
        "users": [{"email": "a@x.com"}],
        "invitation": {
            "start_at": "not-a-date",
            "end_at": "2030-01-01T11:00:00Z",
            "organizer_email": "org@x.com",
            "organizer_full_name": "Org"
        },
        "email_subject": "Hi",
        "email_body": "Body"
    }"#;
    let response = app.oneshot(post_invite(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = response_json(response).await;
    assert_eq!(json["message"], "ERROR");
    assert_eq!(json["status_code"], 500);
    assert_eq!(transport.sends.lock().unwrap().len(), 0);
}

#[tokio::test]
async fn invite_errors_when_no_transport_is_wired() {
    let app = app(complete_mailgun_config(), None);

    let body = r#"{
        "users": [{"email": "a@x.com"}],
        "email_subject": "Hi",
        "email_body": "Body"
    }"#;
    let response = app.oneshot(post_invite(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = response_json(response).await;
    assert_eq!(json["message"], "ERROR");
}
