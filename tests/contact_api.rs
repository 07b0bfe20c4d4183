#![cfg(not(target_arch = "wasm32"))]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use futures_util::future::BoxFuture;
use portfolio::{
    api::ContactReply,
    backend::{
        api_router,
        config::SmtpSettings,
        mailer::{MailTransport, OutgoingMail},
        AppState, REQUEST_ID_HEADER,
    },
};
use tower::ServiceExt;

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(SmtpSettings, OutgoingMail)>>,
    fail_with: Option<String>,
}

impl MailTransport for RecordingTransport {
    fn send<'a>(
        &'a self,
        settings: &'a SmtpSettings,
        mail: OutgoingMail,
    ) -> BoxFuture<'a, Result<String, String>> {
        let result = match &self.fail_with {
            Some(text) => Err(text.clone()),
            None => Ok(mail.message_id.clone()),
        };
        self.sent
            .lock()
            .expect("transport log lock")
            .push((settings.clone(), mail));
        Box::pin(async move { result })
    }
}

fn configured_env() -> HashMap<String, String> {
    [
        ("SMTP_HOST", "smtp.example.com"),
        ("SMTP_PORT", "465"),
        ("SMTP_USER", "relay@example.com"),
        ("SMTP_PASS", "secret"),
        ("CONTACT_TO_EMAIL", "owner@example.com"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

fn app(env: HashMap<String, String>, transport: Arc<RecordingTransport>) -> Router {
    api_router(AppState::new(Arc::new(env), transport))
}

fn contact_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, ContactReply) {
    let response = app.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body reads");
    let reply = serde_json::from_slice(&bytes).expect("body is a contact reply");
    (status, reply)
}

const VALID_BODY: &str = r#"{"name":"Ada","email":"ada@example.org","message":"Hello\nthere"}"#;

#[tokio::test]
async fn empty_name_is_rejected_before_touching_configuration() {
    let transport = Arc::new(RecordingTransport::default());

    let (status, reply) = send(
        app(HashMap::new(), transport.clone()),
        contact_request(r#"{"name":"","email":"a@b.com","message":"hi"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply, ContactReply::error("Missing required fields"));
    assert!(transport.sent.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn malformed_body_is_treated_as_missing_fields() {
    let (status, reply) = send(
        app(configured_env(), Arc::new(RecordingTransport::default())),
        contact_request("{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!reply.ok);
}

#[tokio::test]
async fn missing_smtp_host_reports_configuration_error() {
    let mut env = configured_env();
    env.remove("SMTP_HOST");

    let (status, reply) = send(
        app(env, Arc::new(RecordingTransport::default())),
        contact_request(VALID_BODY),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = reply.error.expect("error message");
    assert!(error.contains("not configured"), "{error}");
    assert!(error.contains("SMTP_HOST"), "{error}");
}

#[tokio::test]
async fn malformed_recipient_is_rejected_with_format_message() {
    let mut env = configured_env();
    env.insert("CONTACT_TO_EMAIL".to_string(), "owner-at-example".to_string());

    let (status, reply) = send(
        app(env, Arc::new(RecordingTransport::default())),
        contact_request(VALID_BODY),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = reply.error.expect("error message");
    assert!(error.contains("format"), "{error}");
    assert!(error.contains("CONTACT_TO_EMAIL"), "{error}");
}

#[tokio::test]
async fn malformed_submitter_address_is_rejected() {
    let (status, reply) = send(
        app(configured_env(), Arc::new(RecordingTransport::default())),
        contact_request(r#"{"name":"Ada","email":"ada at home","message":"hi"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(reply.error.expect("error message").contains("email"));
}

#[tokio::test]
async fn submitter_address_the_mailer_cannot_parse_is_rejected() {
    let transport = Arc::new(RecordingTransport::default());

    let (status, reply) = send(
        app(configured_env(), transport.clone()),
        contact_request(r#"{"name":"Ada","email":"a,b@c.com","message":"hi"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = reply.error.expect("error message");
    assert!(error.contains("format"), "{error}");
    assert!(transport.sent.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn successful_relay_returns_message_id() {
    let transport = Arc::new(RecordingTransport::default());
    let mut request = contact_request(VALID_BODY);
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, "req-from-test".parse().expect("header value"));

    let response = app(configured_env(), transport.clone())
        .oneshot(request)
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).and_then(|value| value.to_str().ok()),
        Some("req-from-test")
    );
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).and_then(|value| value.to_str().ok()),
        Some("no-store")
    );

    let bytes = to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body reads");
    let reply: ContactReply = serde_json::from_slice(&bytes).expect("contact reply");
    assert!(reply.ok);
    let id = reply.id.expect("message id");
    assert!(!id.is_empty());

    let sent = transport.sent.lock().expect("lock");
    assert_eq!(sent.len(), 1);
    let (settings, mail) = &sent[0];
    assert!(settings.implicit_tls);
    assert_eq!(mail.message_id, id);
    assert_eq!(mail.from, "relay@example.com");
    assert_eq!(mail.reply_to, "ada@example.org");
    assert_eq!(mail.to, "owner@example.com");
    assert!(mail.html_body.contains("Hello<br/>there"));
}

#[tokio::test]
async fn provider_failure_carries_text_and_address_hint() {
    let transport = Arc::new(RecordingTransport {
        fail_with: Some("501 5.1.7 Bad sender address syntax".to_string()),
        ..Default::default()
    });

    let (status, reply) = send(app(configured_env(), transport), contact_request(VALID_BODY)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = reply.error.expect("error message");
    assert!(error.starts_with("501 5.1.7 Bad sender address syntax"), "{error}");
    assert!(error.contains("full email addresses"), "{error}");
}

#[tokio::test]
async fn legacy_contact_path_is_served() {
    let request = Request::builder()
        .method("POST")
        .uri("/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(VALID_BODY))
        .expect("request builds");

    let (status, reply) = send(
        app(configured_env(), Arc::new(RecordingTransport::default())),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(reply.ok);
}
