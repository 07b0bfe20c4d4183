//! Static file server plus the contact relay endpoint.

mod address;
pub mod config;
mod contact;
pub mod error;
pub mod logging;
pub mod mailer;

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{
    sync::atomic::{AtomicU64, Ordering},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::api::{ContactReply, CONTACT_PATH};
use config::{EnvSource, ProcessEnv, ServerConfig};
use mailer::{MailTransport, SmtpRelay};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone)]
pub struct AppState {
    env: Arc<dyn EnvSource>,
    mailer: Arc<dyn MailTransport>,
}

impl AppState {
    pub fn new(env: Arc<dyn EnvSource>, mailer: Arc<dyn MailTransport>) -> Self {
        Self { env, mailer }
    }

    /// Process environment and real SMTP delivery.
    pub fn production() -> Self {
        Self::new(Arc::new(ProcessEnv), Arc::new(SmtpRelay))
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ServerConfig::from_env(&ProcessEnv);
    logging::init_logging(&config.log)?;

    let index = config.static_dir.join("index.html");
    let app = api_router(AppState::production())
        .fallback_service(
            ServeDir::new(&config.static_dir).not_found_service(ServeFile::new(index)),
        )
        .layer(TraceLayer::new_for_http());

    let bind_address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(
        event = "server_listening",
        address = bind_address.as_str(),
        static_dir = %config.static_dir.display(),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

/// JSON API routes without the static fallback.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route(CONTACT_PATH, post(contact::submit_contact))
        .route("/contact", post(contact::submit_contact))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

fn json_response(
    status: StatusCode,
    payload: ContactReply,
    request_id: &str,
) -> axum::response::Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Ok(request_id_header) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }
    (status, headers, Json(payload)).into_response()
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    let value = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    value.unwrap_or_else(generate_request_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_is_echoed_when_present() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  abc-123 "));

        assert_eq!(resolve_request_id(&headers), "abc-123");
    }

    #[test]
    fn generated_request_ids_are_distinct() {
        let headers = HeaderMap::new();

        let first = resolve_request_id(&headers);
        let second = resolve_request_id(&headers);

        assert!(first.starts_with("req-"));
        assert_ne!(first, second);
    }
}
