use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::Response,
    Json,
};

use super::{
    address::{describe_send_failure, is_valid_address},
    config::SmtpSettings,
    error::ContactError,
    json_response, resolve_request_id,
    mailer::OutgoingMail,
    AppState,
};
use crate::api::{ContactMessage, ContactReply};

/// A submission with every field present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ContactSubmission {
    name: String,
    email: String,
    message: String,
}

impl ContactSubmission {
    fn from_message(message: ContactMessage) -> Result<Self, ContactError> {
        fn required(value: Option<String>) -> Option<String> {
            value
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        }

        match (
            required(message.name),
            required(message.email),
            required(message.message),
        ) {
            (Some(name), Some(email), Some(message)) => Ok(Self {
                name,
                email,
                message,
            }),
            _ => Err(ContactError::MissingFields),
        }
    }
}

pub(super) async fn submit_contact(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    payload: Result<Json<ContactMessage>, JsonRejection>,
) -> Response {
    let request_started_at = Instant::now();
    let request_id = resolve_request_id(&headers);

    tracing::info!(
        event = "contact_request_start",
        request_id = request_id.as_str(),
        method = method.as_str(),
        path = uri.path(),
    );

    let message = match payload {
        Ok(Json(message)) => Some(message),
        Err(rejection) => {
            tracing::debug!(
                request_id = request_id.as_str(),
                rejection = %rejection,
                "contact body rejected"
            );
            None
        }
    };

    match relay_contact(&state, message).await {
        Ok(id) => {
            tracing::info!(
                event = "contact_request_complete",
                request_id = request_id.as_str(),
                status = StatusCode::OK.as_u16(),
                duration_ms = request_started_at.elapsed().as_millis() as u64,
            );
            json_response(StatusCode::OK, ContactReply::sent(id), &request_id)
        }
        Err(error) => {
            let status = error.status();
            tracing::warn!(
                event = "contact_request_failed",
                request_id = request_id.as_str(),
                error_class = error.error_class(),
                status = status.as_u16(),
                message = %error,
                duration_ms = request_started_at.elapsed().as_millis() as u64,
            );
            json_response(status, ContactReply::error(error.to_string()), &request_id)
        }
    }
}

async fn relay_contact(
    state: &AppState,
    message: Option<ContactMessage>,
) -> Result<String, ContactError> {
    let submission = ContactSubmission::from_message(message.unwrap_or_default())?;
    let settings = SmtpSettings::resolve(state.env.as_ref())?;

    if !is_valid_address(&submission.email) {
        return Err(ContactError::InvalidAddress { field: "email" });
    }

    let mail = OutgoingMail::compose(
        &submission.name,
        &submission.email,
        &submission.message,
        &settings,
    );

    state
        .mailer
        .send(&settings, mail)
        .await
        .map_err(|provider_text| ContactError::Send {
            message: describe_send_failure(&provider_text),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: Option<&str>, email: Option<&str>, body: Option<&str>) -> ContactMessage {
        ContactMessage {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            message: body.map(str::to_string),
        }
    }

    #[test]
    fn every_field_is_required() {
        let cases = [
            message(None, Some("a@b.com"), Some("hi")),
            message(Some(""), Some("a@b.com"), Some("hi")),
            message(Some("Ada"), Some("   "), Some("hi")),
            message(Some("Ada"), Some("a@b.com"), None),
        ];

        for case in cases {
            assert_eq!(
                ContactSubmission::from_message(case),
                Err(ContactError::MissingFields)
            );
        }
    }

    #[test]
    fn fields_are_trimmed() {
        let submission =
            ContactSubmission::from_message(message(Some(" Ada "), Some("a@b.com\n"), Some(" hi ")))
                .expect("complete submission");

        assert_eq!(submission.name, "Ada");
        assert_eq!(submission.email, "a@b.com");
        assert_eq!(submission.message, "hi");
    }
}
