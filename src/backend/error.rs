use axum::http::StatusCode;
use thiserror::Error;

/// Terminal failures of one contact relay request. None are retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Missing required fields")]
    MissingFields,

    /// `field` names the form field or environment variable holding the value.
    #[error(
        "Invalid email address format for {field}. Use a full address such as name@example.com."
    )]
    InvalidAddress { field: &'static str },

    #[error("Email service not configured. Set {}.", .missing.join(", "))]
    NotConfigured { missing: Vec<&'static str> },

    #[error("Email service not configured. SMTP_PORT must be a port number, got '{value}'.")]
    InvalidPort { value: String },

    #[error("{message}")]
    Send { message: String },
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::InvalidAddress { .. } => StatusCode::BAD_REQUEST,
            Self::NotConfigured { .. } | Self::InvalidPort { .. } | Self::Send { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::InvalidAddress { .. } => "invalid_address",
            Self::NotConfigured { .. } => "config_missing",
            Self::InvalidPort { .. } => "config_invalid",
            Self::Send { .. } => "send_failed",
        }
    }
}
