//! JSON bodies exchanged between the page and the contact relay.

use serde::{Deserialize, Serialize};

pub const CONTACT_PATH: &str = "/api/contact";

/// Contact form submission. Every field is optional on the wire so that
/// missing and empty fields are reported the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactReply {
    pub fn sent(id: impl Into<String>) -> Self {
        Self {
            ok: true,
            id: Some(id.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            error: Some(message.into()),
        }
    }
}
