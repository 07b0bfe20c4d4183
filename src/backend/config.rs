use std::{collections::HashMap, path::PathBuf};

use super::{
    address::{is_valid_address, normalize_account},
    error::ContactError,
    logging::{LogConfig, LogFormat},
};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "dist";
const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_SMTP_PORT: u16 = 587;
/// SMTP submission port that speaks TLS from the first byte.
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// Read access to environment variables.
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

fn non_empty(env: &dyn EnvSource, name: &str) -> Option<String> {
    env.var(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u16_with_bounds(env: &dyn EnvSource, name: &str, default: u16, bounds: (u16, u16)) -> u16 {
    non_empty(env, name)
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    pub log: LogConfig,
}

impl ServerConfig {
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let port = parse_u16_with_bounds(env, "PORT", DEFAULT_PORT, (1, u16::MAX));
        let static_dir = non_empty(env, "STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));
        let filter = non_empty(env, "RUST_LOG")
            .or_else(|| non_empty(env, "LOG_LEVEL").map(|value| value.to_ascii_lowercase()))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let format = non_empty(env, "LOG_FORMAT")
            .and_then(|value| LogFormat::parse(&value))
            .unwrap_or_default();

        Self {
            port,
            static_dir,
            log: LogConfig { filter, format },
        }
    }
}

/// Everything needed to hand one message to the SMTP relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub implicit_tls: bool,
    pub username: String,
    pub password: String,
    /// Envelope sender: the account address.
    pub sender: String,
    pub recipient: String,
}

impl SmtpSettings {
    /// Resolve from the environment. Recipient falls back from
    /// `CONTACT_TO_EMAIL` to `TO_EMAIL` to the account itself.
    pub fn resolve(env: &dyn EnvSource) -> Result<Self, ContactError> {
        let host = non_empty(env, "SMTP_HOST");
        let username = non_empty(env, "SMTP_USER");
        let password = non_empty(env, "SMTP_PASS");
        let recipient = non_empty(env, "CONTACT_TO_EMAIL")
            .map(|value| (value, "CONTACT_TO_EMAIL"))
            .or_else(|| non_empty(env, "TO_EMAIL").map(|value| (value, "TO_EMAIL")))
            .or_else(|| {
                username
                    .as_deref()
                    .map(|user| (normalize_account(user), "SMTP_USER"))
            });

        let (Some(host), Some(username), Some(password), Some((recipient, recipient_source))) =
            (host.clone(), username.clone(), password.clone(), recipient.clone())
        else {
            let mut missing = Vec::new();
            if host.is_none() {
                missing.push("SMTP_HOST");
            }
            if username.is_none() {
                missing.push("SMTP_USER");
            }
            if password.is_none() {
                missing.push("SMTP_PASS");
            }
            if recipient.is_none() {
                missing.push("CONTACT_TO_EMAIL");
            }
            return Err(ContactError::NotConfigured { missing });
        };

        let port = match non_empty(env, "SMTP_PORT") {
            Some(value) => match value.parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ContactError::InvalidPort { value }),
            },
            None => DEFAULT_SMTP_PORT,
        };

        let sender = normalize_account(&username);
        if !is_valid_address(&recipient) {
            return Err(ContactError::InvalidAddress {
                field: recipient_source,
            });
        }
        if !is_valid_address(&sender) {
            return Err(ContactError::InvalidAddress { field: "SMTP_USER" });
        }

        Ok(Self {
            host,
            port,
            implicit_tls: port == IMPLICIT_TLS_PORT,
            username,
            password,
            sender,
            recipient,
        })
    }
}
