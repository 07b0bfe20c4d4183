use std::time::Duration;

use futures_util::future::BoxFuture;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use uuid::Uuid;

use super::{
    address::{domain_of, escape_html},
    config::SmtpSettings,
};

const SMTP_TIMEOUT: Duration = Duration::from_secs(20);

/// One fully composed contact message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from_name: String,
    pub from: String,
    pub reply_to: String,
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub message_id: String,
}

impl OutgoingMail {
    pub fn compose(name: &str, email: &str, message: &str, settings: &SmtpSettings) -> Self {
        let message_id = format!("<{}@{}>", Uuid::new_v4(), domain_of(&settings.sender));
        let html_message = escape_html(message).replace('\n', "<br/>");

        Self {
            from_name: format!("Portfolio Contact | {name}"),
            from: settings.sender.clone(),
            reply_to: email.to_string(),
            to: settings.recipient.clone(),
            subject: format!("New message from {name}"),
            text_body: format!("From: {name} <{email}>\n\n{message}"),
            html_body: format!(
                "<p><strong>From:</strong> {} &lt;{}&gt;</p><p>{html_message}</p>",
                escape_html(name),
                escape_html(email),
            ),
            message_id,
        }
    }
}

/// Hands a message to the mail provider. Returns the accepted message id or
/// the provider's error text.
pub trait MailTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        settings: &'a SmtpSettings,
        mail: OutgoingMail,
    ) -> BoxFuture<'a, Result<String, String>>;
}

#[derive(Debug, Error)]
enum DeliveryError {
    #[error("{0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("{0}")]
    Message(#[from] lettre::error::Error),
    #[error("{0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// SMTP delivery through `lettre`, one connection per message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpRelay;

impl MailTransport for SmtpRelay {
    fn send<'a>(
        &'a self,
        settings: &'a SmtpSettings,
        mail: OutgoingMail,
    ) -> BoxFuture<'a, Result<String, String>> {
        Box::pin(async move { deliver(settings, mail).await.map_err(|error| error.to_string()) })
    }
}

async fn deliver(settings: &SmtpSettings, mail: OutgoingMail) -> Result<String, DeliveryError> {
    let from = Mailbox::new(Some(mail.from_name), mail.from.parse::<Address>()?);
    let reply_to: Mailbox = mail.reply_to.parse()?;
    let to: Mailbox = mail.to.parse()?;

    let message = Message::builder()
        .from(from)
        .reply_to(reply_to)
        .to(to)
        .subject(mail.subject)
        .message_id(Some(mail.message_id.clone()))
        .multipart(MultiPart::alternative_plain_html(mail.text_body, mail.html_body))?;

    let builder = if settings.implicit_tls {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
    };
    let transport = builder
        .port(settings.port)
        .credentials(Credentials::new(
            settings.username.clone(),
            settings.password.clone(),
        ))
        .timeout(Some(SMTP_TIMEOUT))
        .build();

    transport.send(message).await?;
    Ok(mail.message_id)
}
