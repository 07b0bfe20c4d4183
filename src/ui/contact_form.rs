//! Contact form fields and submission status.

use std::time::Duration;

use super::schedule::{Deadline, Timed};
use crate::api::{ContactMessage, ContactReply};

pub const SUCCESS_RESET_DELAY: Duration = Duration::from_secs(5);
pub const SENDING_MESSAGE: &str = "Sending message...";
pub const SUCCESS_MESSAGE: &str =
    "Thank you! Your message has been sent successfully. I'll get back to you soon.";
pub const FALLBACK_ERROR_MESSAGE: &str =
    "Sorry, there was an error sending your message. Please try again or contact me directly.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Sending,
    Sent,
    Failed(String),
}

impl FormStatus {
    pub fn message(&self) -> &str {
        match self {
            Self::Idle => "",
            Self::Sending => SENDING_MESSAGE,
            Self::Sent => SUCCESS_MESSAGE,
            Self::Failed(message) => message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    status: FormStatus,
    reset: Deadline,
}

impl ContactForm {
    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn set_field(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
        }
    }

    /// Enter the sending state and hand back the payload. Returns `None`
    /// while a previous submission is still in flight.
    pub fn begin_submit(&mut self) -> Option<ContactMessage> {
        if self.status == FormStatus::Sending {
            return None;
        }
        self.reset.cancel();
        self.status = FormStatus::Sending;

        Some(ContactMessage {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            message: Some(self.message.clone()),
        })
    }

    /// Apply the relay's reply (`None` when the request itself failed).
    pub fn finish_submit(&mut self, reply: Option<ContactReply>, now: Duration) {
        match reply {
            Some(reply) if reply.ok => {
                self.name.clear();
                self.email.clear();
                self.message.clear();
                self.status = FormStatus::Sent;
                self.reset.arm(now, SUCCESS_RESET_DELAY);
            }
            Some(reply) => {
                let message = reply
                    .error
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
                self.status = FormStatus::Failed(message);
            }
            None => {
                self.status = FormStatus::Failed(FALLBACK_ERROR_MESSAGE.to_string());
            }
        }
    }

    pub fn unmount(&mut self) {
        self.reset.cancel();
    }
}

impl Timed for ContactForm {
    fn next_deadline(&self) -> Option<Duration> {
        self.reset.at()
    }

    fn fire(&mut self, now: Duration) {
        if self.reset.take_if_due(now) && self.status == FormStatus::Sent {
            self.status = FormStatus::Idle;
        }
    }
}
