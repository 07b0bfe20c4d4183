use lettre::Address;
use regex::Regex;
use std::sync::LazyLock;

/// Appended to a bare SMTP account name that carries no domain.
pub const DEFAULT_MAIL_DOMAIN: &str = "gmail.com";

pub const ADDRESS_FORMAT_HINT: &str =
    "Check that SMTP_USER and CONTACT_TO_EMAIL are full email addresses, e.g. name@example.com.";

static ADDRESS_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("address pattern compiles")
});

/// Provider replies that blame an address: SMTP `5.1.x` enhanced codes or
/// wording about mailboxes, recipients and syntax. DNS lookup failures
/// ("failed to lookup address information") do not match.
static ADDRESS_PROBLEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b5\.1\.\d+\b|mailbox|recipient|syntax|invalid domain|invalid (?:\w+ )?address",
    )
    .expect("provider pattern compiles")
});

/// `local@domain.tld` shape that the SMTP client can also parse, so anything
/// accepted here is deliverable as a header value.
pub fn is_valid_address(value: &str) -> bool {
    ADDRESS_SHAPE.is_match(value) && value.parse::<Address>().is_ok()
}

pub fn normalize_account(user: &str) -> String {
    if user.contains('@') {
        user.to_string()
    } else {
        format!("{user}@{DEFAULT_MAIL_DOMAIN}")
    }
}

pub fn domain_of(address: &str) -> &str {
    address
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
        .unwrap_or("localhost")
}

fn mentions_address_problem(provider_text: &str) -> bool {
    ADDRESS_PROBLEM.is_match(provider_text)
}

/// Provider error text, with [`ADDRESS_FORMAT_HINT`] appended when the text
/// points at a malformed address.
pub fn describe_send_failure(provider_text: &str) -> String {
    let text = provider_text.trim();
    if text.is_empty() {
        return "Failed to send".to_string();
    }
    if mentions_address_problem(text) {
        format!("{text}. {ADDRESS_FORMAT_HINT}")
    } else {
        text.to_string()
    }
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
