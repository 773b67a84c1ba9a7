//! Manual recipient entry.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ValidationError;

/// Loose `local@domain.tld` pattern; not RFC 5322
const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+";

#[allow(clippy::expect_used)]
fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("static regex must compile"))
}

/// Every address-shaped token in `text`, in order of appearance
pub fn extract_emails(text: &str) -> Vec<String> {
    email_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parse free-form text into a candidate list
///
/// Fails when the input is blank or contains no address-shaped token.
pub fn parse_manual(text: &str) -> Result<Vec<String>, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyRecipientInput);
    }
    let emails = extract_emails(text);
    if emails.is_empty() {
        return Err(ValidationError::NoEmailsFound);
    }
    Ok(emails)
}
