//! Compose submission builder.
//!
//! A [`ComposeForm`] is the mutable state of the compose screen. At send
//! time it is validated against the current recipient list and frozen
//! into an immutable [`Submission`].

use crate::error::{Result, ValidationError};
use crate::types::{Attachment, SendingMode};
use crate::utils;

/// Fields of the compose screen
#[derive(Clone, Default)]
pub struct ComposeForm {
    /// Sender email address
    pub sender_email: String,
    /// Sender secret (SMTP app password)
    pub sender_password: String,
    /// Subject line
    pub subject: String,
    /// HTML body as produced by the editor
    pub body_html: String,
    /// Plain-text rendering of the body; derived from the HTML when `None`
    pub body_text: Option<String>,
    /// Selected sending mode
    pub mode: SendingMode,
    /// Optional attachment
    pub attachment: Option<Attachment>,
}

impl std::fmt::Debug for ComposeForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposeForm")
            .field("sender_email", &self.sender_email)
            .field("sender_password", &"<redacted>")
            .field("subject", &self.subject)
            .field("body_html_len", &self.body_html.len())
            .field("mode", &self.mode)
            .field(
                "attachment",
                &self.attachment.as_ref().map(|a| a.file_name.as_str()),
            )
            .finish()
    }
}

/// Immutable send request, built once per send action
#[derive(Clone, PartialEq, Eq)]
pub struct Submission {
    sender_email: String,
    sender_password: String,
    subject: String,
    body_html: String,
    body_text: String,
    recipients: Vec<String>,
    mode: SendingMode,
    attachment: Option<Attachment>,
}

impl Submission {
    /// Validate `form` and snapshot it together with `recipients`
    ///
    /// Checks run in order and stop at the first failure: credentials,
    /// recipients, subject, then body (an attachment-only email passes).
    pub fn build(form: &ComposeForm, recipients: &[String]) -> std::result::Result<Self, ValidationError> {
        if form.sender_email.trim().is_empty() || form.sender_password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        if recipients.is_empty() {
            return Err(ValidationError::NoRecipients);
        }
        if form.subject.trim().is_empty() {
            return Err(ValidationError::EmptySubject);
        }

        let body_text = match &form.body_text {
            Some(text) => text.trim().to_string(),
            None => utils::html_to_text(&form.body_html),
        };
        if body_text.is_empty() && form.attachment.is_none() {
            return Err(ValidationError::EmptyBody);
        }

        Ok(Self {
            sender_email: form.sender_email.trim().to_string(),
            sender_password: form.sender_password.clone(),
            subject: form.subject.clone(),
            body_html: form.body_html.clone(),
            body_text,
            recipients: recipients.to_vec(),
            mode: form.mode,
            attachment: form.attachment.clone(),
        })
    }

    /// Sender email address
    pub fn sender_email(&self) -> &str {
        &self.sender_email
    }

    /// Sender secret
    pub fn sender_password(&self) -> &str {
        &self.sender_password
    }

    /// Subject line
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// HTML body
    pub fn body_html(&self) -> &str {
        &self.body_html
    }

    /// Plain-text fallback body
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// Recipient snapshot taken at build time
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Sending mode
    pub fn mode(&self) -> SendingMode {
        self.mode
    }

    /// Attachment, if any
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Recipients encoded as a JSON array, as the `recipients` form field expects
    pub fn recipients_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.recipients)?)
    }
}

impl std::fmt::Debug for Submission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submission")
            .field("sender_email", &self.sender_email)
            .field("sender_password", &"<redacted>")
            .field("subject", &self.subject)
            .field("recipients", &self.recipients.len())
            .field("mode", &self.mode)
            .field(
                "attachment",
                &self.attachment.as_ref().map(|a| a.file_name.as_str()),
            )
            .finish()
    }
}
