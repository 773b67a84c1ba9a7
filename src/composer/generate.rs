//! AI content generation and attachment selection.

use tracing::info;

use super::{Composer, Draft};
use crate::backend::GenerateRequest;
use crate::error::{Result, ValidationError};
use crate::types::{Attachment, Event, GeneratedEmail, NoticeLevel};

impl Composer {
    /// Ask the backend to write a subject and body from `prompt`
    ///
    /// `context` is an optional document (resume, notes) the backend may
    /// use to personalize the result. The generated content replaces the
    /// current draft.
    pub async fn on_generate(
        &mut self,
        prompt: &str,
        context: Option<Attachment>,
    ) -> Result<GeneratedEmail> {
        if prompt.trim().is_empty() {
            let e = ValidationError::EmptyPrompt;
            self.notice(NoticeLevel::Error, e.to_string());
            return Err(e.into());
        }

        let request = GenerateRequest {
            prompt: prompt.to_string(),
            context,
        };

        self.loading(true, Some("Generating email content..."));
        let result = self.backend.generate_email(&request).await;
        self.loading(false, None);

        let generated = match result {
            Ok(generated) => generated,
            Err(e) => {
                self.notice(NoticeLevel::Error, e.user_message());
                return Err(e);
            }
        };

        info!(subject = %generated.subject, "email content generated");
        self.session.draft = Draft {
            subject: generated.subject.clone(),
            body_html: generated.body.clone(),
        };
        self.emit(Event::ContentGenerated {
            subject: generated.subject.clone(),
            body: generated.body.clone(),
        });
        self.notice(NoticeLevel::Success, "Email generated successfully!");
        Ok(generated)
    }

    /// Select the attachment sent with the next submission
    pub fn set_attachment(&mut self, attachment: Attachment) {
        self.emit(Event::AttachmentSelected {
            file_name: attachment.file_name.clone(),
        });
        self.session.attachment = Some(attachment);
    }

    /// Drop the selected attachment
    pub fn clear_attachment(&mut self) -> Option<Attachment> {
        self.session.attachment.take()
    }
}
