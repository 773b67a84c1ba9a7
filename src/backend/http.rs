//! HTTP implementation of the backend seam.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Backend, GenerateRequest, SendResponse};
use crate::compose::Submission;
use crate::config::BackendConfig;
use crate::error::{BackendErrorBody, Error, Result};
use crate::types::{Attachment, CsvUpload, GeneratedEmail, TaskId, TaskSnapshot};

/// `parse-csv` success body
#[derive(Debug, Deserialize)]
struct ParseCsvResponse {
    recipients: Vec<String>,
}

/// Backend reached over HTTP with reqwest
pub struct HttpBackend {
    /// Shared HTTP client (connection pooling, timeout, user agent)
    client: reqwest::Client,
    /// Base URL and request settings
    config: BackendConfig,
}

impl HttpBackend {
    /// Create a new HTTP backend
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be created
    pub fn new(config: BackendConfig) -> Result<Self> {
        // Reject a bad base URL up front
        config.endpoint("")?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Turn a response into `T`, or into [`Error::Backend`] with the
    /// response's `detail` (or `fallback` when it has none)
    async fn decode<T: DeserializeOwned>(response: reqwest::Response, fallback: &str) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<BackendErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        debug!(status = status.as_u16(), detail = %detail, "backend returned error");
        Err(Error::Backend {
            status: status.as_u16(),
            detail,
        })
    }
}

fn file_part(bytes: Vec<u8>, file_name: &str, content_type: &str) -> Result<Part> {
    Ok(Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(content_type)?)
}

fn attachment_part(attachment: &Attachment) -> Result<Part> {
    file_part(
        attachment.bytes.clone(),
        &attachment.file_name,
        &attachment.content_type,
    )
}

/// Multipart body for `send-email`
fn submission_form(submission: &Submission) -> Result<Form> {
    let mut form = Form::new()
        .text("sender_email", submission.sender_email().to_string())
        .text("sender_password", submission.sender_password().to_string())
        .text("recipients", submission.recipients_json()?)
        .text("subject", submission.subject().to_string())
        .text("body", submission.body_html().to_string())
        .text("sending_mode", submission.mode().as_str());

    if let Some(attachment) = submission.attachment() {
        form = form.part("attachment", attachment_part(attachment)?);
    }

    Ok(form)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn parse_csv(&self, upload: &CsvUpload) -> Result<Vec<String>> {
        let url = self.config.endpoint("parse-csv")?;
        let content_type = upload.content_type.as_deref().unwrap_or("text/csv");
        let form = Form::new().part(
            "file",
            file_part(upload.bytes.clone(), &upload.file_name, content_type)?,
        );

        debug!(file = %upload.file_name, bytes = upload.bytes.len(), "uploading CSV");
        let response = self.client.post(url).multipart(form).send().await?;
        let parsed: ParseCsvResponse = Self::decode(response, "Failed to parse CSV").await?;
        Ok(parsed.recipients)
    }

    async fn generate_email(&self, request: &GenerateRequest) -> Result<GeneratedEmail> {
        let url = self.config.endpoint("generate-email")?;
        let mut form = Form::new().text("prompt", request.prompt.clone());
        if let Some(context) = &request.context {
            form = form.part("resume", attachment_part(context)?);
        }

        let response = self.client.post(url).multipart(form).send().await?;
        Self::decode(response, "Generation failed").await
    }

    async fn send_email(&self, submission: &Submission) -> Result<SendResponse> {
        let url = self.config.endpoint("send-email")?;
        let form = submission_form(submission)?;

        debug!(
            recipients = submission.recipients().len(),
            mode = %submission.mode(),
            "dispatching submission"
        );
        let response = self.client.post(url).multipart(form).send().await?;
        Self::decode(response, "Sending failed").await
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<TaskSnapshot> {
        let path = format!("task-status/{}", urlencoding::encode(task_id.as_str()));
        let url = self.config.endpoint(&path)?;

        let response = self.client.get(url).send().await?;
        Self::decode(response, "Failed to fetch task status").await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
