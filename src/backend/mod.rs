//! Backend service seam.
//!
//! The composer talks to the mail backend only through the [`Backend`]
//! trait. [`HttpBackend`] implements it over HTTP; tests substitute
//! scripted implementations.
//!
//! Endpoint contract (paths relative to the configured base URL):
//! - `POST parse-csv` - multipart `file` -> `{ recipients: [string] }`
//! - `POST generate-email` - multipart `prompt` (+ optional `resume`) -> `{ subject, body }`
//! - `POST send-email` - multipart submission -> `{ message }` or `{ task_id }`
//! - `GET task-status/{id}` -> `{ status, sent, total, message }`
//!
//! Non-success responses carry `{ detail: string }`.

mod http;


pub use http::HttpBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::compose::Submission;
use crate::error::Result;
use crate::types::{Attachment, CsvUpload, GeneratedEmail, TaskId, TaskSnapshot};

/// Request for AI-generated email content
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Natural-language description of the email to write
    pub prompt: String,
    /// Optional document (resume, notes) used to personalize the result
    pub context: Option<Attachment>,
}

/// Response to a send request
///
/// Batch sends answer with `message`; queued sends with `task_id` (and
/// usually a `message` as well).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    /// Human-readable result
    #[serde(default)]
    pub message: Option<String>,
    /// Identifier of the background task, for queued sends
    #[serde(default)]
    pub task_id: Option<TaskId>,
}

/// Operations the composer needs from the mail backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Parse a CSV file into a recipient list
    async fn parse_csv(&self, upload: &CsvUpload) -> Result<Vec<String>>;

    /// Generate a subject and HTML body from a prompt
    async fn generate_email(&self, request: &GenerateRequest) -> Result<GeneratedEmail>;

    /// Dispatch a submission
    async fn send_email(&self, submission: &Submission) -> Result<SendResponse>;

    /// Fetch the current state of a background send task
    async fn task_status(&self, task_id: &TaskId) -> Result<TaskSnapshot>;

    /// Short name for logging
    fn name(&self) -> &'static str;
}
