//! Core types for automail

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::utils;

/// Opaque identifier of a backend send task
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Create a new TaskId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a backend send task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Accepted, not started yet
    #[serde(alias = "pending")]
    Queued,
    /// Sending
    #[serde(alias = "running")]
    InProgress,
    /// All messages sent
    Completed,
    /// Sending stopped with an error
    Failed,
    /// Any status string this client does not know; treated as non-terminal
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Whether polling should stop at this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// Read-only mirror of a backend task, refreshed on every poll
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Current status
    pub status: TaskStatus,
    /// Messages sent so far
    #[serde(default)]
    pub sent: u64,
    /// Messages to send in total
    #[serde(default)]
    pub total: u64,
    /// Human-readable progress or failure message
    #[serde(default)]
    pub message: String,
}

impl TaskSnapshot {
    /// Completion percentage, `0.0` when the total is unknown
    pub fn percent(&self) -> f64 {
        utils::percent(self.sent, self.total)
    }
}

/// How the backend should deliver the message
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendingMode {
    /// One message to all recipients, sent synchronously
    Batch,
    /// One message per recipient, sent by a background task
    #[default]
    Queue,
}

impl SendingMode {
    /// Wire token for the `sending_mode` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            SendingMode::Batch => "batch",
            SendingMode::Queue => "queue",
        }
    }

    /// Loading text shown while the send request is in flight
    pub fn loading_text(&self) -> &'static str {
        match self {
            SendingMode::Batch => "Sending batch email...",
            SendingMode::Queue => "Starting email queue...",
        }
    }
}

impl std::fmt::Display for SendingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SendingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" => Ok(SendingMode::Batch),
            "queue" | "queued" | "individual" => Ok(SendingMode::Queue),
            other => Err(format!(
                "unknown sending mode '{}' (expected 'batch' or 'queue')",
                other
            )),
        }
    }
}

/// A file attached to the outgoing email
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// File name presented to the backend
    pub file_name: String,
    /// MIME type
    pub content_type: String,
    /// Raw content
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Create an attachment, guessing the MIME type from the file name
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an attachment from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(utils::file_name_of(path), bytes))
    }
}

/// A file selected for CSV recipient import
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvUpload {
    /// Original file name
    pub file_name: String,
    /// Declared MIME type, if the host knows one
    pub content_type: Option<String>,
    /// Raw content
    pub bytes: Vec<u8>,
}

impl CsvUpload {
    /// Create an upload from in-memory content
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Read an upload from disk; the content type is left undeclared
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(utils::file_name_of(path), None, bytes))
    }

    /// Whether the declared type or the extension marks this as CSV
    pub fn is_csv(&self) -> bool {
        utils::is_csv_file(&self.file_name, self.content_type.as_deref())
    }
}

/// Subject and HTML body produced by the AI generation endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedEmail {
    /// Generated subject line
    pub subject: String,
    /// Generated body (HTML)
    pub body: String,
}

/// Derived state of the progress surface, recomputed from each snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressView {
    /// Task being tracked
    pub task_id: TaskId,
    /// Latest observed status
    pub status: TaskStatus,
    /// Completion percentage (0.0 to 100.0)
    pub percent: f64,
    /// Latest task message
    pub message: String,
    /// Messages sent so far
    pub sent: u64,
    /// Messages to send in total
    pub total: u64,
    /// Whether the dismiss control is shown (only once the task is terminal)
    pub dismissible: bool,
}

impl ProgressView {
    /// Initial view shown right after a task identifier is obtained
    pub fn starting(task_id: TaskId) -> Self {
        Self {
            task_id,
            status: TaskStatus::Queued,
            percent: 0.0,
            message: "Starting...".to_string(),
            sent: 0,
            total: 0,
            dismissible: false,
        }
    }

    /// Recompute the view from a task snapshot
    pub fn from_snapshot(task_id: TaskId, snapshot: &TaskSnapshot) -> Self {
        Self {
            task_id,
            status: snapshot.status,
            percent: snapshot.percent(),
            message: snapshot.message.clone(),
            sent: snapshot.sent,
            total: snapshot.total,
            dismissible: snapshot.status.is_terminal(),
        }
    }

    /// `sent/total` counter text
    pub fn counter(&self) -> String {
        format!("{}/{}", self.sent, self.total)
    }
}

/// Severity of a transient user-facing notice
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Neutral information
    Info,
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
}

/// Event emitted by the composer for the presentation layer to render
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The recipient set changed
    RecipientsChanged {
        /// Number of recipients
        count: usize,
        /// Recipients in insertion order
        recipients: Vec<String>,
    },

    /// Transient notice (toast)
    Notice {
        /// Severity
        level: NoticeLevel,
        /// Message text
        message: String,
    },

    /// A network call started or settled
    Loading {
        /// Whether the loading indicator is shown
        active: bool,
        /// Indicator text while active
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },

    /// A CSV file was imported and its name should be displayed
    CsvFileShown {
        /// Imported file name
        file_name: String,
    },

    /// The CSV file display was dismissed (recipients are kept)
    CsvFileCleared,

    /// AI generation filled in the draft
    ContentGenerated {
        /// Generated subject
        subject: String,
        /// Generated HTML body
        body: String,
    },

    /// An attachment was selected
    AttachmentSelected {
        /// Attachment file name
        file_name: String,
    },

    /// A queued send obtained its task identifier; progress surface shown
    ProgressStarted {
        /// Task identifier
        task_id: TaskId,
    },

    /// Progress surface update
    Progress(ProgressView),

    /// Send finished successfully
    SendCompleted {
        /// Task identifier (queued mode only)
        #[serde(skip_serializing_if = "Option::is_none")]
        task_id: Option<TaskId>,
        /// Completion message
        message: String,
    },

    /// Send failed (transport, backend or task failure)
    SendFailed {
        /// Task identifier, when the failure happened after dispatch
        #[serde(skip_serializing_if = "Option::is_none")]
        task_id: Option<TaskId>,
        /// Failure message
        message: String,
    },

    /// The progress surface was hidden
    ProgressDismissed,
}

impl Event {
    /// `"N recipients"` label for a recipient count
    pub fn recipient_label(count: usize) -> String {
        format!("{} recipients", count)
    }
}
