//! Error types for automail
//!
//! This module groups failures by where they are detected:
//! - Validation errors are raised locally before any request is sent
//! - Transport errors come from reqwest (connection refused, timeouts, ...)
//! - Backend errors carry the `detail` field of a non-success response
//! - Task failures are terminal `failed` statuses reported by the backend
//!
//! Every variant can be rendered into the text shown to the user via
//! [`Error::user_message`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::TaskId;

/// Result type alias for automail operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for automail
#[derive(Debug, Error)]
pub enum Error {
    /// A local precondition was violated; no request was sent
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "backend.base_url")
        key: Option<String>,
    },

    /// Network error (connection failure, timeout, undecodable body)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("backend returned HTTP {status}: {detail}")]
    Backend {
        /// HTTP status code of the response
        status: u16,
        /// The backend's `detail` field, or a fallback message when absent
        detail: String,
    },

    /// Queued send was accepted but the response carried no task identifier
    #[error("backend did not return a task identifier")]
    MissingTaskId,

    /// The background send task reached the `failed` state
    #[error("task {task_id} failed: {message}")]
    TaskFailed {
        /// Identifier of the failed task
        task_id: TaskId,
        /// The task's own failure message
        message: String,
    },

    /// A submission is already outstanding for this composer
    #[error("a submission is already in progress")]
    SubmissionInProgress,

    /// Backend base URL could not be parsed or joined
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// I/O error (reading attachments, CSV files, config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Local precondition failures
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Sender email or password is empty
    #[error("Please provide sender credentials")]
    MissingCredentials,

    /// The recipient set is empty
    #[error("Please add at least one recipient")]
    NoRecipients,

    /// Subject is empty
    #[error("Please enter a subject")]
    EmptySubject,

    /// Body has no text and there is no attachment
    #[error("Email body cannot be empty")]
    EmptyBody,

    /// Manual recipient input was empty
    #[error("Please enter email addresses")]
    EmptyRecipientInput,

    /// Manual recipient input contained nothing that looks like an address
    #[error("No valid emails found")]
    NoEmailsFound,

    /// Selected file is not a CSV file
    #[error("Please upload a CSV file")]
    NotCsv,

    /// AI generation prompt was empty
    #[error("Please enter a prompt for the AI")]
    EmptyPrompt,
}

/// Error body returned by the backend on non-success responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendErrorBody {
    /// Human-readable failure description
    #[serde(default)]
    pub detail: Option<String>,
}

impl Error {
    /// Text to surface to the user for this error
    ///
    /// Validation errors yield their fixed message, backend errors their
    /// `detail` verbatim and task failures the task's own message.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(e) => e.to_string(),
            Error::Backend { detail, .. } => detail.clone(),
            Error::TaskFailed { message, .. } => message.clone(),
            Error::Network(e) => format!("Network error: {}", e),
            other => other.to_string(),
        }
    }

    /// Machine-readable error code, useful for logging and scripting
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::Config { .. } => "config_error",
            Error::Network(_) => "network_error",
            Error::Backend { .. } => "backend_error",
            Error::MissingTaskId => "missing_task_id",
            Error::TaskFailed { .. } => "task_failed",
            Error::SubmissionInProgress => "submission_in_progress",
            Error::InvalidUrl(_) => "invalid_url",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::Other(_) => "internal_error",
        }
    }

    /// Whether the error was detected locally before any request was made
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
