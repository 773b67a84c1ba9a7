//! # automail
//!
//! Client-side orchestrator for a bulk email composer backend.
//!
//! automail owns everything that happens on the client between "the user
//! typed some addresses" and "the backend finished sending":
//! - **Recipients** - manual entry and CSV import, deduplicated in insertion order
//! - **Composition** - validated, immutable submissions with optional attachment
//! - **Dispatch** - batch sends that finish in one request, or queued sends
//! - **Progress** - polling a queued send's task until it completes or fails
//!
//! The backend does the actual SMTP work; it is reached through the
//! [`Backend`] trait ([`HttpBackend`] in production). The [`Composer`] is
//! UI-agnostic: a presentation layer calls its handlers and renders the
//! [`Event`]s it publishes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use automail::{ComposeForm, Composer, Config, SendingMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut composer = Composer::with_http(Config::default())?;
//!
//!     // Subscribe to events
//!     let mut events = composer.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     composer.on_add_manual("alice@example.com, bob@example.com")?;
//!     let outcome = composer
//!         .on_submit(ComposeForm {
//!             sender_email: "me@example.com".to_string(),
//!             sender_password: "app-password".to_string(),
//!             subject: "Hello".to_string(),
//!             body_html: "<p>Hi there</p>".to_string(),
//!             mode: SendingMode::Queue,
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("{:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Backend service seam and HTTP implementation
pub mod backend;
/// Compose form validation and submissions
pub mod compose;
/// Compose orchestrator (decomposed into focused submodules)
pub mod composer;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Deduplicated recipient set
pub mod recipients;
/// Recipient source adapters
pub mod sources;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use backend::{Backend, GenerateRequest, HttpBackend, SendResponse};
pub use compose::{ComposeForm, Submission};
pub use composer::{Composer, Dispatch, Draft, PollTick, SendOutcome, SendState};
pub use config::{BackendConfig, Config, PollingConfig, SenderConfig};
pub use error::{Error, Result, ValidationError};
pub use recipients::RecipientSet;
pub use types::{
    Attachment, CsvUpload, Event, GeneratedEmail, NoticeLevel, ProgressView, SendingMode, TaskId,
    TaskSnapshot, TaskStatus,
};
