//! UI-agnostic compose orchestrator.
//!
//! The [`Composer`] owns the session state of one compose screen and exposes
//! command handlers a presentation layer calls; results are published as
//! [`Event`]s. Handlers are organized by concern:
//! - [`recipients`] - manual entry, CSV import, removal
//! - [`generate`] - AI content generation and attachment selection
//! - [`send`] - validation, dispatch and the send state machine
//! - [`poller`] - task status polling until a terminal state

mod generate;
mod poller;
mod recipients;
mod send;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use poller::PollTick;
pub use send::{Dispatch, SendOutcome, SendState};

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::backend::{Backend, HttpBackend};
use crate::config::Config;
use crate::error::Result;
use crate::recipients::RecipientSet;
use crate::types::{Attachment, Event, NoticeLevel, ProgressView};

/// Draft content filled in by AI generation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    /// Subject line
    pub subject: String,
    /// HTML body
    pub body_html: String,
}

/// Session-scoped state, mutated only through [`Composer`] handlers
#[derive(Debug, Default)]
pub(crate) struct Session {
    /// Deduplicated recipients
    pub(crate) recipients: RecipientSet,
    /// Name of the last imported CSV file, while it is displayed
    pub(crate) csv_file: Option<String>,
    /// Selected attachment
    pub(crate) attachment: Option<Attachment>,
    /// Latest generated content
    pub(crate) draft: Draft,
    /// Send state machine
    pub(crate) send_state: SendState,
    /// Latest progress view, while the progress surface is shown
    pub(crate) progress: Option<ProgressView>,
}

/// Compose orchestrator for one session
pub struct Composer {
    /// Configuration (shared with the presentation layer if needed)
    pub(crate) config: Arc<Config>,
    /// Backend service
    pub(crate) backend: Arc<dyn Backend>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Session state
    pub(crate) session: Session,
}

impl Composer {
    /// Create a composer over an arbitrary backend
    pub fn new(config: Config, backend: Arc<dyn Backend>) -> Self {
        let (event_tx, _rx) = broadcast::channel(config.event_buffer.max(1));
        let session = Session {
            recipients: RecipientSet::new(event_tx.clone()),
            ..Default::default()
        };

        tracing::debug!(backend = backend.name(), "composer created");
        Self {
            config: Arc::new(config),
            backend,
            event_tx,
            session,
        }
    }

    /// Create a composer talking to the configured HTTP backend
    pub fn with_http(config: Config) -> Result<Self> {
        config.validate()?;
        let backend = HttpBackend::new(config.backend.clone())?;
        Ok(Self::new(config, Arc::new(backend)))
    }

    /// Subscribe to composer events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current recipients in insertion order
    pub fn recipients(&self) -> &[String] {
        self.session.recipients.all()
    }

    /// Name of the displayed CSV file, if any
    pub fn csv_file(&self) -> Option<&str> {
        self.session.csv_file.as_deref()
    }

    /// Selected attachment, if any
    pub fn attachment(&self) -> Option<&Attachment> {
        self.session.attachment.as_ref()
    }

    /// Latest generated draft
    pub fn draft(&self) -> &Draft {
        &self.session.draft
    }

    /// Current send state
    pub fn send_state(&self) -> &SendState {
        &self.session.send_state
    }

    /// Latest progress view, while the progress surface is shown
    pub fn progress(&self) -> Option<&ProgressView> {
        self.session.progress.as_ref()
    }

    pub(crate) fn emit(&self, event: Event) {
        // No subscribers is fine
        self.event_tx.send(event).ok();
    }

    pub(crate) fn notice(&self, level: NoticeLevel, message: impl Into<String>) {
        self.emit(Event::Notice {
            level,
            message: message.into(),
        });
    }

    pub(crate) fn loading(&self, active: bool, text: Option<&str>) {
        self.emit(Event::Loading {
            active,
            text: text.map(str::to_string),
        });
    }
}
