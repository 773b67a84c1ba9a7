//! Submission dispatch and the send state machine.
//!
//! ```text
//! Idle -> Submitting -> Done               (batch)
//!                    -> Polling -> Done    (queued, task completed)
//!                               -> Idle    (queued, task failed)
//! any failure before a terminal state      -> Idle
//! ```

use tracing::{info, warn};

use super::Composer;
use crate::compose::{ComposeForm, Submission};
use crate::error::{Error, Result};
use crate::types::{Event, NoticeLevel, ProgressView, SendingMode, TaskId, TaskSnapshot};

/// Where the current send stands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SendState {
    /// Nothing outstanding
    #[default]
    Idle,
    /// Send request in flight
    Submitting,
    /// Queued send accepted; tracking its task
    Polling {
        /// Task being tracked
        task_id: TaskId,
    },
    /// Last send completed
    Done,
}

impl SendState {
    /// Whether a new submission may start
    pub fn accepts_submission(&self) -> bool {
        matches!(self, SendState::Idle | SendState::Done)
    }
}

/// Result of dispatching a submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Batch send finished synchronously
    Delivered {
        /// Backend completion message
        message: String,
    },
    /// Queued send accepted; progress must be tracked
    Queued {
        /// Task to poll
        task_id: TaskId,
    },
}

/// Final result of a send, after polling when queued
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Batch send finished
    Delivered {
        /// Backend completion message
        message: String,
    },
    /// Queued send's task completed
    Completed {
        /// Task that completed
        task_id: TaskId,
        /// Final task snapshot
        snapshot: TaskSnapshot,
    },
}

const BATCH_SENT: &str = "Batch email sent successfully!";

impl Composer {
    /// Fill gaps in `form` from session and configuration defaults
    ///
    /// Sender credentials fall back to the configured sender; the
    /// attachment falls back to the one selected in this session.
    fn prefill(&self, form: ComposeForm) -> ComposeForm {
        let mut form = form;
        if form.sender_email.trim().is_empty()
            && let Some(email) = &self.config.sender.email
        {
            form.sender_email = email.clone();
        }
        if form.sender_password.is_empty()
            && let Some(password) = &self.config.sender.password
        {
            form.sender_password = password.clone();
        }
        if form.attachment.is_none() {
            form.attachment = self.session.attachment.clone();
        }
        form
    }

    /// Validate `form` and dispatch it, without polling
    ///
    /// Batch sends finish here. Queued sends return the task identifier and
    /// leave the composer in [`SendState::Polling`]; drive it with
    /// [`track`](Self::track) or [`on_poll_tick`](Self::on_poll_tick).
    pub async fn submit(&mut self, form: ComposeForm) -> Result<Dispatch> {
        if !self.session.send_state.accepts_submission() {
            let e = Error::SubmissionInProgress;
            self.notice(NoticeLevel::Error, e.user_message());
            return Err(e);
        }

        let form = self.prefill(form);
        let submission = match Submission::build(&form, self.session.recipients.all()) {
            Ok(submission) => submission,
            Err(e) => {
                self.notice(NoticeLevel::Error, e.to_string());
                return Err(e.into());
            }
        };

        let mode = submission.mode();
        self.session.send_state = SendState::Submitting;
        info!(
            recipients = submission.recipients().len(),
            mode = %mode,
            "submitting email"
        );

        self.loading(true, Some(mode.loading_text()));
        let result = self.backend.send_email(&submission).await;
        self.loading(false, None);

        let response = match result {
            Ok(response) => response,
            Err(e) => return Err(self.fail_dispatch(e)),
        };

        match mode {
            SendingMode::Batch => {
                let message = response.message.unwrap_or_else(|| BATCH_SENT.to_string());
                self.session.send_state = SendState::Done;
                info!(message = %message, "batch send finished");
                self.notice(NoticeLevel::Success, message.clone());
                self.emit(Event::SendCompleted {
                    task_id: None,
                    message: message.clone(),
                });
                Ok(Dispatch::Delivered { message })
            }
            SendingMode::Queue => {
                let Some(task_id) = response.task_id.filter(|id| !id.as_str().is_empty()) else {
                    return Err(self.fail_dispatch(Error::MissingTaskId));
                };

                info!(task_id = %task_id, "queued send accepted");
                self.session.send_state = SendState::Polling {
                    task_id: task_id.clone(),
                };
                let view = ProgressView::starting(task_id.clone());
                self.session.progress = Some(view.clone());
                self.emit(Event::ProgressStarted {
                    task_id: task_id.clone(),
                });
                self.emit(Event::Progress(view));
                if let Some(message) = response.message {
                    self.notice(NoticeLevel::Info, message);
                }
                Ok(Dispatch::Queued { task_id })
            }
        }
    }

    /// Validate, dispatch and, in queued mode, poll until the task ends
    pub async fn on_submit(&mut self, form: ComposeForm) -> Result<SendOutcome> {
        match self.submit(form).await? {
            Dispatch::Delivered { message } => Ok(SendOutcome::Delivered { message }),
            Dispatch::Queued { task_id } => {
                let snapshot = self.track(task_id.clone()).await?;
                Ok(SendOutcome::Completed { task_id, snapshot })
            }
        }
    }

    /// Report a dispatch failure and return to idle
    fn fail_dispatch(&mut self, e: Error) -> Error {
        warn!(error = %e, "send failed");
        self.session.send_state = SendState::Idle;
        let message = e.user_message();
        self.notice(NoticeLevel::Error, message.clone());
        self.emit(Event::SendFailed {
            task_id: None,
            message,
        });
        e
    }
}
