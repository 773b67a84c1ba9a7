//! Task status polling.
//!
//! Ticks are strictly sequential: the next status request is only issued
//! after the previous tick has been handled. A failed fetch is logged and
//! skipped; only a terminal task status ends the loop.

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{Composer, SendState};
use crate::error::{Error, Result};
use crate::types::{Event, NoticeLevel, ProgressView, TaskId, TaskSnapshot, TaskStatus};

const ALL_SENT: &str = "All emails sent successfully!";
const SEND_FAILED: &str = "Sending failed";

/// Outcome of one polling tick
#[derive(Clone, Debug, PartialEq)]
pub enum PollTick {
    /// Task still running; the view was updated
    Pending(ProgressView),
    /// Task completed; polling must stop
    Completed(TaskSnapshot),
    /// Task failed; polling must stop
    Failed(TaskSnapshot),
    /// Status fetch failed; state left untouched, poll again next tick
    Skipped,
}

impl PollTick {
    /// Whether polling should stop after this tick
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollTick::Completed(_) | PollTick::Failed(_))
    }
}

impl Composer {
    /// Fetch a task snapshot without touching session state
    pub async fn task_status(&self, task_id: &TaskId) -> Result<TaskSnapshot> {
        self.backend.task_status(task_id).await
    }

    /// Whether `task_id` is the queued send this session is polling
    fn is_tracking(&self, task_id: &TaskId) -> bool {
        matches!(&self.session.send_state, SendState::Polling { task_id: tracked } if tracked == task_id)
    }

    /// Run one polling tick for `task_id`
    ///
    /// Updates and publishes the progress view on every successful fetch.
    /// On a terminal status the send state machine is finished, the result
    /// announced and the dismiss control revealed.
    ///
    /// A task other than the one in [`SendState::Polling`] is only fetched
    /// and classified; session state and events are left alone.
    pub async fn on_poll_tick(&mut self, task_id: &TaskId) -> PollTick {
        let snapshot = match self.backend.task_status(task_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "task status fetch failed, will retry next tick");
                return PollTick::Skipped;
            }
        };

        let view = ProgressView::from_snapshot(task_id.clone(), &snapshot);
        if !self.is_tracking(task_id) {
            debug!(
                task_id = %task_id,
                status = ?snapshot.status,
                "status of an untracked task, session unchanged"
            );
            return match snapshot.status {
                TaskStatus::Completed => PollTick::Completed(snapshot),
                TaskStatus::Failed => PollTick::Failed(snapshot),
                TaskStatus::Queued | TaskStatus::InProgress | TaskStatus::Unknown => {
                    PollTick::Pending(view)
                }
            };
        }

        debug!(
            task_id = %task_id,
            status = ?snapshot.status,
            progress = %view.counter(),
            percent = view.percent,
            "task progress"
        );
        self.session.progress = Some(view.clone());
        self.emit(Event::Progress(view.clone()));

        match snapshot.status {
            TaskStatus::Completed => {
                let message = non_empty_or(&snapshot.message, ALL_SENT);
                info!(task_id = %task_id, sent = snapshot.sent, "send task completed");
                self.session.send_state = SendState::Done;
                self.notice(NoticeLevel::Success, message.clone());
                self.emit(Event::SendCompleted {
                    task_id: Some(task_id.clone()),
                    message,
                });
                PollTick::Completed(snapshot)
            }
            TaskStatus::Failed => {
                let message = non_empty_or(&snapshot.message, SEND_FAILED);
                warn!(task_id = %task_id, message = %message, "send task failed");
                self.session.send_state = SendState::Idle;
                self.notice(NoticeLevel::Error, message.clone());
                self.emit(Event::SendFailed {
                    task_id: Some(task_id.clone()),
                    message,
                });
                PollTick::Failed(snapshot)
            }
            TaskStatus::Queued | TaskStatus::InProgress | TaskStatus::Unknown => {
                PollTick::Pending(view)
            }
        }
    }

    /// Poll `task_id` at the configured interval until it ends
    ///
    /// The first request goes out one interval after the call. Returns the
    /// final snapshot on completion and [`Error::TaskFailed`] on failure.
    ///
    /// Dropping the future before the task ends leaves the composer in
    /// [`SendState::Polling`]; call [`on_stop_tracking`](Self::on_stop_tracking)
    /// to accept new submissions again.
    pub async fn track(&mut self, task_id: TaskId) -> Result<TaskSnapshot> {
        let period = self.config.polling.interval;
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(task_id = %task_id, interval_ms = period.as_millis() as u64, "tracking send task");
        loop {
            interval.tick().await;
            match self.on_poll_tick(&task_id).await {
                PollTick::Completed(snapshot) => return Ok(snapshot),
                PollTick::Failed(snapshot) => {
                    return Err(Error::TaskFailed {
                        task_id,
                        message: non_empty_or(&snapshot.message, SEND_FAILED),
                    });
                }
                PollTick::Pending(_) | PollTick::Skipped => {}
            }
        }
    }

    /// Stop following the queued send without waiting for it to end
    ///
    /// The backend keeps sending; no cancellation request exists. The send
    /// state returns to idle and the last progress view stays displayed.
    /// Returns the task that was being tracked, if any.
    pub fn on_stop_tracking(&mut self) -> Option<TaskId> {
        let SendState::Polling { task_id } = &self.session.send_state else {
            return None;
        };
        let task_id = task_id.clone();
        self.session.send_state = SendState::Idle;
        info!(task_id = %task_id, "stopped tracking send task");
        Some(task_id)
    }

    /// Hide the progress surface
    ///
    /// Only possible once the tracked task is terminal; no backend work is
    /// cancelled. Returns whether the surface was hidden.
    pub fn on_dismiss_progress(&mut self) -> bool {
        match &self.session.progress {
            Some(view) if view.dismissible => {
                self.session.progress = None;
                self.emit(Event::ProgressDismissed);
                true
            }
            _ => false,
        }
    }
}

fn non_empty_or(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}
