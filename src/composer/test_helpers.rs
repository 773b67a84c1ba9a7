//! Shared test helpers: a scripted in-memory backend and composer setup.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::{Backend, GenerateRequest, SendResponse};
use crate::compose::{ComposeForm, Submission};
use crate::composer::Composer;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Event, GeneratedEmail, TaskId, TaskSnapshot, TaskStatus};

/// A call the backend received
#[derive(Clone, Debug)]
pub(crate) enum Call {
    ParseCsv(String),
    Generate(GenerateRequest),
    Send(Submission),
    TaskStatus(TaskId),
}

/// Backend answering from per-endpoint queues of canned results
///
/// An exhausted queue answers with an error.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    csv: Mutex<VecDeque<Result<Vec<String>>>>,
    generate: Mutex<VecDeque<Result<GeneratedEmail>>>,
    send: Mutex<VecDeque<Result<SendResponse>>>,
    statuses: Mutex<VecDeque<Result<TaskSnapshot>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_csv(&self, result: Result<Vec<String>>) {
        self.csv.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_generate(&self, result: Result<GeneratedEmail>) {
        self.generate.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_send(&self, result: Result<SendResponse>) {
        self.send.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_status(&self, result: Result<TaskSnapshot>) {
        self.statuses.lock().unwrap().push_back(result);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn sent_submissions(&self) -> Vec<Submission> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send(submission) => Some(submission),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn status_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::TaskStatus(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T>>>, what: &str) -> Result<T> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Other(format!("no scripted {what} response"))))
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn parse_csv(&self, upload: &crate::types::CsvUpload) -> Result<Vec<String>> {
        self.record(Call::ParseCsv(upload.file_name.clone()));
        Self::next(&self.csv, "parse-csv")
    }

    async fn generate_email(&self, request: &GenerateRequest) -> Result<GeneratedEmail> {
        self.record(Call::Generate(request.clone()));
        Self::next(&self.generate, "generate-email")
    }

    async fn send_email(&self, submission: &Submission) -> Result<SendResponse> {
        self.record(Call::Send(submission.clone()));
        Self::next(&self.send, "send-email")
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<TaskSnapshot> {
        self.record(Call::TaskStatus(task_id.clone()));
        Self::next(&self.statuses, "task-status")
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Config with a fast poll interval so loops finish quickly
pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.polling.interval = Duration::from_millis(5);
    config
}

/// Composer over a fresh scripted backend
pub(crate) fn create_test_composer() -> (Composer, Arc<ScriptedBackend>) {
    let backend = ScriptedBackend::new();
    let composer = Composer::new(test_config(), backend.clone());
    (composer, backend)
}

/// A form that passes validation
pub(crate) fn valid_form(mode: crate::types::SendingMode) -> ComposeForm {
    ComposeForm {
        sender_email: "sender@example.com".into(),
        sender_password: "app-password".into(),
        subject: "Hello".into(),
        body_html: "<p>Hi there</p>".into(),
        mode,
        ..Default::default()
    }
}

pub(crate) fn snapshot(status: TaskStatus, sent: u64, total: u64, message: &str) -> TaskSnapshot {
    TaskSnapshot {
        status,
        sent,
        total,
        message: message.to_string(),
    }
}

/// A transient fetch failure
pub(crate) fn transport_error() -> Error {
    Error::Backend {
        status: 503,
        detail: "Service Unavailable".into(),
    }
}

/// Drain every event currently buffered on `rx`
pub(crate) fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Notice messages among `events`, in order
pub(crate) fn notices(events: &[Event]) -> Vec<(crate::types::NoticeLevel, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Notice { level, message } => Some((*level, message.clone())),
            _ => None,
        })
        .collect()
}
