//! End-to-end flows through `Composer::with_http` against a mock backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use automail::{
    ComposeForm, Composer, Config, CsvUpload, Error, Event, SendOutcome, SendState, SendingMode,
    TaskStatus,
};
use serde_json::json;
use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.backend.base_url = format!("{}/api", server.uri());
    config.polling.interval = Duration::from_millis(10);
    config
}

fn form(mode: SendingMode) -> ComposeForm {
    ComposeForm {
        sender_email: "me@example.com".into(),
        sender_password: "app-password".into(),
        subject: "Monthly newsletter".into(),
        body_html: "<h1>News</h1><p>Lots happened.</p>".into(),
        mode,
        ..Default::default()
    }
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn csv_import_then_queued_send_tracks_to_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/parse-csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"recipients": ["b@x.com", "c@x.com", "d@x.com"]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/send-email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Email sending started",
            "task_id": "task-42"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/task-status/task-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "in_progress", "sent": 2, "total": 4, "message": "Sent to b@x.com"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/task-status/task-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed", "sent": 4, "total": 4, "message": "All emails sent successfully!"
        })))
        .mount(&server)
        .await;

    let mut composer = Composer::with_http(config_for(&server)).unwrap();
    let mut rx = composer.subscribe();

    composer.on_add_manual("a@x.com; b@x.com").unwrap();
    let imported = composer
        .on_csv_selected(CsvUpload::new(
            "contacts.csv",
            Some("text/csv".into()),
            b"email\nb@x.com\nc@x.com\nd@x.com\n".to_vec(),
        ))
        .await
        .unwrap();
    assert_eq!(imported, 2, "b@x.com was already present");
    assert_eq!(
        composer.recipients(),
        ["a@x.com", "b@x.com", "c@x.com", "d@x.com"]
    );
    assert_eq!(composer.csv_file(), Some("contacts.csv"));

    let outcome = composer.on_submit(form(SendingMode::Queue)).await.unwrap();

    match outcome {
        SendOutcome::Completed { task_id, snapshot } => {
            assert_eq!(task_id.as_str(), "task-42");
            assert_eq!(snapshot.status, TaskStatus::Completed);
            assert_eq!(snapshot.sent, 4);
        }
        other => panic!("expected completed task, got {other:?}"),
    }
    assert_eq!(composer.send_state(), &SendState::Done);

    let percents: Vec<f64> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            Event::Progress(view) => Some(view.percent),
            _ => None,
        })
        .collect();
    assert_eq!(percents, vec![0.0, 50.0, 100.0]);
}

#[tokio::test]
async fn batch_send_finishes_in_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send-email"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Batch email sent successfully!"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut composer = Composer::with_http(config_for(&server)).unwrap();
    composer.on_add_manual("a@x.com b@x.com").unwrap();

    let outcome = composer.on_submit(form(SendingMode::Batch)).await.unwrap();

    assert_eq!(
        outcome,
        SendOutcome::Delivered {
            message: "Batch email sent successfully!".into()
        }
    );
    let requests = server.received_requests().await.unwrap();
    assert!(
        requests
            .iter()
            .all(|r| !r.url.path().contains("task-status")),
        "batch mode never polls"
    );
}

#[tokio::test]
async fn backend_rejection_is_reported_with_its_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/send-email"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "SMTP authentication failed"})),
        )
        .mount(&server)
        .await;

    let mut composer = Composer::with_http(config_for(&server)).unwrap();
    composer.on_add_manual("a@x.com").unwrap();
    let mut rx = composer.subscribe();

    let err = composer
        .on_submit(form(SendingMode::Queue))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "SMTP authentication failed");
    assert_eq!(composer.send_state(), &SendState::Idle);
    assert!(drain(&mut rx).contains(&Event::SendFailed {
        task_id: None,
        message: "SMTP authentication failed".into()
    }));
}

#[tokio::test]
async fn validation_failure_makes_no_request() {
    let server = MockServer::start().await;

    let mut composer = Composer::with_http(config_for(&server)).unwrap();
    let err = composer
        .on_submit(form(SendingMode::Batch))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.user_message(), "Please add at least one recipient");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_config_is_rejected_before_any_request() {
    let mut config = Config::default();
    config.polling.interval = Duration::ZERO;

    match Composer::with_http(config) {
        Err(Error::Config { key, .. }) => assert_eq!(key.as_deref(), Some("polling.interval")),
        Err(other) => panic!("expected config error, got {other:?}"),
        Ok(_) => panic!("zero poll interval must be rejected"),
    }
}
