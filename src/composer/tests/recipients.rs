use super::*;

#[test]
fn manual_input_collapses_duplicates() {
    let (mut composer, _backend) = create_test_composer();

    let added = composer.on_add_manual("a@x.com, b@x.com, a@x.com").unwrap();

    assert_eq!(added, 2);
    assert_eq!(composer.recipients(), ["a@x.com", "b@x.com"]);
}

#[test]
fn manual_add_reports_net_new_count() {
    let (mut composer, _backend) = create_test_composer();
    let mut rx = composer.subscribe();

    composer.on_add_manual("a@x.com b@x.com").unwrap();
    let added = composer.on_add_manual("b@x.com, c@x.com").unwrap();

    assert_eq!(added, 1, "only c@x.com is new");
    assert_eq!(composer.recipients(), ["a@x.com", "b@x.com", "c@x.com"]);

    let events = drain(&mut rx);
    assert_eq!(
        notices(&events),
        vec![
            (NoticeLevel::Success, "Added 2 recipients".to_string()),
            (NoticeLevel::Success, "Added 1 recipients".to_string()),
        ]
    );
}

#[test]
fn manual_input_without_addresses_changes_nothing() {
    let (mut composer, _backend) = create_test_composer();
    composer.on_add_manual("keep@x.com").unwrap();
    let mut rx = composer.subscribe();

    let err = composer.on_add_manual("nobody here").unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::NoEmailsFound)
    ));
    assert_eq!(composer.recipients(), ["keep@x.com"]);

    let events = drain(&mut rx);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, Event::RecipientsChanged { .. })),
        "a rejected input must not re-render the recipient list"
    );
    assert_eq!(
        notices(&events),
        vec![(NoticeLevel::Error, "No valid emails found".to_string())]
    );
}

#[test]
fn remove_then_add_restores_recipient() {
    let (mut composer, _backend) = create_test_composer();
    composer.on_add_manual("a@x.com, b@x.com").unwrap();

    assert!(composer.on_remove_recipient("a@x.com"));
    assert_eq!(composer.recipients(), ["b@x.com"]);

    assert_eq!(composer.on_add_manual("a@x.com").unwrap(), 1);
    assert_eq!(composer.recipients(), ["b@x.com", "a@x.com"]);

    composer.on_clear_recipients();
    assert!(composer.recipients().is_empty());
}

#[tokio::test]
async fn csv_import_merges_and_shows_file() {
    let (mut composer, backend) = create_test_composer();
    composer.on_add_manual("a@x.com").unwrap();
    backend.push_csv(Ok(vec![
        "a@x.com".into(),
        "c@x.com".into(),
        "d@x.com".into(),
    ]));
    let mut rx = composer.subscribe();

    let added = composer
        .on_csv_selected(CsvUpload::new("contacts.csv", None, b"Email\n".to_vec()))
        .await
        .unwrap();

    assert_eq!(added, 2);
    assert_eq!(composer.recipients(), ["a@x.com", "c@x.com", "d@x.com"]);
    assert_eq!(composer.csv_file(), Some("contacts.csv"));

    let events = drain(&mut rx);
    assert_eq!(
        events.first(),
        Some(&Event::Loading {
            active: true,
            text: Some("Processing...".into())
        })
    );
    assert!(events.contains(&Event::CsvFileShown {
        file_name: "contacts.csv".into()
    }));
    assert!(
        notices(&events).contains(&(
            NoticeLevel::Success,
            "Imported 2 recipients from CSV".to_string()
        ))
    );
}

#[tokio::test]
async fn non_csv_file_is_rejected_without_network_call() {
    let (mut composer, backend) = create_test_composer();

    let err = composer
        .on_csv_selected(CsvUpload::new(
            "contacts.xlsx",
            Some("application/vnd.ms-excel".into()),
            vec![],
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(ValidationError::NotCsv)));
    assert!(backend.calls().is_empty());
    assert!(composer.csv_file().is_none());
}

#[tokio::test]
async fn csv_backend_failure_reports_generic_message() {
    let (mut composer, backend) = create_test_composer();
    backend.push_csv(Err(Error::Backend {
        status: 400,
        detail: "Failed to parse CSV: CSV must have an 'Email' column".into(),
    }));
    let mut rx = composer.subscribe();

    let result = composer
        .on_csv_selected(CsvUpload::new("bad.csv", Some("text/csv".into()), vec![]))
        .await;

    assert!(result.is_err());
    assert!(composer.recipients().is_empty());
    assert!(composer.csv_file().is_none());

    let events = drain(&mut rx);
    assert_eq!(
        notices(&events),
        vec![(NoticeLevel::Error, "Failed to parse CSV".to_string())]
    );
    assert_eq!(
        events.last(),
        Some(&Event::Notice {
            level: NoticeLevel::Error,
            message: "Failed to parse CSV".into()
        }),
        "loading indicator is cleared before the failure is reported"
    );
}

#[tokio::test]
async fn removing_csv_file_keeps_its_recipients() {
    let (mut composer, backend) = create_test_composer();
    backend.push_csv(Ok(vec!["a@x.com".into(), "b@x.com".into()]));
    composer
        .on_csv_selected(CsvUpload::new("list.csv", None, vec![]))
        .await
        .unwrap();
    let mut rx = composer.subscribe();

    composer.on_remove_csv_file();

    assert!(composer.csv_file().is_none());
    assert_eq!(composer.recipients(), ["a@x.com", "b@x.com"]);
    assert_eq!(drain(&mut rx), vec![Event::CsvFileCleared]);

    // nothing displayed, nothing to clear
    composer.on_remove_csv_file();
    assert!(drain(&mut rx).is_empty());
}
