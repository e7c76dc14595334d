//! End-to-end check: recognized text → parse → HTTP reference → history file.

mod time_server;

use chrono::Local;
use dvr_clock_check_lib::capture::{CaptureGate, CaptureSession};
use dvr_clock_check_lib::difference::{DifferenceMode, Direction};
use dvr_clock_check_lib::history::HistoryStore;
use dvr_clock_check_lib::ocr::TextPassthrough;
use dvr_clock_check_lib::pipeline::{CheckError, Checker};
use dvr_clock_check_lib::reference::{NaiveZone, ProviderInfo, ReferenceTimeResolver};
use dvr_clock_check_lib::share;
use dvr_clock_check_lib::timestamp::TimeParser;
use std::time::Duration;

fn checker_for(url: String) -> Checker {
    let catalogue = vec![ProviderInfo {
        id: "timeapi.io".to_string(),
        url,
        naive_zone: NaiveZone::ProviderLocal,
    }];
    Checker::new(
        TimeParser::default(),
        ReferenceTimeResolver::from_catalogue(&catalogue, Duration::from_millis(500)),
        Duration::from_secs(2),
    )
}

#[tokio::test]
async fn dated_capture_is_compared_and_persisted() {
    let server = time_server::serve(200, r#"{"dateTime":"2024-03-02T14:30:00.0000000"}"#).await;
    let checker = checker_for(format!("{}/api/Time/current/zone", server));

    let path = std::env::temp_dir()
        .join("dvr-clock-check-test-pipeline")
        .join("history.json");
    let _ = std::fs::remove_file(&path);
    let mut history = HistoryStore::open(&path);

    let gate = CaptureGate::new();
    let guard = gate.try_begin().unwrap();
    let session = CaptureSession::new(b"CAM1\n02-03-2024  14:31:30".to_vec());
    let entry = checker
        .check_capture(&TextPassthrough, session, &mut history)
        .await
        .unwrap();
    drop(guard);
    assert!(!gate.is_busy());

    assert_eq!(entry.difference.mode, DifferenceMode::FullDate);
    assert_eq!(entry.difference.offset_seconds, 90);
    assert_eq!(entry.difference.text, "+ 0d 0h 1m 30s");
    assert_eq!(entry.difference.direction, Direction::Ahead);
    assert_eq!(entry.ocr_text, "CAM1 02-03-2024 14:31:30");
    assert_eq!(share::verdict(&entry.difference), "DVR clock is AHEAD by 0d 0h 1m 30s");

    let reopened = HistoryStore::open(&path);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.latest(), Some(&entry));

    // Cleanup
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn unreachable_providers_still_produce_an_entry() {
    let checker = checker_for("http://127.0.0.1:9/now".to_string());
    let mut history = HistoryStore::in_memory();

    let entry = checker
        .check_text("12:00:00", Local::now(), &mut history)
        .await
        .unwrap();

    assert!(entry.reference.is_local_fallback());
    assert_eq!(entry.difference.mode, DifferenceMode::TimeOnly);
    assert_eq!(entry.difference.exact, entry.difference.offset_seconds == 0);
    assert!(share::share_text(&entry).contains("device clock, no time service reachable"));
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn unreadable_capture_leaves_history_untouched() {
    let checker = checker_for("http://127.0.0.1:9/now".to_string());
    let mut history = HistoryStore::in_memory();
    let session = CaptureSession::new(b"-- : --".to_vec());

    let err = checker
        .check_capture(&TextPassthrough, session, &mut history)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckError::Unrecognized(_)));
    assert_eq!(err.to_string(), "timestamp not recognized, retry capture");
    assert!(history.is_empty());
}
