//! Contract Test: Run Reporting
//!
//! Constraints verified:
//! - One report per run, after success and after failure
//! - A failing audit sink never changes the run outcome

mod common;

use common::*;
use rrsync_core::SyncEngine;

#[tokio::test]
async fn successful_run_is_reported_once() {
    let audit = MockAuditSink::new();
    let engine = SyncEngine::new(
        Box::new(MockRecordSource::new(vec![enabled("a.com.", "A", "1.1.1.1")])),
        Box::new(MockSheetStore::with_names(&["a.com", "c.com"])),
        &options(true),
    )
    .with_audit(Box::new(audit.clone()));

    engine.run(&CapturingLog::default()).await.expect("run succeeds");

    let reports = audit.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(
        reports[0].message,
        "sync succeeded: added 0, updated 1, deleted 1"
    );
    assert!(reports[0].start_time <= reports[0].end_time);
}

#[tokio::test]
async fn failed_run_is_reported_with_error() {
    let audit = MockAuditSink::new();
    let engine = SyncEngine::new(
        Box::new(MockRecordSource::failing()),
        Box::new(MockSheetStore::new(Vec::new())),
        &options(true),
    )
    .with_audit(Box::new(audit.clone()));

    assert!(engine.run(&CapturingLog::default()).await.is_err());

    let reports = audit.reports();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].message.starts_with("sync failed: Authentication failed"));
}

#[tokio::test]
async fn audit_failure_does_not_fail_the_run() {
    let audit = MockAuditSink::failing();
    let log = CapturingLog::default();
    let engine = SyncEngine::new(
        Box::new(MockRecordSource::new(vec![enabled("a.com.", "A", "1.1.1.1")])),
        Box::new(MockSheetStore::new(Vec::new())),
        &options(true),
    )
    .with_audit(Box::new(audit.clone()));

    let stats = engine.run(&log).await.expect("run still succeeds");

    assert_eq!(stats.added, 1);
    assert_eq!(audit.reports().len(), 1);
    let errors = log.error_lines();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("mock-audit"));
}
