//! Contract Test: Audit Document Writes
//!
//! Constraints verified:
//! - One POST per report, authenticated, with the three report fields
//! - Rejections surface as errors for the engine to log

use chrono::{TimeZone, Utc};
use rrsync_audit_http::HttpAuditSink;
use rrsync_core::config::AuditConfig;
use rrsync_core::{AuditSink, RunReport};
use rrsync_test_http::serve;
use serde_json::{Value, json};
use std::time::Duration;

fn sink(base_url: &str) -> HttpAuditSink {
    HttpAuditSink::new(
        &AuditConfig {
            endpoint: base_url.to_string(),
            api_key: "key-1".to_string(),
            collection: "runs".to_string(),
            enabled: true,
        },
        Duration::from_secs(5),
    )
    .expect("sink builds")
}

fn report() -> RunReport {
    RunReport {
        start_time: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 4).unwrap(),
        message: "sync succeeded: added 1, updated 1, deleted 1".to_string(),
    }
}

#[tokio::test]
async fn posts_one_document() {
    let server = serve(vec![(201, r#"{"id": "doc-1"}"#.to_string())]).await;

    sink(&server.base_url)
        .record_run(&report())
        .await
        .expect("write succeeds");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/collections/runs/documents");
    assert_eq!(requests[0].header("authorization"), Some("Bearer key-1"));

    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "start_time": "2026-01-01T00:00:00+00:00",
            "end_time": "2026-01-01T00:00:04+00:00",
            "message": "sync succeeded: added 1, updated 1, deleted 1"
        })
    );
}

#[tokio::test]
async fn rejection_is_an_error() {
    let server = serve(vec![(403, "forbidden".to_string())]).await;

    let result = sink(&server.base_url).record_run(&report()).await;

    assert!(result.is_err());
}
