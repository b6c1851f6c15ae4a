// # HTTP Audit Sink
//
// This crate stores run reports as documents in a collection of an HTTP
// document database.
//
// ## Purpose
//
// Reporting is telemetry. The engine logs a failed write and carries on,
// so this sink only has to surface errors, never recover from them.
//
// ## API Reference
//
// - Create document: POST `/collections/{collection}/documents`
//
// ```json
// { "start_time": "2026-01-01T00:00:00Z", "end_time": "2026-01-01T00:00:04Z",
//   "message": "sync succeeded: added 1, updated 40, deleted 0" }
// ```

use async_trait::async_trait;
use rrsync_core::config::AuditConfig;
use rrsync_core::traits::AuditSink;
use rrsync_core::{Error, Result, RunReport};
use serde::Serialize;
use std::time::Duration;

/// Service name used in errors and logs
const SERVICE: &str = "audit";

/// Document as stored in the collection
#[derive(Debug, Serialize)]
struct AuditDocument<'a> {
    start_time: String,
    end_time: String,
    message: &'a str,
}

impl<'a> From<&'a RunReport> for AuditDocument<'a> {
    fn from(report: &'a RunReport) -> Self {
        Self {
            start_time: report.start_time.to_rfc3339(),
            end_time: report.end_time.to_rfc3339(),
            message: &report.message,
        }
    }
}

/// HTTP document-collection audit sink
pub struct HttpAuditSink {
    /// Endpoint without trailing slash
    endpoint: String,

    /// ⚠️ NEVER log this value
    api_key: String,

    collection: String,

    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for HttpAuditSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuditSink")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<REDACTED>")
            .field("collection", &self.collection)
            .finish()
    }
}

impl HttpAuditSink {
    /// Create a new audit sink
    pub fn new(config: &AuditConfig, timeout: Duration) -> Result<Self> {
        if config.collection.is_empty() {
            return Err(Error::config("Audit collection name cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
            client,
        })
    }

    fn documents_url(&self) -> String {
        format!("{}/collections/{}/documents", self.endpoint, self.collection)
    }
}

#[async_trait]
impl AuditSink for HttpAuditSink {
    async fn record_run(&self, report: &RunReport) -> Result<()> {
        let url = self.documents_url();
        tracing::debug!("Writing run report to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&AuditDocument::from(report))
            .send()
            .await
            .map_err(|e| Error::audit(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::from_status(SERVICE, status.as_u16(), "insert document", &body));
        }

        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        SERVICE
    }
}
