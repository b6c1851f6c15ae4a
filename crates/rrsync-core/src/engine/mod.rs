//! Sync engine
//!
//! The SyncEngine runs the whole pipeline once:
//!
//! ```text
//! ┌──────────────┐   RawRecord   ┌────────────┐  NormalizedRecord  ┌────────────┐
//! │ RecordSource │──────────────▶│ normalize  │───────────────────▶│ reconcile  │──▶ SheetStore
//! └──────────────┘               └────────────┘                    └────────────┘
//!                                                                        │
//!                                                              RunStatistics
//!                                                                        ▼
//!                                                                ┌────────────┐
//!                                                                │ AuditSink  │ (best effort)
//!                                                                └────────────┘
//! ```
//!
//! Every step is awaited before the next starts. Nothing is retried and
//! nothing is kept between runs: each run re-fetches both sides.

use chrono::Utc;
use tracing::debug;

use crate::config::SyncOptions;
use crate::error::Result;
use crate::model::RunStatistics;
use crate::traits::{AuditSink, RecordSource, RunLog, SheetStore};
use crate::{normalize, reconcile, report};

/// Core sync engine
///
/// ## Lifecycle
///
/// 1. Create with [`SyncEngine::new()`]
/// 2. Optionally attach an audit sink with [`SyncEngine::with_audit()`]
/// 3. Call [`SyncEngine::run()`] once per trigger
pub struct SyncEngine {
    /// Where DNS records come from
    source: Box<dyn RecordSource>,

    /// The sheet being reconciled
    sheet: Box<dyn SheetStore>,

    /// Where run reports go (None = reporting off)
    audit: Option<Box<dyn AuditSink>>,

    /// Remove rows whose name has no DNS record
    delete_enabled: bool,
}

impl SyncEngine {
    /// Create a new engine without audit reporting
    pub fn new(
        source: Box<dyn RecordSource>,
        sheet: Box<dyn SheetStore>,
        options: &SyncOptions,
    ) -> Self {
        Self {
            source,
            sheet,
            audit: None,
            delete_enabled: options.delete_enabled,
        }
    }

    /// Attach an audit sink
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Run the pipeline once
    ///
    /// The run report is written after success and after failure alike;
    /// its own failure is only logged.
    ///
    /// # Returns
    ///
    /// - `Ok(RunStatistics)`: Counts applied to the sheet
    /// - `Err(Error)`: The first fetch or sheet failure
    pub async fn run(&self, log: &dyn RunLog) -> Result<RunStatistics> {
        let start_time = Utc::now();
        let outcome = self.sync(log).await;
        let end_time = Utc::now();

        match &outcome {
            Ok(stats) => log.info(&format!("Sync finished: {stats}")),
            Err(e) => log.error(&format!("Sync failed: {e}")),
        }

        if let Some(audit) = &self.audit {
            let report = report::build_report(start_time, end_time, &outcome);
            report::report_run(audit.as_ref(), &report, log).await;
        } else {
            debug!("No audit sink attached, skipping run report");
        }

        outcome
    }

    async fn sync(&self, log: &dyn RunLog) -> Result<RunStatistics> {
        let fetched = self.source.fetch_records().await?;
        log.info(&format!(
            "Fetched {} record(s) from {} (reported total: {})",
            fetched.records.len(),
            self.source.source_name(),
            fetched.total
        ));

        let records = normalize::normalize(&fetched.records, log);

        reconcile::reconcile(&records, self.sheet.as_ref(), self.delete_enabled, log).await
    }
}
