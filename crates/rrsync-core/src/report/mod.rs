//! Run reporter
//!
//! Writes one `{start_time, end_time, message}` document per run. A failed
//! write is logged and swallowed; it never changes the run outcome.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{RunReport, RunStatistics};
use crate::traits::{AuditSink, RunLog};

/// Build the report for a finished run
pub fn build_report(
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    outcome: &Result<RunStatistics>,
) -> RunReport {
    let message = match outcome {
        Ok(stats) => format!("sync succeeded: {stats}"),
        Err(e) => format!("sync failed: {e}"),
    };

    RunReport {
        start_time,
        end_time,
        message,
    }
}

/// Hand the report to the sink
///
/// # Returns
///
/// `true` if the sink accepted the document
pub async fn report_run(sink: &dyn AuditSink, report: &RunReport, log: &dyn RunLog) -> bool {
    match sink.record_run(report).await {
        Ok(()) => {
            tracing::debug!("Run report stored in {}", sink.sink_name());
            true
        }
        Err(e) => {
            log.error(&format!(
                "Failed to write run report to {}: {}",
                sink.sink_name(),
                e
            ));
            false
        }
    }
}
