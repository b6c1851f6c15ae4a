// # Audit Sink Trait
//
// Defines where run reports are written. Reporting is best-effort
// telemetry: the engine logs a failed write and keeps the run outcome.

use async_trait::async_trait;

use crate::model::RunReport;

/// Trait for audit collections
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Store one run report as a document
    async fn record_run(&self, report: &RunReport) -> Result<(), crate::Error>;

    /// Get the sink name (for logging/debugging)
    fn sink_name(&self) -> &'static str;
}
