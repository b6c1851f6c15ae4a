// # Run Log Trait
//
// The invoking harness supplies two logging callbacks (info and error).
// They are passed explicitly to every pipeline stage instead of being
// installed as process-wide state, so two runs sharing a process never
// write into each other's log.

/// Logging callbacks for one run
pub trait RunLog: Send + Sync {
    /// Operational narration (counts filtered, merged, applied)
    fn info(&self, message: &str);

    /// Failures
    fn error(&self, message: &str);
}

/// [`RunLog`] that forwards to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl RunLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}
