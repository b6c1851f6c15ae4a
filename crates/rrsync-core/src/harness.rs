//! Invocation harness glue
//!
//! A scheduler starts a run with a parameterless request, a response
//! object and two logging callbacks. [`handle`] runs the engine with those
//! callbacks and answers with an empty success when the run completes.
//! A failed run leaves the response untouched and returns the error so the
//! harness can surface it.

use crate::engine::SyncEngine;
use crate::error::Result;
use crate::model::RunStatistics;
use crate::traits::RunLog;

/// Response side of an invocation
pub trait Response {
    /// Finish the invocation with an empty success payload
    fn empty(self);
}

/// Run one sync for a trigger
pub async fn handle<R: Response>(
    engine: &SyncEngine,
    response: R,
    log: &dyn RunLog,
) -> Result<RunStatistics> {
    let stats = engine.run(log).await?;
    response.empty();
    Ok(stats)
}
