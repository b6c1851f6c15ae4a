// # rrsync-core
//
// Core library for mirroring DNS resource records into a smart sheet.
//
// ## Architecture Overview
//
// One run is a single linear pipeline:
// - **RecordSource**: Fetch every shared resource record from the DNS API
// - **normalize**: Keep enabled CNAME/A/AAAA records and merge them by name
// - **reconcile**: Diff against the sheet rows and apply inserts, updates, deletes
// - **AuditSink**: Store a report of the run (best effort)
// - **SyncEngine**: Orchestrates the steps above
//
// ## Design Principles
//
// 1. **Separation of Concerns**: API clients live in their own crates behind traits
// 2. **Full Reconciliation**: Every run re-reads both sides, nothing is cached
// 3. **Injected Logging**: Each run receives its own `RunLog`
// 4. **Typed Boundaries**: Provider JSON is converted into `model` types at the edge

pub mod config;
pub mod engine;
pub mod error;
pub mod harness;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod report;
pub mod traits;

// Re-export core types for convenience
pub use config::{AuditConfig, DnsSourceConfig, RunMode, SheetConfig, SyncConfig, SyncOptions};
pub use engine::SyncEngine;
pub use error::{Error, Result};
pub use model::{
    FetchedRecords, FieldNames, NewRow, NormalizedRecord, RawRecord, RowUpdate, RunReport,
    RunStatistics, SheetRow,
};
pub use reconcile::ReconciliationPlan;
pub use traits::{AuditSink, RecordSource, RunLog, SheetStore, TracingLog};
