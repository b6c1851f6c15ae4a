//! Core traits for the sync pipeline
//!
//! This module defines the abstract interfaces that all integrations must follow.
//!
//! - [`RecordSource`]: Fetch DNS resource records
//! - [`SheetStore`]: Read and mutate the target sheet
//! - [`AuditSink`]: Persist run reports
//! - [`RunLog`]: Logging callbacks handed in by the invoking harness

pub mod audit_sink;
pub mod record_source;
pub mod run_log;
pub mod sheet_store;

pub use audit_sink::AuditSink;
pub use record_source::RecordSource;
pub use run_log::{RunLog, TracingLog};
pub use sheet_store::SheetStore;
