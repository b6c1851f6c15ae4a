//! Entity types shared by every stage of the pipeline
//!
//! External API shapes are converted into these types at the crate
//! boundary; nothing past the fetchers sees provider JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One DNS resource record as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Fully-qualified name, normally with a trailing dot
    pub name: String,
    /// Record type as spelled by the provider (e.g. "A", "CNAME")
    #[serde(rename = "type")]
    pub record_type: String,
    /// Target value (address or canonical name)
    pub rdata: String,
    /// Enabled flag, "yes" when the record is live
    pub is_enable: String,
}

impl RawRecord {
    /// Create a raw record
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        rdata: impl Into<String>,
        is_enable: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            rdata: rdata.into(),
            is_enable: is_enable.into(),
        }
    }
}

/// Records fetched from a source plus the total the source reported
#[derive(Debug, Clone, Default)]
pub struct FetchedRecords {
    pub records: Vec<RawRecord>,
    pub total: usize,
}

/// One hostname after filtering and merging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    /// Hostname without the trailing dot
    pub name: String,
    /// Comma-joined rdata values in input order
    pub rdata: String,
}

impl NormalizedRecord {
    pub fn new(name: impl Into<String>, rdata: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rdata: rdata.into(),
        }
    }
}

/// An existing row of the target sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// Opaque row identifier assigned by the sheet service
    pub record_id: String,
    /// Plain text of the name field (empty if the cell is empty)
    pub name: String,
    /// Plain text of the rdata field
    pub rdata: String,
}

impl SheetRow {
    pub fn new(
        record_id: impl Into<String>,
        name: impl Into<String>,
        rdata: impl Into<String>,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            name: name.into(),
            rdata: rdata.into(),
        }
    }
}

/// A row to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRow {
    /// Client-chosen temporary identifier (the record name)
    pub temp_id: String,
    pub name: String,
    pub rdata: String,
}

/// A full overwrite of an existing row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowUpdate {
    pub record_id: String,
    pub name: String,
    pub rdata: String,
}

/// Display names of the two sheet fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    pub name: String,
    pub rdata: String,
}

/// Default title of the hostname field
pub const DEFAULT_NAME_FIELD: &str = "信息系统域名";

/// Default title of the resolution field
pub const DEFAULT_RDATA_FIELD: &str = "域名解析记录";

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME_FIELD.to_string(),
            rdata: DEFAULT_RDATA_FIELD.to_string(),
        }
    }
}

/// Counts accumulated while applying a reconciliation plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added {}, updated {}, deleted {}",
            self.added, self.updated, self.deleted
        )
    }
}

/// Document written to the audit collection once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub message: String,
}
