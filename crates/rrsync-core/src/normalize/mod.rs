//! Record normalizer
//!
//! Turns the raw provider listing into one entry per hostname:
//!
//! 1. Keep records whose enabled flag is exactly `"yes"`
//! 2. Keep records whose type is exactly `CNAME`, `A` or `AAAA`
//! 3. Strip one trailing dot from each name
//! 4. Drop records whose name is now empty (a bare `.`)
//! 5. Merge same-named records, joining rdata with `,` in input order
//!
//! Output order is the order in which each name first survives filtering.
//! Record types are not carried past filtering.

use std::collections::HashMap;

use crate::model::{NormalizedRecord, RawRecord};
use crate::traits::RunLog;

/// Value of `is_enable` for a live record (case-sensitive)
pub const ENABLED_FLAG: &str = "yes";

/// Record types mirrored into the sheet (exact match, no case folding)
pub const SYNCED_TYPES: [&str; 3] = ["CNAME", "A", "AAAA"];

/// Filter, strip and merge raw records
pub fn normalize(records: &[RawRecord], log: &dyn RunLog) -> Vec<NormalizedRecord> {
    let enabled: Vec<&RawRecord> = records
        .iter()
        .filter(|r| r.is_enable == ENABLED_FLAG)
        .collect();
    log.info(&format!(
        "Dropped {} disabled record(s), {} remaining",
        records.len() - enabled.len(),
        enabled.len()
    ));

    let typed: Vec<&RawRecord> = enabled
        .iter()
        .copied()
        .filter(|r| SYNCED_TYPES.iter().any(|t| *t == r.record_type))
        .collect();
    log.info(&format!(
        "Dropped {} record(s) of other types, {} remaining",
        enabled.len() - typed.len(),
        typed.len()
    ));

    let named: Vec<(&str, &str)> = typed
        .iter()
        .map(|r| (strip_trailing_dot(&r.name), r.rdata.as_str()))
        .filter(|(name, _)| !name.is_empty())
        .collect();
    // Empty names never match a sheet row
    if named.len() < typed.len() {
        log.info(&format!(
            "Dropped {} record(s) with an empty name, {} remaining",
            typed.len() - named.len(),
            named.len()
        ));
    }

    let merged = merge(named.into_iter());
    log.info(&format!("Merged into {} unique name(s)", merged.len()));

    merged
}

/// Remove exactly one trailing `.`; names without one are returned unchanged
pub fn strip_trailing_dot(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

fn merge<'a>(entries: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<NormalizedRecord> {
    let mut out: Vec<NormalizedRecord> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for (name, rdata) in entries {
        match index.get(name) {
            Some(&pos) => {
                let entry = &mut out[pos];
                entry.rdata.push(',');
                entry.rdata.push_str(rdata);
            }
            None => {
                index.insert(name, out.len());
                out.push(NormalizedRecord::new(name, rdata));
            }
        }
    }

    out
}
