//! Sheet reconciler
//!
//! Compares the normalized records (desired state) with the rows currently
//! in the sheet (observed state) and applies the difference:
//!
//! ```text
//! normalized ──┐
//!              ├─ plan() ──▶ ReconciliationPlan ──apply()──▶ SheetStore
//! sheet rows ──┘                { inserts, updates, deletes }
//! ```
//!
//! Every normalized record lands in exactly one of inserts or updates.
//! Updates are full overwrites; unchanged rows are rewritten too.
//!
//! Rows with an empty name are left alone: they match nothing and are never
//! deleted. Two rows sharing a name make the sheet ambiguous, so planning
//! fails with [`Error::DuplicateRow`] before any mutation is sent.
//!
//! No rollback: if the update call fails after inserts went through, the
//! inserts stay. The next run reconciles from whatever the sheet holds.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::model::{NewRow, NormalizedRecord, RowUpdate, RunStatistics, SheetRow};
use crate::traits::{RunLog, SheetStore};

/// The three disjoint change sets of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// Records with no row yet
    pub inserts: Vec<NewRow>,
    /// Records whose row exists
    pub updates: Vec<RowUpdate>,
    /// Rows with no record, as `(name, record_id)`; empty when deletions are off
    pub deletes: Vec<(String, String)>,
}

impl ReconciliationPlan {
    /// Row ids in delete order
    pub fn delete_ids(&self) -> Vec<String> {
        self.deletes.iter().map(|(_, id)| id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// Compute the change sets
///
/// Delete order follows the sheet's row order.
pub fn plan(
    records: &[NormalizedRecord],
    rows: &[SheetRow],
    delete_enabled: bool,
    log: &dyn RunLog,
) -> Result<ReconciliationPlan> {
    let existing = index_rows(rows, log)?;

    let mut plan = ReconciliationPlan::default();
    for record in records {
        match existing.get(record.name.as_str()) {
            Some(record_id) => plan.updates.push(RowUpdate {
                record_id: (*record_id).to_string(),
                name: record.name.clone(),
                rdata: record.rdata.clone(),
            }),
            None => plan.inserts.push(NewRow {
                temp_id: record.name.clone(),
                name: record.name.clone(),
                rdata: record.rdata.clone(),
            }),
        }
    }

    if delete_enabled {
        let wanted: HashSet<&str> = records.iter().map(|r| r.name.as_str()).collect();
        plan.deletes = rows
            .iter()
            .filter(|row| !row.name.is_empty() && !wanted.contains(row.name.as_str()))
            .map(|row| (row.name.clone(), row.record_id.clone()))
            .collect();
    }

    Ok(plan)
}

/// Build the name → row id mapping, rejecting duplicate names
fn index_rows<'a>(rows: &'a [SheetRow], log: &dyn RunLog) -> Result<HashMap<&'a str, &'a str>> {
    let mut index: HashMap<&str, &str> = HashMap::with_capacity(rows.len());
    let mut blank = 0usize;

    for row in rows {
        if row.name.is_empty() {
            blank += 1;
            continue;
        }
        if let Some(first_id) = index.insert(row.name.as_str(), row.record_id.as_str()) {
            return Err(Error::DuplicateRow {
                name: row.name.clone(),
                first_id: first_id.to_string(),
                second_id: row.record_id.clone(),
            });
        }
    }

    if blank > 0 {
        log.info(&format!("Ignoring {blank} sheet row(s) with an empty name"));
    }

    Ok(index)
}

/// Send the plan to the sheet, one batch call per non-empty set
///
/// `added` and `updated` are the counts the service reports; `deleted` is
/// the number of ids submitted.
pub async fn apply(
    plan: &ReconciliationPlan,
    sheet: &dyn SheetStore,
    log: &dyn RunLog,
) -> Result<RunStatistics> {
    let mut stats = RunStatistics::default();

    if !plan.inserts.is_empty() {
        stats.added = sheet.insert_rows(&plan.inserts).await?;
    }
    log.info(&format!("Inserted {} row(s)", stats.added));

    if !plan.updates.is_empty() {
        stats.updated = sheet.update_rows(&plan.updates).await?;
    }
    log.info(&format!("Updated {} row(s)", stats.updated));

    if !plan.deletes.is_empty() {
        sheet.delete_rows(&plan.delete_ids()).await?;
        stats.deleted = plan.deletes.len();
        for (name, _) in &plan.deletes {
            tracing::debug!("Deleted row for {}", name);
        }
    }
    log.info(&format!("Deleted {} row(s)", stats.deleted));

    Ok(stats)
}

/// Fetch rows, plan and apply
pub async fn reconcile(
    records: &[NormalizedRecord],
    sheet: &dyn SheetStore,
    delete_enabled: bool,
    log: &dyn RunLog,
) -> Result<RunStatistics> {
    let rows = sheet.list_rows().await?;
    log.info(&format!(
        "Fetched {} existing row(s) from {}",
        rows.len(),
        sheet.store_name()
    ));

    let plan = plan(records, &rows, delete_enabled, log)?;
    log.info(&format!(
        "Plan: {} insert(s), {} update(s), {} delete(s){}",
        plan.inserts.len(),
        plan.updates.len(),
        plan.deletes.len(),
        if delete_enabled { "" } else { " (deletion disabled)" }
    ));

    apply(&plan, sheet, log).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TracingLog;

    fn names(plan: &ReconciliationPlan) -> (Vec<&str>, Vec<&str>, Vec<&str>) {
        (
            plan.inserts.iter().map(|r| r.name.as_str()).collect(),
            plan.updates.iter().map(|r| r.name.as_str()).collect(),
            plan.deletes.iter().map(|(n, _)| n.as_str()).collect(),
        )
    }

    fn rows() -> Vec<SheetRow> {
        vec![
            SheetRow::new("rec-a", "a.com", "0.0.0.0"),
            SheetRow::new("rec-c", "c.com", "3.3.3.3"),
        ]
    }

    fn records() -> Vec<NormalizedRecord> {
        vec![
            NormalizedRecord::new("a.com", "1.1.1.1"),
            NormalizedRecord::new("d.com", "4.4.4.4"),
        ]
    }

    #[test]
    fn splits_into_three_sets() {
        let plan = plan(&records(), &rows(), true, &TracingLog).unwrap();

        assert_eq!(names(&plan), (vec!["d.com"], vec!["a.com"], vec!["c.com"]));
        assert_eq!(plan.updates[0].record_id, "rec-a");
        assert_eq!(plan.updates[0].rdata, "1.1.1.1");
        assert_eq!(plan.inserts[0].temp_id, "d.com");
        assert_eq!(plan.delete_ids(), vec!["rec-c".to_string()]);
    }

    #[test]
    fn deletion_disabled_leaves_delete_set_empty() {
        let plan = plan(&records(), &rows(), false, &TracingLog).unwrap();

        assert_eq!(names(&plan), (vec!["d.com"], vec!["a.com"], vec![]));
    }

    #[test]
    fn identical_rows_are_still_updated() {
        let rows = vec![SheetRow::new("rec-a", "a.com", "1.1.1.1")];
        let plan = plan(&[NormalizedRecord::new("a.com", "1.1.1.1")], &rows, true, &TracingLog)
            .unwrap();

        assert_eq!(plan.updates.len(), 1);
        assert!(plan.inserts.is_empty());
        assert!(plan.deletes.is_empty());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let rows = vec![
            SheetRow::new("rec-1", "a.com", "1.1.1.1"),
            SheetRow::new("rec-2", "a.com", "2.2.2.2"),
        ];

        match plan(&records(), &rows, true, &TracingLog) {
            Err(Error::DuplicateRow {
                name,
                first_id,
                second_id,
            }) => {
                assert_eq!(name, "a.com");
                assert_eq!(first_id, "rec-1");
                assert_eq!(second_id, "rec-2");
            }
            other => panic!("expected DuplicateRow, got {other:?}"),
        }
    }

    #[test]
    fn blank_rows_are_neither_matched_nor_deleted() {
        let rows = vec![
            SheetRow::new("rec-blank-1", "", ""),
            SheetRow::new("rec-blank-2", "", "9.9.9.9"),
            SheetRow::new("rec-a", "a.com", "1.1.1.1"),
        ];
        let plan = plan(&records(), &rows, true, &TracingLog).unwrap();

        assert_eq!(names(&plan), (vec!["d.com"], vec!["a.com"], vec![]));
    }

    #[test]
    fn empty_sheet_inserts_everything() {
        let plan = plan(&records(), &[], true, &TracingLog).unwrap();

        assert_eq!(plan.inserts.len(), 2);
        assert!(plan.updates.is_empty());
        assert!(plan.deletes.is_empty());
    }

    #[test]
    fn no_records_deletes_every_named_row() {
        let plan = plan(&[], &rows(), true, &TracingLog).unwrap();

        assert_eq!(names(&plan), (vec![], vec![], vec!["a.com", "c.com"]));
        assert!(!plan.is_empty());
    }

    #[test]
    fn insert_and_update_partition_the_records() {
        let records: Vec<NormalizedRecord> = (0..20)
            .map(|i| NormalizedRecord::new(format!("h{i}.example.com"), format!("10.0.0.{i}")))
            .collect();
        let rows: Vec<SheetRow> = (0..20)
            .step_by(3)
            .map(|i| SheetRow::new(format!("rec-{i}"), format!("h{i}.example.com"), ""))
            .collect();

        let plan = plan(&records, &rows, true, &TracingLog).unwrap();

        let inserted: HashSet<&str> = plan.inserts.iter().map(|r| r.name.as_str()).collect();
        let updated: HashSet<&str> = plan.updates.iter().map(|r| r.name.as_str()).collect();
        assert!(inserted.is_disjoint(&updated));
        assert_eq!(inserted.len() + updated.len(), records.len());
        assert_eq!(updated.len(), rows.len());
        assert!(plan.deletes.is_empty());
    }
}
