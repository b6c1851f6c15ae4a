//! Test doubles and common utilities for pipeline contract tests
//!
//! This module provides in-memory stand-ins for the DNS API, the sheet and
//! the audit collection, each counting the calls it receives.

#![allow(dead_code)]

use rrsync_core::error::{Error, Result};
use rrsync_core::harness::Response;
use rrsync_core::{
    AuditSink, FetchedRecords, NewRow, RawRecord, RecordSource, RowUpdate, RunLog, RunReport,
    SheetRow, SheetStore,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A record source that returns a fixed listing
///
/// Clones share the call counter.
#[derive(Clone)]
pub struct MockRecordSource {
    records: Vec<RawRecord>,
    fail: bool,
    fetch_call_count: Arc<AtomicUsize>,
}

impl MockRecordSource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            fail: false,
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose fetch always fails
    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RecordSource for MockRecordSource {
    async fn fetch_records(&self) -> Result<FetchedRecords> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::auth("zdns: invalid credentials (status 401)"));
        }
        Ok(FetchedRecords {
            records: self.records.clone(),
            total: self.records.len(),
        })
    }

    fn source_name(&self) -> &'static str {
        "mock-source"
    }
}

/// Which sheet call should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Nothing,
    List,
    Insert,
    Update,
    Delete,
}

/// Calls received by the mock sheet, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCall {
    List,
    Insert(Vec<NewRow>),
    Update(Vec<RowUpdate>),
    Delete(Vec<String>),
}

/// An in-memory sheet that applies mutations to its row list
#[derive(Clone)]
pub struct MockSheetStore {
    rows: Arc<Mutex<Vec<SheetRow>>>,
    calls: Arc<Mutex<Vec<SheetCall>>>,
    fail_on: FailOn,
    next_id: Arc<AtomicUsize>,
}

impl MockSheetStore {
    pub fn new(rows: Vec<SheetRow>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: FailOn::Nothing,
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Rows named as given, ids `rec-<name>`
    pub fn with_names(names: &[&str]) -> Self {
        Self::new(
            names
                .iter()
                .map(|n| SheetRow::new(format!("rec-{n}"), *n, "old"))
                .collect(),
        )
    }

    pub fn failing_on(mut self, fail_on: FailOn) -> Self {
        self.fail_on = fail_on;
        self
    }

    pub fn rows(&self) -> Vec<SheetRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn delete_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SheetCall::Delete(_)))
            .count()
    }

    pub fn mutation_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !matches!(c, SheetCall::List))
            .count()
    }

    fn record(&self, call: SheetCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: FailOn) -> Result<()> {
        if self.fail_on == op {
            return Err(Error::api("wecom", 301_025, format!("{op:?} refused")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl SheetStore for MockSheetStore {
    async fn list_rows(&self) -> Result<Vec<SheetRow>> {
        self.record(SheetCall::List);
        self.check(FailOn::List)?;
        Ok(self.rows())
    }

    async fn insert_rows(&self, rows: &[NewRow]) -> Result<usize> {
        self.record(SheetCall::Insert(rows.to_vec()));
        self.check(FailOn::Insert)?;
        let mut stored = self.rows.lock().unwrap();
        for row in rows {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            stored.push(SheetRow::new(format!("new-{id}"), &row.name, &row.rdata));
        }
        Ok(rows.len())
    }

    async fn update_rows(&self, rows: &[RowUpdate]) -> Result<usize> {
        self.record(SheetCall::Update(rows.to_vec()));
        self.check(FailOn::Update)?;
        let mut stored = self.rows.lock().unwrap();
        let mut updated = 0;
        for update in rows {
            if let Some(row) = stored.iter_mut().find(|r| r.record_id == update.record_id) {
                row.name = update.name.clone();
                row.rdata = update.rdata.clone();
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_rows(&self, record_ids: &[String]) -> Result<()> {
        self.record(SheetCall::Delete(record_ids.to_vec()));
        self.check(FailOn::Delete)?;
        self.rows
            .lock()
            .unwrap()
            .retain(|r| !record_ids.contains(&r.record_id));
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "mock-sheet"
    }
}

/// An audit sink that keeps reports in memory
#[derive(Clone, Default)]
pub struct MockAuditSink {
    reports: Arc<Mutex<Vec<RunReport>>>,
    fail: Arc<AtomicBool>,
}

impl MockAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let sink = Self::default();
        sink.fail.store(true, Ordering::SeqCst);
        sink
    }

    pub fn reports(&self) -> Vec<RunReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AuditSink for MockAuditSink {
    async fn record_run(&self, report: &RunReport) -> Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::audit("collection unavailable"));
        }
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "mock-audit"
    }
}

/// A RunLog that captures both streams
#[derive(Clone, Default)]
pub struct CapturingLog {
    info: Arc<Mutex<Vec<String>>>,
    error: Arc<Mutex<Vec<String>>>,
}

impl CapturingLog {
    pub fn info_lines(&self) -> Vec<String> {
        self.info.lock().unwrap().clone()
    }

    pub fn error_lines(&self) -> Vec<String> {
        self.error.lock().unwrap().clone()
    }
}

impl RunLog for CapturingLog {
    fn info(&self, message: &str) {
        self.info.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.error.lock().unwrap().push(message.to_string());
    }
}

/// A Response that remembers whether it was completed
#[derive(Clone, Default)]
pub struct RecordingResponse {
    completed: Arc<AtomicBool>,
}

impl RecordingResponse {
    pub fn completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }
}

impl Response for RecordingResponse {
    fn empty(self) {
        self.completed.store(true, Ordering::SeqCst);
    }
}

/// Shorthand for an enabled record
pub fn enabled(name: &str, ty: &str, rdata: &str) -> RawRecord {
    RawRecord::new(name, ty, rdata, "yes")
}

/// Default options with the delete toggle set
pub fn options(delete_enabled: bool) -> rrsync_core::SyncOptions {
    rrsync_core::SyncOptions {
        delete_enabled,
        ..Default::default()
    }
}
