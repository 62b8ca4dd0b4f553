//! Record store for DermaScan Records
//! Owns the record file and the companion images directory

use crate::constants::*;
use crate::error::{Result, StoreError};
use crate::table::{Row, Table};
use crate::types::{ClearReport, DeleteStatus, ScanRecord};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Fixed on-disk locations under one records root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPaths {
    root: PathBuf,
}

impl RecordPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn records_file(&self) -> PathBuf {
        self.root.join(RECORDS_FILE_NAME)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR_NAME)
    }

    /// Resolve a record's thumbnail filename
    pub fn image_file(&self, image_path: &str) -> PathBuf {
        self.images_dir().join(image_path)
    }
}

/// Handle returned by [`RecordStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[ScanRecord])>;

pub struct RecordStore {
    paths: RecordPaths,
    records: Vec<ScanRecord>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl RecordStore {
    pub fn new(paths: RecordPaths) -> Self {
        Self {
            paths,
            records: Vec::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Store pre-populated without touching disk
    pub fn with_records(paths: RecordPaths, records: Vec<ScanRecord>) -> Self {
        let mut store = Self::new(paths);
        store.records = records;
        store
    }

    pub fn paths(&self) -> &RecordPaths {
        &self.paths
    }

    /// Point the store at another records root. Current records stay until the next load.
    pub fn set_paths(&mut self, paths: RecordPaths) {
        debug!(root = %paths.root().display(), "Records root changed");
        self.paths = paths;
    }

    /// Current records in file order, placeholders included
    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    /// Register a listener called with the full record set on every change
    pub fn subscribe(&mut self, listener: impl FnMut(&[ScanRecord]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    #[allow(dead_code)]
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Read the record file and publish the result.
    ///
    /// A missing file leaves the current records untouched. Structural failures
    /// are logged and returned; the current records are kept.
    #[allow(dead_code)]
    pub fn load(&mut self) -> Result<()> {
        let result = read_records(&self.paths);
        self.apply(result)
    }

    /// Publish a result produced by [`read_records`], possibly on another thread.
    /// Must be called from the thread that owns the store.
    pub fn apply(&mut self, result: Result<Option<Vec<ScanRecord>>>) -> Result<()> {
        match result {
            Ok(Some(records)) => {
                info!(count = records.len(), "Records loaded");
                self.records = records;
                self.notify();
                Ok(())
            }
            Ok(None) => {
                let path = self.paths.records_file();
                debug!(path = %path.display(), "No record file, keeping current records");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to load records");
                Err(e)
            }
        }
    }

    /// Delete the record file and the images directory, then forget all records.
    ///
    /// Each deletion is attempted independently. Records are cleared in memory
    /// even if something could not be removed; the report says what was left.
    pub fn clear(&mut self) -> ClearReport {
        let records_file = self.paths.records_file();
        let images_dir = self.paths.images_dir();

        let report = ClearReport {
            records_file: delete_path(&records_file, |p| std::fs::remove_file(p)),
            images_dir: delete_path(&images_dir, |p| std::fs::remove_dir_all(p)),
        };

        if report.is_complete() {
            info!(root = %self.paths.root().display(), "History cleared");
        } else {
            warn!(
                records_file = ?report.records_file,
                images_dir = ?report.images_dir,
                "History cleared in memory, files left on disk"
            );
        }

        self.records.clear();
        self.notify();
        report
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.records);
        }
    }
}

fn delete_path(path: &Path, remove: impl FnOnce(&Path) -> std::io::Result<()>) -> DeleteStatus {
    if !path.exists() {
        return DeleteStatus::Absent;
    }
    match remove(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Deleted");
            DeleteStatus::Removed
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to delete");
            DeleteStatus::Failed(e.to_string())
        }
    }
}

/// Read and parse the record file without touching any store.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_records(paths: &RecordPaths) -> Result<Option<Vec<ScanRecord>>> {
    let path = paths.records_file();
    if !path.exists() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(&path).map_err(|source| StoreError::Read {
        path: path.clone(),
        source,
    })?;

    parse_records(&text).map(Some)
}

/// Parse record file text, dropping rows that are incomplete, not numeric,
/// or whose confidence lies outside 0..=1
pub fn parse_records(text: &str) -> Result<Vec<ScanRecord>> {
    let table = Table::parse(text)?;
    let total = table.len();

    let records: Vec<ScanRecord> = table
        .rows()
        .filter_map(|row| {
            let record = record_from_row(&row);
            if record.is_none() {
                debug!(line = row.line(), "Skipping invalid record row");
            }
            record
        })
        .collect();

    if records.len() != total {
        debug!(kept = records.len(), total = total, "Dropped invalid rows");
    }

    Ok(records)
}

fn record_from_row(row: &Row<'_>) -> Option<ScanRecord> {
    Some(ScanRecord {
        id: row.get(COL_ID)?.to_string(),
        image_path: row.get(COL_IMAGE_PATH)?.to_string(),
        result_count: row.get(COL_RESULT_COUNT)?.parse().ok()?,
        model_version: row.get(COL_MODEL)?.to_string(),
        kind: row.get(COL_TYPE)?.to_string(),
        confidence: row
            .get(COL_CONFIDENCE)?
            .parse()
            .ok()
            .filter(|c: &f64| (0.0..=1.0).contains(c))?,
        timestamp: row.get(COL_TIMESTAMP)?.to_string(),
    })
}
