//! Background record loading
//!
//! The record file is read and parsed on the runtime's blocking pool; the
//! result comes back over a channel and is applied to the store on the UI
//! thread in `poll_load_results`.

use super::App;
use crate::error::Result;
use crate::store::{read_records, RecordStore};
use crate::types::ScanRecord;
use eframe::egui;
use std::sync::mpsc;
use tracing::debug;

pub(crate) struct LoadMessage {
    epoch: u64,
    result: Result<Option<Vec<ScanRecord>>>,
}

/// Tracks the single in-flight load.
///
/// Anything that changes what's on disk or where the store points bumps the
/// epoch; a load that started before that is discarded when it arrives.
#[derive(Debug, Default)]
pub(crate) struct LoadGate {
    loading: bool,
    reload_pending: bool,
    epoch: u64,
}

impl LoadGate {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Epoch to tag a new load with, or None if one is running (the request is queued)
    pub fn begin(&mut self) -> Option<u64> {
        if self.loading {
            self.reload_pending = true;
            return None;
        }
        self.loading = true;
        Some(self.epoch)
    }

    pub fn invalidate(&mut self) {
        self.epoch += 1;
    }

    /// Mark the running load finished. True if its result is still current.
    pub fn finish(&mut self, epoch: u64) -> bool {
        self.loading = false;
        epoch == self.epoch
    }

    /// True once per queued reload, after the running load finished
    pub fn take_pending(&mut self) -> bool {
        if !self.loading && self.reload_pending {
            self.reload_pending = false;
            return true;
        }
        false
    }
}

/// Apply every finished load waiting in the channel
pub(crate) fn drain_loads(
    gate: &mut LoadGate,
    store: &mut RecordStore,
    rx: &mpsc::Receiver<LoadMessage>,
) {
    while let Ok(message) = rx.try_recv() {
        if !gate.finish(message.epoch) {
            debug!(epoch = message.epoch, "Discarding stale load");
            continue;
        }
        // Failures are logged by the store and leave the records as they were
        store.apply(message.result).ok();
    }
}

impl App {
    pub fn start_load(&mut self, ctx: &egui::Context) {
        let Some(epoch) = self.load_gate.begin() else {
            return;
        };

        let paths = self.store.paths().clone();
        let tx = self.load_tx.clone();
        let ctx = ctx.clone();

        debug!(root = %paths.root().display(), "Starting record load");

        self.runtime.spawn_blocking(move || {
            let result = read_records(&paths);
            if tx.send(LoadMessage { epoch, result }).is_err() {
                debug!("Load receiver gone, dropping result");
            }
            ctx.request_repaint();
        });
    }

    /// Apply finished loads. Runs on the UI thread every frame.
    pub fn poll_load_results(&mut self, ctx: &egui::Context) {
        drain_loads(&mut self.load_gate, &mut self.store, &self.load_rx);

        if self.load_gate.take_pending() {
            self.start_load(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::RecordPaths;
    use tempfile::tempdir;

    const HEADER: &str = "ID,ImagePath,ResultCount,Model,Type,Confidence,Timestamp";

    fn write_records(paths: &RecordPaths, rows: &str) {
        std::fs::create_dir_all(paths.root()).unwrap();
        std::fs::write(paths.records_file(), format!("{HEADER}\n{rows}")).unwrap();
    }

    fn ids(store: &RecordStore) -> Vec<&str> {
        store.records().iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn current_load_is_applied() {
        let dir = tempdir().expect("Failed to create temp dir");
        let paths = RecordPaths::new(dir.path());
        write_records(&paths, "1,a.jpg,1,1.0,Nevus,0.9,t1\n");

        let mut gate = LoadGate::default();
        let mut store = RecordStore::new(paths.clone());
        let (tx, rx) = mpsc::channel();

        let epoch = gate.begin().unwrap();
        let handle = std::thread::spawn(move || {
            let result = read_records(&paths);
            tx.send(LoadMessage { epoch, result }).unwrap();
        });
        handle.join().unwrap();

        drain_loads(&mut gate, &mut store, &rx);
        assert!(!gate.is_loading());
        assert_eq!(ids(&store), vec!["1"]);
    }

    #[test]
    fn stale_load_is_dropped_after_clear() {
        let dir = tempdir().expect("Failed to create temp dir");
        let paths = RecordPaths::new(dir.path());
        write_records(&paths, "1,a.jpg,1,1.0,Nevus,0.9,t1\n");

        let mut gate = LoadGate::default();
        let mut store = RecordStore::new(paths.clone());
        let (tx, rx) = mpsc::channel();

        // Load read the file before the clear went through
        let epoch = gate.begin().unwrap();
        let result = read_records(&paths);

        gate.invalidate();
        store.clear();
        assert!(!paths.records_file().exists());

        tx.send(LoadMessage { epoch, result }).unwrap();
        drain_loads(&mut gate, &mut store, &rx);

        assert!(!gate.is_loading());
        assert!(store.records().is_empty());
    }

    #[test]
    fn pending_reload_fires_once() {
        let mut gate = LoadGate::default();
        let mut store = RecordStore::new(RecordPaths::new("unused"));
        let (tx, rx) = mpsc::channel();

        let epoch = gate.begin().unwrap();
        assert_eq!(gate.begin(), None);
        assert_eq!(gate.begin(), None);
        // Still running, nothing to restart yet
        assert!(!gate.take_pending());

        tx.send(LoadMessage { epoch, result: Ok(None) }).unwrap();
        drain_loads(&mut gate, &mut store, &rx);

        assert!(gate.take_pending());
        assert!(!gate.take_pending());
        assert!(gate.begin().is_some());
    }

    #[test]
    fn failed_load_keeps_records() {
        let dir = tempdir().expect("Failed to create temp dir");
        let paths = RecordPaths::new(dir.path());
        write_records(&paths, "1,a.jpg,1,1.0,Nevus,0.9,t1\n");

        let mut gate = LoadGate::default();
        let mut store = RecordStore::new(paths.clone());
        let (tx, rx) = mpsc::channel();

        let epoch = gate.begin().unwrap();
        tx.send(LoadMessage { epoch, result: read_records(&paths) }).unwrap();
        drain_loads(&mut gate, &mut store, &rx);
        assert_eq!(ids(&store), vec!["1"]);

        let epoch = gate.begin().unwrap();
        let result = Err(StoreError::Malformed {
            line: 2,
            reason: "unterminated quoted field".to_string(),
        });
        tx.send(LoadMessage { epoch, result }).unwrap();
        drain_loads(&mut gate, &mut store, &rx);

        assert!(!gate.is_loading());
        assert_eq!(ids(&store), vec!["1"]);
    }
}
