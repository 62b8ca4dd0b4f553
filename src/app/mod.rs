//! App module - contains the main application state and logic

mod loader;
mod preview;
mod thumbnails;

use crate::constants::*;
use crate::settings::{default_records_root, Settings};
use crate::store::{RecordPaths, RecordStore};
use crate::theme;
use crate::utils::display_path;
use eframe::egui;
use loader::{LoadGate, LoadMessage};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;
use tracing::{debug, info};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) store: RecordStore,
    // Background loading
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) load_tx: mpsc::Sender<LoadMessage>,
    pub(crate) load_rx: mpsc::Receiver<LoadMessage>,
    pub(crate) load_gate: LoadGate,
    pub(crate) initial_load_started: bool,
    // Bumped by the store listener on every published change
    pub(crate) records_generation: Rc<Cell<u64>>,
    pub(crate) seen_generation: u64,
    // Thumbnail cache (None = failed to load, show placeholder)
    pub(crate) thumbnail_cache: HashMap<String, Option<egui::TextureHandle>>,
    // Settings
    pub(crate) show_settings: bool,
    pub(crate) records_root_override: Option<String>,
    pub(crate) records_root_str: String,
    pub(crate) list_max_fraction: f32,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
    ) -> std::io::Result<Self> {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let mock = std::env::var(MOCK_RECORDS_ENV).is_ok();
        let mut store = if mock {
            info!("Mock records enabled, skipping disk load");
            preview::preview_store(&data_dir)
        } else {
            RecordStore::new(RecordPaths::new(settings.records_root_or_default()))
        };

        let records_generation = Rc::new(Cell::new(0));
        {
            let generation = records_generation.clone();
            let ctx = cc.egui_ctx.clone();
            store.subscribe(move |records| {
                generation.set(generation.get() + 1);
                debug!(count = records.len(), "Records published");
                ctx.request_repaint();
            });
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("record-loader")
            .build()?;
        let (load_tx, load_rx) = mpsc::channel();

        let records_root_str = display_path(store.paths().root());

        Ok(Self {
            store,
            runtime,
            load_tx,
            load_rx,
            load_gate: LoadGate::default(),
            initial_load_started: mock,
            records_generation,
            seen_generation: 0,
            thumbnail_cache: HashMap::new(),
            show_settings: false,
            records_root_override: settings.records_root,
            records_root_str,
            list_max_fraction: settings.list_max_fraction,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        })
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            records_root: self.records_root_override.clone(),
            list_max_fraction: self.list_max_fraction,
        };
        settings.save(&self.data_dir);
    }

    /// Delete history on disk and in memory
    pub fn clear_history(&mut self) {
        // Results of loads started before the clear must not resurrect records
        self.load_gate.invalidate();
        let report = self.store.clear();
        if !report.is_complete() {
            debug!(?report, "Clear left files behind");
        }
        self.thumbnail_cache.clear();
    }

    /// Point the store at a new records root and reload from it
    pub fn set_records_root(&mut self, ctx: &egui::Context, root: Option<PathBuf>) {
        self.records_root_override = root.as_deref().map(display_path);
        let paths = RecordPaths::new(root.unwrap_or_else(default_records_root));
        self.records_root_str = display_path(paths.root());

        self.load_gate.invalidate();
        self.store.set_paths(paths);
        self.thumbnail_cache.clear();
        self.save_settings();
        self.start_load(ctx);
    }

    /// Drop cached textures once the store published a new record set
    pub(crate) fn sync_records_generation(&mut self) {
        let generation = self.records_generation.get();
        if generation != self.seen_generation {
            self.seen_generation = generation;
            self.thumbnail_cache.clear();
        }
    }
}
