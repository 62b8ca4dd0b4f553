#![windows_subsystem = "windows"]
//! DermaScan Records - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod error;
mod settings;
mod store;
mod table;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use std::path::PathBuf;
use tracing::{info, warn};
use ui::components::{self, AutoScroll};
use ui::records::{self as record_view, RecordCard};
use utils::get_data_dir;

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, EnvFilter, prelude::*};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "dermascan-records.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dermascan_records=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "DermaScan Records starting");

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(480.0, 760.0)))
        .with_min_inner_size([360.0, 480.0])
        .with_title(APP_NAME);

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir)?;
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Load history when the view first appears
        if !self.initial_load_started {
            self.initial_load_started = true;
            self.start_load(ctx);
        }

        // Publish finished background loads on the UI thread
        self.poll_load_results(ctx);
        self.sync_records_generation();

        if self.show_settings {
            self.render_settings_modal(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme::BG_BASE))
            .show(ctx, |ui| {
                let available_height = ui.available_height();

                ui.add_space(30.0);
                self.render_header(ui);
                ui.add_space(theme::SPACING_MD);
                self.render_record_list(ui, available_height * self.list_max_fraction);
                ui.add_space(theme::SPACING_LG);
                self.render_footer(ui);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

// ============================================================================
// VIEW RENDERING (Header, Record list, Footer)
// ============================================================================

impl App {
    fn render_header(&mut self, ui: &mut egui::Ui) {
        let mut clear_requested = false;
        let mut reload_requested = false;

        let row = ui
            .horizontal(|ui| {
                ui.set_min_height(theme::CLEAR_BUTTON_SIZE);
                ui.add_space(theme::LIST_SIDE_PAD);

                let reload = ui
                    .add_enabled(
                        !self.load_gate.is_loading(),
                        egui::Button::new(
                            egui::RichText::new(egui_phosphor::regular::ARROW_CLOCKWISE)
                                .size(theme::FONT_BODY),
                        )
                        .frame(false),
                    )
                    .on_hover_text("Reload");
                reload_requested = reload.clicked();

                if ui
                    .add(
                        egui::Button::new(
                            egui::RichText::new(egui_phosphor::regular::GEAR).size(theme::FONT_BODY),
                        )
                        .frame(false),
                    )
                    .on_hover_text("Settings")
                    .clicked()
                {
                    self.show_settings = !self.show_settings;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(theme::LIST_SIDE_PAD);
                    clear_requested = components::round_icon_button(
                        ui,
                        egui_phosphor::regular::TRASH,
                        theme::CLEAR_BUTTON_SIZE,
                        theme::CLEAR_BUTTON_FILL,
                        theme::CLEAR_BUTTON_HOVER,
                    )
                    .on_hover_text("Clear history")
                    .clicked();
                });
            })
            .response
            .rect;

        ui.painter().text(
            row.center(),
            egui::Align2::CENTER_CENTER,
            "Records",
            egui::FontId::proportional(theme::FONT_TITLE),
            theme::TEXT_PRIMARY,
        );

        if clear_requested {
            self.clear_history();
        }
        if reload_requested {
            let ctx = ui.ctx().clone();
            self.start_load(&ctx);
        }
    }

    fn render_record_list(&mut self, ui: &mut egui::Ui, max_height: f32) {
        // Clone records to avoid borrowing the store while thumbnails load
        let records = self.store.records().to_vec();
        let cards = record_view::cards(&records);

        AutoScroll::new("records_list", max_height).show(ui, |ui| {
            egui::Frame::new()
                .inner_margin(egui::Margin::symmetric(theme::LIST_SIDE_PAD as i8, 0))
                .show(ui, |ui| {
                    ui.add_space(10.0);
                    ui.spacing_mut().item_spacing.y = theme::CARD_SPACING;
                    for card in &cards {
                        self.render_record_card(ui, card);
                    }
                });
        });
    }

    fn render_record_card(&mut self, ui: &mut egui::Ui, card: &RecordCard<'_>) {
        let width = ui.available_width();
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, theme::CARD_HEIGHT), egui::Sense::hover());
        response.on_hover_text(format!("Model {}", card.record.model_version));

        if !ui.is_rect_visible(rect) {
            return;
        }

        let thumb_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.min.x + theme::THUMB_LEFT_PAD,
                rect.center().y - theme::THUMB_SIZE / 2.0 + 1.0,
            ),
            egui::vec2(theme::THUMB_SIZE, theme::THUMB_SIZE),
        );
        let texture = self.load_thumbnail(ui.ctx(), &card.record.image_path);

        let painter = ui.painter();
        painter.rect_filled(rect, theme::RADIUS_CARD, theme::CARD_FILL);

        match &texture {
            Some(tex) => components::paint_thumbnail(painter, thumb_rect, tex),
            None => components::paint_thumbnail_placeholder(painter, thumb_rect),
        }

        let text_x = thumb_rect.max.x + theme::CARD_CONTENT_GAP;
        painter.text(
            egui::pos2(text_x, rect.center().y - 2.0),
            egui::Align2::LEFT_BOTTOM,
            card.label,
            egui::FontId::proportional(theme::FONT_CARD_LABEL),
            theme::TEXT_PRIMARY,
        );

        let info_y = rect.center().y + 3.0;
        let mut x = text_x;
        if let Some(badge) = &card.badge {
            let badge_rect = painter.text(
                egui::pos2(x, info_y),
                egui::Align2::LEFT_TOP,
                &badge.text,
                egui::FontId::proportional(theme::FONT_BODY),
                theme::confidence_color(badge.tier),
            );
            x = badge_rect.max.x + theme::BADGE_GAP;
        }
        painter.text(
            egui::pos2(x, info_y),
            egui::Align2::LEFT_TOP,
            &card.record.timestamp,
            egui::FontId::proportional(theme::FONT_BODY),
            theme::TIMESTAMP_TEXT,
        );
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        let visible = record_view::visible_records(self.store.records()).count();
        ui.vertical_centered(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(record_view::footer_text(visible))
                        .size(theme::FONT_FOOTER)
                        .color(theme::FOOTER_TEXT),
                )
                .selectable(false),
            );
        });
    }

    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(320.0);

                // Title bar with close button
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(egui::RichText::new("Settings").size(16.0).strong())
                            .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let close_size = 24.0;
                        let (rect, response) = ui.allocate_exact_size(
                            egui::vec2(close_size, close_size),
                            egui::Sense::click(),
                        );
                        let close_color = if response.hovered() {
                            ui.painter().rect_filled(rect, 4.0, theme::BG_SURFACE);
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            theme::STATUS_ERROR
                        } else {
                            theme::TEXT_DIM
                        };
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::X,
                            egui::FontId::proportional(16.0),
                            close_color,
                        );
                        if response.clicked() {
                            self.show_settings = false;
                        }
                    });
                });
                ui.add_space(4.0);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — Records Folder —
                theme::section_label(ui, "Records Folder");

                let mut new_root: Option<Option<PathBuf>> = None;

                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = 4.0;
                    let browse_width = 28.0 + 4.0; // button + spacing
                    let frame_padding = 12.0 + 2.0; // inner_margin (6*2) + stroke (1*2)
                    let text_width = (ui.available_width() - browse_width - frame_padding).max(40.0);
                    let te = egui::Frame::new()
                        .fill(theme::BG_INPUT)
                        .stroke(egui::Stroke::new(1.0, theme::BORDER_SUBTLE))
                        .corner_radius(4.0)
                        .inner_margin(egui::Margin::symmetric(6, 4))
                        .show(ui, |ui| {
                            ui.add(
                                egui::TextEdit::singleline(&mut self.records_root_str)
                                    .frame(false)
                                    .desired_width(text_width)
                                    .font(egui::FontId::proportional(theme::FONT_LABEL)),
                            )
                        })
                        .inner;

                    // Browse button (aligned to text input height)
                    let (rect, resp) =
                        ui.allocate_exact_size(egui::vec2(28.0, 28.0), egui::Sense::click());
                    if resp.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        ui.painter().rect_filled(rect, 4.0, theme::BG_SURFACE);
                    }
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        egui_phosphor::regular::FOLDER_OPEN,
                        egui::FontId::proportional(16.0),
                        theme::TEXT_SECONDARY,
                    );
                    if resp.clicked() || te.double_clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .set_directory(self.store.paths().root())
                            .pick_folder()
                        {
                            new_root = Some(Some(path));
                        }
                    }
                    if te.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        let typed = self.records_root_str.trim();
                        new_root = Some(if typed.is_empty() {
                            None
                        } else {
                            Some(PathBuf::from(typed))
                        });
                    }
                });

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    let open_label = format!("{}  Open Folder", egui_phosphor::regular::FOLDER_OPEN);
                    if components::painted_button(ui, &open_label, 120.0, theme::BTN_DEFAULT) {
                        let root = self.store.paths().root().to_path_buf();
                        std::fs::create_dir_all(&root).ok();
                        if let Err(e) = open::that(&root) {
                            warn!(error = %e, path = %root.display(), "Failed to open records folder");
                        }
                    }
                    let default_label =
                        format!("{}  Use Default", egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE);
                    if self.records_root_override.is_some()
                        && components::painted_button(ui, &default_label, 120.0, theme::BTN_DEFAULT)
                    {
                        new_root = Some(None);
                    }
                });

                if let Some(root) = new_root {
                    self.set_records_root(ctx, root);
                }

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — List —
                theme::section_label(ui, "List Height");
                ui.add(
                    egui::Slider::new(&mut self.list_max_fraction, 0.3..=0.95)
                        .custom_formatter(|v, _| format!("{:.0}%", v * 100.0))
                        .text("of window"),
                );

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — History —
                theme::section_label(ui, "History");
                let clear_label = format!("{}  Clear History", egui_phosphor::regular::TRASH);
                if components::painted_button(ui, &clear_label, 120.0, theme::BTN_DANGER) {
                    self.clear_history();
                }
            });

        if modal_response.should_close() {
            self.show_settings = false;
        }
        if !self.show_settings {
            self.save_settings();
        }
    }
}
