//! Reusable UI components
//!
//! This module contains standalone UI components that can be used
//! throughout the application.

use crate::theme;
use eframe::egui;

/// Height decision for a container that grows with its content up to a cap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerFit {
    pub height: f32,
    pub scrollable: bool,
}

impl ContainerFit {
    pub fn decide(content_height: f32, max_height: f32) -> Self {
        if content_height > max_height {
            Self {
                height: max_height,
                scrollable: true,
            }
        } else {
            Self {
                height: content_height,
                scrollable: false,
            }
        }
    }
}

/// Vertical container sized to its content, scrolling once it would exceed `max_height`.
///
/// The content height measured on the previous frame decides the layout of the
/// current one; a repaint is requested whenever the measurement changes.
pub struct AutoScroll {
    id_salt: &'static str,
    max_height: f32,
}

impl AutoScroll {
    pub fn new(id_salt: &'static str, max_height: f32) -> Self {
        Self {
            id_salt,
            max_height: max_height.max(0.0),
        }
    }

    pub fn show(self, ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
        let id = ui.make_persistent_id(self.id_salt);
        let measured = ui
            .ctx()
            .data(|d| d.get_temp::<f32>(id))
            .unwrap_or(0.0);
        let fit = ContainerFit::decide(measured, self.max_height);

        let content_height = if fit.scrollable {
            egui::ScrollArea::vertical()
                .id_salt(id)
                .max_height(fit.height)
                .auto_shrink([false, true])
                .show(ui, add_contents)
                .content_size
                .y
        } else {
            ui.scope(add_contents).response.rect.height()
        };

        if (content_height - measured).abs() > 0.5 {
            ui.ctx().data_mut(|d| d.insert_temp(id, content_height));
            ui.ctx().request_repaint();
        }
    }
}

/// Grey square with a photo glyph, shown when a thumbnail can't be loaded
pub fn paint_thumbnail_placeholder(painter: &egui::Painter, rect: egui::Rect) {
    painter.rect_filled(rect, theme::RADIUS_THUMB, theme::THUMB_PLACEHOLDER);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        egui_phosphor::regular::IMAGE,
        egui::FontId::proportional(rect.height() * 0.4),
        theme::THUMB_PLACEHOLDER_ICON,
    );
}

/// Thumbnail texture clipped to rounded corners, cropped to fill the square
pub fn paint_thumbnail(painter: &egui::Painter, rect: egui::Rect, texture: &egui::TextureHandle) {
    let uv = fill_uv(texture.size_vec2());
    let brush = egui::epaint::Brush {
        fill_texture_id: texture.id(),
        uv,
    };
    let mut shape = egui::epaint::RectShape::filled(
        rect,
        egui::CornerRadius::same(theme::RADIUS_THUMB as u8),
        egui::Color32::WHITE,
    );
    shape.brush = Some(std::sync::Arc::new(brush));
    painter.add(shape);
}

/// UV rect that crops the longer side so the image fills a square
fn fill_uv(size: egui::Vec2) -> egui::Rect {
    if size.x <= 0.0 || size.y <= 0.0 {
        return egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    }
    if size.x > size.y {
        let inset = (1.0 - size.y / size.x) / 2.0;
        egui::Rect::from_min_max(egui::pos2(inset, 0.0), egui::pos2(1.0 - inset, 1.0))
    } else {
        let inset = (1.0 - size.x / size.y) / 2.0;
        egui::Rect::from_min_max(egui::pos2(0.0, inset), egui::pos2(1.0, 1.0 - inset))
    }
}

/// Round icon button, e.g. the header's clear button. Returns the response.
pub fn round_icon_button(
    ui: &mut egui::Ui,
    icon: &str,
    size: f32,
    fill: egui::Color32,
    hover_fill: egui::Color32,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::click());
    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        let fill = if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            hover_fill
        } else {
            fill
        };
        painter.circle_filled(rect.center(), size / 2.0, fill);
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(size * 0.6),
            theme::TEXT_PRIMARY.gamma_multiply(0.8),
        );
    }
    response
}

/// Flat custom-painted button with hover/press feedback. Returns true if clicked.
pub fn painted_button(ui: &mut egui::Ui, label: &str, width: f32, base: egui::Color32) -> bool {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(width, 26.0), egui::Sense::click());
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    let (fill, draw_rect) = theme::button_visual(&response, base, rect);
    ui.painter().rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);
    ui.painter().text(
        draw_rect.center(),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(theme::FONT_SMALL),
        egui::Color32::WHITE,
    );
    response.clicked()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_fits_exactly() {
        let fit = ContainerFit::decide(240.0, 600.0);
        assert_eq!(fit, ContainerFit { height: 240.0, scrollable: false });
    }

    #[test]
    fn equal_height_does_not_scroll() {
        let fit = ContainerFit::decide(600.0, 600.0);
        assert!(!fit.scrollable);
        assert_eq!(fit.height, 600.0);
    }

    #[test]
    fn tall_content_is_capped_and_scrolls() {
        let fit = ContainerFit::decide(1200.0, 600.0);
        assert_eq!(fit, ContainerFit { height: 600.0, scrollable: true });
    }

    #[test]
    fn uv_crops_wide_images() {
        let uv = fill_uv(egui::vec2(200.0, 100.0));
        assert_eq!(uv.min, egui::pos2(0.25, 0.0));
        assert_eq!(uv.max, egui::pos2(0.75, 1.0));
    }

    #[test]
    fn uv_crops_tall_images() {
        let uv = fill_uv(egui::vec2(100.0, 400.0));
        assert_eq!(uv.min, egui::pos2(0.0, 0.375));
        assert_eq!(uv.max, egui::pos2(1.0, 0.625));
    }
}
