//! Thumbnail loading

use super::App;
use eframe::egui;
use tracing::debug;

impl App {
    /// Texture for a record's image, or None when the placeholder should be shown.
    /// Failed loads are cached too, so a missing file is only probed once per record set.
    pub fn load_thumbnail(
        &mut self,
        ctx: &egui::Context,
        image_path: &str,
    ) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.thumbnail_cache.get(image_path) {
            return cached.clone();
        }

        let path = self.store.paths().image_file(image_path);
        let texture = match image::open(&path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = rgba.into_raw();
                Some(ctx.load_texture(
                    format!("thumb_{}", image_path),
                    egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                    egui::TextureOptions::LINEAR,
                ))
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Thumbnail unavailable");
                None
            }
        };

        self.thumbnail_cache
            .insert(image_path.to_string(), texture.clone());
        texture
    }
}
