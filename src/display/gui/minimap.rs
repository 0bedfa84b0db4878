// src/display/gui/minimap.rs v1
//! Minimap painter: tile mosaic, player marker, and points of interest

use crate::map::tiles::{
    required_tile_window, tile_cache_key, world_to_minimap_pixel, world_to_tile, PixelOffset,
    TileIndex, WorldPosition, TILE_HEIGHT, TILE_WIDTH,
};
use crate::map::TileCache;
use crate::marker::MarkerSet;
use crate::storage::{OverlaySettings, SettingsStore, ZOOM_LEVEL_BOUNDS};
use eframe::egui;
use std::collections::HashMap;

pub struct MinimapView {
    tile_cache: TileCache,
    loaded_tiles: HashMap<TileIndex, egui::TextureHandle>,
}

impl MinimapView {
    pub fn new(tile_cache: TileCache) -> Self {
        Self {
            tile_cache,
            loaded_tiles: HashMap::new(),
        }
    }

    pub fn render(
        &mut self,
        ctx: &egui::Context,
        painter: &egui::Painter,
        rect: egui::Rect,
        player: WorldPosition,
        markers: &MarkerSet,
        store: &SettingsStore,
        settings: &OverlaySettings,
    ) {
        let painter = painter.with_clip_rect(rect);
        let zoom = settings.zoom_level.clamp(ZOOM_LEVEL_BOUNDS.0, ZOOM_LEVEL_BOUNDS.1);

        // The window is computed against the unscaled view so zooming in
        // shrinks the set of tiles that must be resident
        let view_width = rect.width() / zoom;
        let view_height = rect.height() / zoom;

        let center_tile = world_to_tile(player);
        let window = required_tile_window(view_width, view_height, None);
        let player_offset = world_to_minimap_pixel(player, player, view_width, view_height);

        let to_screen = |offset: PixelOffset| -> egui::Pos2 {
            egui::pos2(
                rect.center().x + (offset.x - player_offset.x) as f32 * zoom,
                rect.center().y + (offset.y - player_offset.y) as f32 * zoom,
            )
        };

        let tint = egui::Color32::WHITE.gamma_multiply(settings.opacity);
        let tile_size = egui::vec2(TILE_WIDTH as f32 * zoom, TILE_HEIGHT as f32 * zoom);
        let half_x = (window.x / 2) as i32;
        let half_y = (window.y / 2) as i32;

        for tile in window.tiles_around(center_tile) {
            let col = tile.x - (center_tile.x - half_x);
            let row = tile.y - (center_tile.y - half_y);
            let origin = PixelOffset {
                x: col as i64 * TILE_WIDTH as i64,
                y: row as i64 * TILE_HEIGHT as i64,
            };
            self.render_tile(ctx, &painter, tile, to_screen(origin), tile_size, tint);
        }

        // Points of interest allowed by the icon settings
        let icon_radius = 4.0 * settings.icon_scale;
        for marker in markers.visible_markers(store) {
            let offset = world_to_minimap_pixel(player, marker.position, view_width, view_height);
            let pos = to_screen(offset);
            if !rect.contains(pos) {
                continue;
            }

            painter.circle_filled(pos, icon_radius, egui::Color32::RED);
            painter.circle_stroke(pos, icon_radius, egui::Stroke::new(1.5, egui::Color32::WHITE));

            if settings.show_text || marker.show_label(store) {
                painter.text(
                    pos + egui::vec2(icon_radius + 4.0, -icon_radius - 4.0),
                    egui::Align2::LEFT_BOTTOM,
                    &marker.name,
                    egui::FontId::proportional(12.0),
                    egui::Color32::WHITE,
                );
            }
        }

        // Player sits at the viewport center by construction
        let player_pos = to_screen(player_offset);
        painter.circle_filled(player_pos, 6.0, egui::Color32::from_rgb(0, 122, 255));
        painter.circle_stroke(player_pos, 6.0, egui::Stroke::new(2.0, egui::Color32::WHITE));
    }

    fn render_tile(
        &mut self,
        ctx: &egui::Context,
        painter: &egui::Painter,
        tile: TileIndex,
        screen_pos: egui::Pos2,
        size: egui::Vec2,
        tint: egui::Color32,
    ) {
        let rect = egui::Rect::from_min_size(screen_pos, size);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

        // Check if we already have this tile as a texture
        if let Some(texture) = self.loaded_tiles.get(&tile) {
            painter.image(texture.id(), rect, uv, tint);
            return;
        }

        // Try to get tile from cache
        match self.tile_cache.get_tile(tile) {
            Ok(tile_data) => {
                if let Ok(image) = image::load_from_memory(&tile_data) {
                    let dimensions = [image.width() as usize, image.height() as usize];
                    let rgba = image.to_rgba8();
                    let pixels = rgba.as_flat_samples();

                    let color_image =
                        egui::ColorImage::from_rgba_unmultiplied(dimensions, pixels.as_slice());

                    let texture = ctx.load_texture(
                        format!("tile_{}", tile_cache_key(tile)),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );

                    painter.image(texture.id(), rect, uv, tint);
                    self.loaded_tiles.insert(tile, texture);
                }
            }
            Err(_) => {
                if tile.in_grid() {
                    // Tile not cached yet; queue it and draw a placeholder
                    self.tile_cache.download_tile_async(tile);
                    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(40));
                } else {
                    // Off the edge of the mosaic
                    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(12));
                }
            }
        }
    }

    pub fn cache_stats(&self) -> crate::map::CacheStats {
        self.tile_cache.get_stats()
    }

    /// Drop every cached tile: textures, memory cache, and disk cache
    pub fn clear_cache(&mut self) {
        let _ = self.tile_cache.clear_disk_cache();
        self.tile_cache.clear_memory_cache();
        self.loaded_tiles.clear();
    }
}
