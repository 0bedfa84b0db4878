// src/display/gui/app.rs v2
//! Main GUI application structure and eframe::App implementation

use crate::config::OverlayConfig;
use crate::error::Result;
use crate::map::tiles::{GAME_MAP_WIDTH, GRID_WIDTH, TILE_WIDTH};
use crate::map::{TileCache, WorldPosition};
use crate::marker::MarkerSet;
use crate::storage::{OverlaySettings, SettingsStore, StorageScope, ZOOM_LEVEL_BOUNDS};
use eframe::egui;
use std::time::Duration;

use super::minimap::MinimapView;
use super::settings::SettingsWindow;

pub struct OverlayApp {
    settings_store: SettingsStore,
    settings: OverlaySettings,
    player_position: WorldPosition,
    minimap: MinimapView,
    settings_window: SettingsWindow,
    markers: MarkerSet,
}

impl OverlayApp {
    pub fn new(config: OverlayConfig) -> Result<Self> {
        let settings_store =
            SettingsStore::open(config.effective_settings_path()?, StorageScope::InGame)?;
        let settings = settings_store.load_settings();
        let player_position = settings.last_known_position;

        let tile_cache =
            TileCache::new(config.effective_cache_dir()?, config.tile_url_base.clone())?;

        let markers = match &config.markers_file {
            Some(path) => MarkerSet::load_from_file(path)?,
            None => MarkerSet::new(),
        };

        Ok(Self {
            settings_store,
            settings,
            player_position,
            minimap: MinimapView::new(tile_cache),
            settings_window: SettingsWindow::new(),
            markers,
        })
    }

    /// Shift the view by a screen-space drag, in world units.
    fn pan(&mut self, delta: egui::Vec2) {
        let zoom = self.settings.zoom_level.clamp(ZOOM_LEVEL_BOUNDS.0, ZOOM_LEVEL_BOUNDS.1);
        let pixels_per_unit = (GRID_WIDTH * TILE_WIDTH) as f32 / GAME_MAP_WIDTH as f32;
        let units_per_pixel = 1.0 / (pixels_per_unit * zoom);

        // World Y grows northward, screen Y grows downward
        self.player_position.x -= (delta.x * units_per_pixel) as f64;
        self.player_position.y += (delta.y * units_per_pixel) as f64;
    }

    fn persist_position(&mut self) {
        self.settings.last_known_position = self.player_position;
        if let Err(e) = self.settings_store.save_settings(&self.settings) {
            eprintln!("Failed to persist position: {}", e);
        }
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep redrawing while tiles stream in
        ctx.request_repaint_after(Duration::from_millis(100));

        if self.settings.show_header {
            let mut panel = egui::TopBottomPanel::top("header");
            if self.settings.transparent_header {
                panel = panel.frame(egui::Frame::none());
            }

            panel.show(ctx, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.heading("🧭 Minimap");
                    ui.separator();
                    ui.label(format!(
                        "{:.3}, {:.3}",
                        self.player_position.x, self.player_position.y
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("❌ Exit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                        if ui.button("⚙ Settings").clicked() {
                            self.settings_window
                                .open_with(self.settings.clone(), self.markers.categories());
                        }
                    });
                });
            });
        }

        if self.settings.show_toolbar {
            let mut panel = egui::TopBottomPanel::bottom("toolbar");
            if self.settings.transparent_toolbar {
                panel = panel.frame(egui::Frame::none());
            }

            panel.show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let stats = self.minimap.cache_stats();
                    ui.label(format!(
                        "Cache: {} tiles ({:.1} MB)",
                        stats.disk_tiles, stats.disk_size_mb
                    ));

                    if ui.button("🗑 Clear Cache").clicked() {
                        self.minimap.clear_cache();
                    }

                    ui.separator();
                    ui.label(format!("Markers: {}", self.markers.marker_count()));
                });
            });
        }

        if self.settings_window.show(ctx, &mut self.settings_store) {
            self.settings = self.settings_window.settings().clone();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) = ui.allocate_painter(available_size, egui::Sense::drag());

            if response.dragged() {
                self.pan(response.drag_delta());
            }
            if response.drag_stopped() {
                self.persist_position();
            }

            self.minimap.render(
                ctx,
                &painter,
                response.rect,
                self.player_position,
                &self.markers,
                &self.settings_store,
                &self.settings,
            );
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.persist_position();
    }
}
