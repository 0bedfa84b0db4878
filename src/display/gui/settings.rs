// src/display/gui/settings.rs v2
//! Settings UI bound to the overlay settings store

use crate::storage::{
    IconProperty, Interpolation, OverlaySettings, SettingsStore, ZOOM_LEVEL_BOUNDS,
};
use eframe::egui;

pub struct SettingsWindow {
    pub open: bool,
    settings: OverlaySettings,
    categories: Vec<String>,
    status_message: Option<String>,
}

impl SettingsWindow {
    pub fn new() -> Self {
        Self {
            open: false,
            settings: OverlaySettings::default(),
            categories: Vec::new(),
            status_message: None,
        }
    }

    /// Open the window editing a copy of the current settings
    pub fn open_with(&mut self, settings: OverlaySettings, categories: Vec<String>) {
        self.settings = settings;
        self.categories = categories;
        self.status_message = None;
        self.open = true;
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    /// Render the window. Returns true when settings were saved and the
    /// application should pick up the new values.
    pub fn show(&mut self, ctx: &egui::Context, store: &mut SettingsStore) -> bool {
        if !self.open {
            return false;
        }

        let mut settings_changed = false;

        let window = egui::Window::new("⚙ Settings")
            .collapsible(false)
            .resizable(true)
            .default_width(360.0);

        window.show(ctx, |ui| {
            ui.heading("Minimap");
            ui.separator();

            egui::Grid::new("minimap_settings")
                .num_columns(2)
                .spacing([10.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Zoom level:");
                    ui.add(egui::Slider::new(
                        &mut self.settings.zoom_level,
                        ZOOM_LEVEL_BOUNDS.0..=ZOOM_LEVEL_BOUNDS.1,
                    ));
                    ui.end_row();

                    ui.label("Town zoom level:");
                    ui.add(egui::Slider::new(
                        &mut self.settings.town_zoom_level,
                        ZOOM_LEVEL_BOUNDS.0..=ZOOM_LEVEL_BOUNDS.1,
                    ));
                    ui.end_row();

                    ui.label("Icon scale:");
                    ui.add(egui::Slider::new(&mut self.settings.icon_scale, 0.5..=3.0));
                    ui.end_row();

                    ui.label("Opacity:");
                    ui.add(egui::Slider::new(&mut self.settings.opacity, 0.1..=1.0));
                    ui.end_row();

                    ui.label("Interpolation:");
                    egui::ComboBox::from_id_source("interpolation")
                        .selected_text(self.settings.interpolation.display_name())
                        .show_ui(ui, |ui| {
                            for choice in Interpolation::ALL {
                                ui.selectable_value(
                                    &mut self.settings.interpolation,
                                    choice,
                                    choice.display_name(),
                                );
                            }
                        });
                    ui.end_row();
                });

            ui.checkbox(&mut self.settings.town_zoom, "Zoom in inside towns");
            ui.checkbox(&mut self.settings.compass_mode, "Compass mode");
            ui.checkbox(&mut self.settings.show_text, "Show marker labels");

            ui.add_space(10.0);
            ui.heading("Window");
            ui.separator();

            ui.checkbox(&mut self.settings.show_header, "Show header");
            ui.checkbox(&mut self.settings.show_toolbar, "Show toolbar");
            ui.checkbox(&mut self.settings.transparent_header, "Transparent header");
            ui.checkbox(&mut self.settings.transparent_toolbar, "Transparent toolbar");

            if !self.categories.is_empty() {
                ui.add_space(10.0);
                ui.heading("Icon categories");
                ui.separator();

                // Icon toggles write through immediately, like the rest of
                // the icon configuration
                for category in &self.categories {
                    let mut visible =
                        store.load_icon_configuration(category, None, IconProperty::Visible);
                    if ui.checkbox(&mut visible, category.as_str()).changed() {
                        if let Err(e) = store.store_icon_configuration(
                            category,
                            None,
                            IconProperty::Visible,
                            visible,
                        ) {
                            self.status_message = Some(format!("Error saving: {}", e));
                        } else {
                            settings_changed = true;
                        }
                    }
                }
            }

            ui.add_space(10.0);
            ui.separator();

            // Status message
            if let Some(ref msg) = self.status_message {
                ui.colored_label(egui::Color32::GREEN, msg);
                ui.add_space(5.0);
            }

            // Action buttons
            ui.horizontal(|ui| {
                if ui.button("💾 Save & Apply").clicked() {
                    match store.save_settings(&self.settings) {
                        Ok(_) => {
                            settings_changed = true;
                            self.status_message = Some("Settings saved successfully!".to_string());
                        }
                        Err(e) => {
                            self.status_message = Some(format!("Error saving: {}", e));
                        }
                    }
                }

                if ui.button("❌ Close").clicked() {
                    self.open = false;
                    self.status_message = None;
                }
            });
        });

        settings_changed
    }
}
