// src/marker.rs v1
//! Point-of-interest markers rendered on the minimap

use crate::error::{MinimapError, Result};
use crate::map::WorldPosition;
use crate::storage::{IconProperty, SettingsStore};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub position: WorldPosition,
}

impl Marker {
    /// Whether the icon settings show this marker: its category must be
    /// enabled, and its type too when it has one.
    pub fn is_visible(&self, store: &SettingsStore) -> bool {
        if !store.load_icon_configuration(&self.category, None, IconProperty::Visible) {
            return false;
        }

        match &self.kind {
            Some(kind) => store.load_icon_configuration(&self.category, Some(kind), IconProperty::Visible),
            None => true,
        }
    }

    pub fn show_label(&self, store: &SettingsStore) -> bool {
        store.load_icon_configuration(&self.category, self.kind.as_deref(), IconProperty::ShowLabel)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MinimapError::Other(format!("Failed to read marker file: {}", e)))?;

        let set: Self = serde_json::from_str(&contents)?;
        Ok(set)
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Markers the current icon settings allow on screen
    pub fn visible_markers<'a>(
        &'a self,
        store: &'a SettingsStore,
    ) -> impl Iterator<Item = &'a Marker> {
        self.markers.iter().filter(move |m| m.is_visible(store))
    }

    /// Distinct categories present in the set, for the settings UI toggles
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.markers.iter().map(|m| m.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }
}
