// src/storage.rs v2
//! Persistent overlay settings with window and icon-category scoping

use crate::error::Result;
use crate::map::WorldPosition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Separator between a scope and the setting identifier.
pub const SCOPE_SEPARATOR: &str = "::";
/// Separator between an icon category and its type inside a key.
pub const ICON_CATEGORY_TYPE_SEPARATOR: &str = "--";

const DEFAULT_HIDDEN_ICON_CATEGORIES: &[&str] = &["npc", "pois"];

/// Allowed zoom level range for the zoom slider.
pub const ZOOM_LEVEL_BOUNDS: (f32, f32) = (0.5, 7.0);

/// Settings stored per window rather than globally. Keys not listed here are
/// shared by every window.
pub const SCOPED_SETTINGS: &[&str] = &[
    "iconScale",
    "showHeader",
    "showText",
    "showToolbar",
    "transparentHeader",
    "transparentToolbar",
    "zoomLevel",
    "townZoomLevel",
    "townZoom",
    "interpolation",
    "lastKnownPosition",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    #[serde(rename = "cosine-interpolation")]
    CosineInterpolation,
    #[serde(rename = "linear-interpolation")]
    LinearInterpolation,
    #[serde(rename = "cosine-extrapolation")]
    CosineExtrapolation,
    #[serde(rename = "linear-extrapolation")]
    LinearExtrapolation,
    #[serde(rename = "none")]
    None,
}

impl Interpolation {
    pub const ALL: [Interpolation; 5] = [
        Interpolation::CosineInterpolation,
        Interpolation::LinearInterpolation,
        Interpolation::CosineExtrapolation,
        Interpolation::LinearExtrapolation,
        Interpolation::None,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Interpolation::CosineInterpolation => "Cosine interpolation",
            Interpolation::LinearInterpolation => "Linear interpolation",
            Interpolation::CosineExtrapolation => "Cosine extrapolation",
            Interpolation::LinearExtrapolation => "Linear extrapolation",
            Interpolation::None => "None",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlaySettings {
    pub show_header: bool,
    pub show_toolbar: bool,
    pub transparent_header: bool,
    pub transparent_toolbar: bool,
    pub show_text: bool,
    pub icon_scale: f32,
    pub zoom_level: f32,
    pub opacity: f32,
    pub shape: String,
    pub compass_mode: bool,
    pub town_zoom_level: f32,
    pub town_zoom: bool,
    pub interpolation: Interpolation,
    pub last_known_position: WorldPosition,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            show_header: true,
            show_toolbar: false,
            transparent_header: true,
            transparent_toolbar: true,
            show_text: false,
            icon_scale: 1.5,
            zoom_level: 2.0,
            opacity: 1.0,
            shape: "none".to_string(),
            compass_mode: true,
            town_zoom_level: 1.0,
            town_zoom: true,
            interpolation: Interpolation::CosineInterpolation,
            last_known_position: WorldPosition::new(7728.177, 1988.299),
        }
    }
}

/// Scopes a storage key may carry: one per overlay window, plus the icon
/// configuration namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    Desktop,
    Icon,
    InGame,
}

impl StorageScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageScope::Desktop => "desktop",
            StorageScope::Icon => "icon",
            StorageScope::InGame => "inGame",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "desktop" => Some(StorageScope::Desktop),
            "icon" => Some(StorageScope::Icon),
            "inGame" => Some(StorageScope::InGame),
            _ => None,
        }
    }
}

/// Prefix a setting identifier with a scope.
pub fn scoped_key(scope: StorageScope, key: &str) -> String {
    format!("{}{}{}", scope.as_str(), SCOPE_SEPARATOR, key)
}

/// Split a storage key into its scope (if it exists and is known) and the
/// rest of the key, called the identifier.
pub fn storage_key_scope(key: &str) -> (Option<StorageScope>, &str) {
    match key.split_once(SCOPE_SEPARATOR) {
        Some((scope, identifier)) => match StorageScope::parse(scope) {
            Some(scope) => (Some(scope), identifier),
            None => (None, key),
        },
        None => (None, key),
    }
}

/// Per-icon configuration properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconProperty {
    Visible,
    ShowLabel,
}

impl IconProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconProperty::Visible => "visible",
            IconProperty::ShowLabel => "showLabel",
        }
    }
}

/// Storage key for an icon setting, optionally narrowed to a type within the
/// category.
pub fn icon_setting_key(category: &str, kind: Option<&str>, property: IconProperty) -> String {
    match kind {
        Some(kind) => format!(
            "{}{}{}{}{}.{}",
            StorageScope::Icon.as_str(),
            SCOPE_SEPARATOR,
            category,
            ICON_CATEGORY_TYPE_SEPARATOR,
            kind,
            property.as_str()
        ),
        None => format!(
            "{}{}{}.{}",
            StorageScope::Icon.as_str(),
            SCOPE_SEPARATOR,
            category,
            property.as_str()
        ),
    }
}

/// Category, optional type, and property parsed back out of an icon setting
/// identifier (the key without its scope).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconKeyParts {
    pub category: String,
    pub kind: Option<String>,
    pub property: String,
}

/// Obtain the category (and optionally, type) of an icon setting identifier.
/// Returns None for identifiers that do not follow the icon key layout.
pub fn deconstruct_icon_key(identifier: &str) -> Option<IconKeyParts> {
    let segments: Vec<&str> = identifier.split('.').collect();
    if segments.len() != 2 {
        return None;
    }

    let category_and_kind: Vec<&str> = segments[0].split(ICON_CATEGORY_TYPE_SEPARATOR).collect();
    if category_and_kind.is_empty() || category_and_kind.len() > 2 {
        return None;
    }

    Some(IconKeyParts {
        category: category_and_kind[0].to_string(),
        kind: category_and_kind.get(1).map(|s| s.to_string()),
        property: segments[1].to_string(),
    })
}

fn default_icon_configuration_value(category: &str, kind: Option<&str>, property: IconProperty) -> bool {
    if property == IconProperty::ShowLabel {
        return false;
    }

    if kind.is_none() {
        return !DEFAULT_HIDDEN_ICON_CATEGORIES.contains(&category);
    }

    true
}

/// Flat key/value settings store persisted as a single JSON object file.
/// Scoped settings get this window's scope prefixed onto their keys.
pub struct SettingsStore {
    path: PathBuf,
    window: StorageScope,
    values: HashMap<String, Value>,
}

impl SettingsStore {
    pub fn open(path: PathBuf, window: StorageScope) -> Result<Self> {
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            window,
            values,
        })
    }

    fn storage_key(&self, key: &str) -> String {
        if SCOPED_SETTINGS.contains(&key) {
            scoped_key(self.window, key)
        } else {
            key.to_string()
        }
    }

    /// Store a single setting value under its (possibly scoped) key.
    pub fn store_value(&mut self, key: &str, value: Value) {
        let storage_key = self.storage_key(key);
        self.values.insert(storage_key, value);
    }

    /// Load a single setting value, or None when it was never stored.
    pub fn load_value(&self, key: &str) -> Option<&Value> {
        self.values.get(&self.storage_key(key))
    }

    /// Load the typed settings for this window, falling back to defaults for
    /// keys that were never stored.
    pub fn load_settings(&self) -> OverlaySettings {
        let defaults = OverlaySettings::default();
        let mut object = match serde_json::to_value(&defaults) {
            Ok(Value::Object(object)) => object,
            _ => return defaults,
        };

        for (field, slot) in object.iter_mut() {
            if let Some(stored) = self.load_value(field) {
                *slot = stored.clone();
            }
        }

        serde_json::from_value(Value::Object(object)).unwrap_or(defaults)
    }

    /// Store the typed settings for this window, one key per field, and
    /// persist to disk.
    pub fn save_settings(&mut self, settings: &OverlaySettings) -> Result<()> {
        if let Value::Object(object) = serde_json::to_value(settings)? {
            for (field, value) in object {
                let storage_key = self.storage_key(&field);
                self.values.insert(storage_key, value);
            }
        }

        self.flush()
    }

    /// Store an icon visibility/label flag for a category or a type within it.
    pub fn store_icon_configuration(
        &mut self,
        category: &str,
        kind: Option<&str>,
        property: IconProperty,
        value: bool,
    ) -> Result<()> {
        let key = icon_setting_key(category, kind, property);
        self.values.insert(key, Value::Bool(value));
        self.flush()
    }

    /// Load an icon flag, falling back to the category defaults.
    pub fn load_icon_configuration(
        &self,
        category: &str,
        kind: Option<&str>,
        property: IconProperty,
    ) -> bool {
        let key = icon_setting_key(category, kind, property);
        match self.values.get(&key).and_then(Value::as_bool) {
            Some(value) => value,
            None => default_icon_configuration_value(category, kind, property),
        }
    }

    /// Write the full key/value map back to disk.
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, contents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> SettingsStore {
        SettingsStore {
            path: std::env::temp_dir().join(format!(
                "minimap-overlay-settings-{}.json",
                std::process::id()
            )),
            window: StorageScope::InGame,
            values: HashMap::new(),
        }
    }

    #[test]
    fn test_scoped_key_roundtrip() {
        let key = scoped_key(StorageScope::InGame, "zoomLevel");
        assert_eq!(key, "inGame::zoomLevel");

        let (scope, identifier) = storage_key_scope(&key);
        assert_eq!(scope, Some(StorageScope::InGame));
        assert_eq!(identifier, "zoomLevel");
    }

    #[test]
    fn test_unknown_scope_left_intact() {
        let (scope, identifier) = storage_key_scope("mystery::zoomLevel");
        assert_eq!(scope, None);
        assert_eq!(identifier, "mystery::zoomLevel");

        let (scope, identifier) = storage_key_scope("opacity");
        assert_eq!(scope, None);
        assert_eq!(identifier, "opacity");
    }

    #[test]
    fn test_icon_setting_keys() {
        assert_eq!(
            icon_setting_key("towns", None, IconProperty::Visible),
            "icon::towns.visible"
        );
        assert_eq!(
            icon_setting_key("ores", Some("iron"), IconProperty::ShowLabel),
            "icon::ores--iron.showLabel"
        );
    }

    #[test]
    fn test_deconstruct_icon_key() {
        let parts = deconstruct_icon_key("ores--iron.visible").unwrap();
        assert_eq!(parts.category, "ores");
        assert_eq!(parts.kind.as_deref(), Some("iron"));
        assert_eq!(parts.property, "visible");

        let parts = deconstruct_icon_key("towns.showLabel").unwrap();
        assert_eq!(parts.category, "towns");
        assert_eq!(parts.kind, None);

        assert!(deconstruct_icon_key("no-property").is_none());
        assert!(deconstruct_icon_key("too.many.dots").is_none());
        assert!(deconstruct_icon_key("a--b--c.visible").is_none());
    }

    #[test]
    fn test_icon_configuration_defaults() {
        let store = memory_store();

        // Labels default off everywhere
        assert!(!store.load_icon_configuration("towns", None, IconProperty::ShowLabel));

        // Hidden-by-default categories, visible otherwise
        assert!(!store.load_icon_configuration("npc", None, IconProperty::Visible));
        assert!(!store.load_icon_configuration("pois", None, IconProperty::Visible));
        assert!(store.load_icon_configuration("towns", None, IconProperty::Visible));

        // Typed entries default visible even in hidden categories
        assert!(store.load_icon_configuration("npc", Some("vendor"), IconProperty::Visible));
    }

    #[test]
    fn test_icon_configuration_store_overrides_default() {
        let mut store = memory_store();
        store
            .store_icon_configuration("towns", None, IconProperty::Visible, false)
            .unwrap();
        assert!(!store.load_icon_configuration("towns", None, IconProperty::Visible));

        let _ = std::fs::remove_file(&store.path);
    }

    #[test]
    fn test_settings_scope_applied_to_keys() {
        let mut store = memory_store();
        let mut settings = OverlaySettings::default();
        settings.zoom_level = 3.5;
        settings.opacity = 0.8;
        store.save_settings(&settings).unwrap();

        // zoomLevel is scoped to the window, opacity is not
        assert!(store.values.contains_key("inGame::zoomLevel"));
        assert!(store.values.contains_key("opacity"));
        assert!(!store.values.contains_key("zoomLevel"));

        let _ = std::fs::remove_file(&store.path);
    }

    #[test]
    fn test_settings_roundtrip_through_file() {
        let path = std::env::temp_dir().join(format!(
            "minimap-overlay-roundtrip-{}.json",
            std::process::id()
        ));

        let mut settings = OverlaySettings::default();
        settings.zoom_level = 4.25;
        settings.opacity = 0.75;
        settings.compass_mode = false;
        settings.interpolation = Interpolation::LinearExtrapolation;
        settings.last_known_position = WorldPosition::new(8912.0, 5783.0);

        {
            let mut store = SettingsStore::open(path.clone(), StorageScope::InGame).unwrap();
            store.save_settings(&settings).unwrap();
        }

        let store = SettingsStore::open(path.clone(), StorageScope::InGame).unwrap();
        assert_eq!(store.load_settings(), settings);

        // A different window scope sees its own defaults for scoped settings
        let desktop = SettingsStore::open(path.clone(), StorageScope::Desktop).unwrap();
        let desktop_settings = desktop.load_settings();
        assert_eq!(desktop_settings.zoom_level, OverlaySettings::default().zoom_level);
        // ...but shares unscoped ones
        assert_eq!(desktop_settings.opacity, settings.opacity);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let defaults = OverlaySettings::default();
        assert!(defaults.show_header);
        assert!(!defaults.show_toolbar);
        assert_eq!(defaults.icon_scale, 1.5);
        assert_eq!(defaults.zoom_level, 2.0);
        assert_eq!(defaults.interpolation, Interpolation::CosineInterpolation);
        assert_eq!(defaults.last_known_position, WorldPosition::new(7728.177, 1988.299));
        assert!(defaults.zoom_level >= ZOOM_LEVEL_BOUNDS.0 && defaults.zoom_level <= ZOOM_LEVEL_BOUNDS.1);
    }
}
