// src/config.rs v2
//! Process configuration: tile server, cache and settings locations

use crate::error::{MinimapError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Base URL the tile cache fetches from; `<base>/<x>/<y>.png`
    pub tile_url_base: String,
    /// Tile cache directory; defaults next to the config when unset
    pub cache_dir: Option<PathBuf>,
    /// Settings store file; defaults next to the config when unset
    pub settings_path: Option<PathBuf>,
    /// Marker (point-of-interest) JSON file to load at startup
    pub markers_file: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            tile_url_base: "https://tiles.minimap-overlay.dev/v1".to_string(),
            cache_dir: None,
            settings_path: None,
            markers_file: None,
        }
    }
}

impl OverlayConfig {
    /// Load configuration, falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .map_err(|e| MinimapError::Other(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| MinimapError::Other(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to the config file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MinimapError::Other(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| MinimapError::Other(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)
            .map_err(|e| MinimapError::Other(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get config file path
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Tile cache directory, honoring the config override
    pub fn effective_cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("tiles")),
        }
    }

    /// Settings store path, honoring the config override
    pub fn effective_settings_path(&self) -> Result<PathBuf> {
        match &self.settings_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("settings.json")),
        }
    }

    fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| MinimapError::Other("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home).join(".config").join("minimap-overlay"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OverlayConfig::default();
        assert!(config.tile_url_base.starts_with("https://"));
        assert!(config.cache_dir.is_none());
        assert!(config.markers_file.is_none());
    }

    #[test]
    fn test_cache_dir_override() {
        let mut config = OverlayConfig::default();
        config.cache_dir = Some(PathBuf::from("/tmp/minimap-tiles"));
        assert_eq!(
            config.effective_cache_dir().unwrap(),
            PathBuf::from("/tmp/minimap-tiles")
        );
    }
}
