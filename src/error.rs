// src/error.rs
//! Error types for the minimap overlay

use std::fmt;

pub type Result<T> = std::result::Result<T, MinimapError>;

#[derive(Debug)]
pub enum MinimapError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Http(String),
    /// Tile is not cached, or its index lies outside the mosaic grid
    TileUnavailable(String),
    #[cfg(feature = "gui")]
    Gui(eframe::Error),
    Other(String),
}

impl fmt::Display for MinimapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinimapError::Io(e) => write!(f, "IO error: {}", e),
            MinimapError::Json(e) => write!(f, "JSON error: {}", e),
            MinimapError::Http(msg) => write!(f, "HTTP error: {}", msg),
            MinimapError::TileUnavailable(key) => write!(f, "Tile unavailable: {}", key),
            #[cfg(feature = "gui")]
            MinimapError::Gui(e) => write!(f, "GUI error: {}", e),
            MinimapError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for MinimapError {}

impl From<std::io::Error> for MinimapError {
    fn from(error: std::io::Error) -> Self {
        MinimapError::Io(error)
    }
}

impl From<serde_json::Error> for MinimapError {
    fn from(error: serde_json::Error) -> Self {
        MinimapError::Json(error)
    }
}

#[cfg(feature = "gui")]
impl From<eframe::Error> for MinimapError {
    fn from(error: eframe::Error) -> Self {
        MinimapError::Gui(error)
    }
}

impl From<anyhow::Error> for MinimapError {
    fn from(error: anyhow::Error) -> Self {
        MinimapError::Other(error.to_string())
    }
}
