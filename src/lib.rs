// src/lib.rs
//! Minimap Overlay Library
//!
//! A game-overlay minimap: world-to-tile coordinate transforms, a tile image
//! cache, scoped settings persistence, and an egui front-end.

pub mod config;
pub mod display;
pub mod error;
pub mod map;
pub mod marker;
pub mod storage;

// Re-export main types for convenience
pub use config::OverlayConfig;
pub use error::{MinimapError, Result};
pub use map::{
    required_tile_window, tile_cache_key, tile_cache_key_for_world, world_to_minimap_pixel,
    world_to_tile, PixelOffset, TileCache, TileIndex, ViewportWindow, WorldPosition,
};
pub use marker::{Marker, MarkerSet};
pub use storage::{OverlaySettings, SettingsStore, StorageScope};

#[cfg(feature = "gui")]
pub use display::gui::OverlayApp;
