// src/map/mod.rs v2
//! Tile coordinate transforms and tile image caching

mod tile_cache;
pub mod tiles;

pub use tile_cache::{CacheStats, TileCache};
pub use tiles::{
    required_tile_window, tile_cache_key, tile_cache_key_for_world, world_to_minimap_pixel,
    world_to_tile, PixelOffset, TileIndex, ViewportWindow, WorldPosition,
};
