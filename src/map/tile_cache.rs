// src/map/tile_cache.rs v2
//! Tile image downloading and caching with resource management

use crate::error::{MinimapError, Result};
use crate::map::tiles::{tile_cache_key, TileIndex};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct TileCache {
    cache_dir: PathBuf,
    tile_url_base: String,
    memory_cache: Arc<Mutex<HashMap<TileIndex, Arc<Vec<u8>>>>>,
    downloading: Arc<Mutex<HashSet<TileIndex>>>,
    max_memory_tiles: usize,
    max_concurrent_downloads: usize,
}

impl TileCache {
    pub fn new(cache_dir: PathBuf, tile_url_base: String) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .map_err(|e| MinimapError::Other(format!("Failed to create cache directory: {}", e)))?;

        Ok(Self {
            cache_dir,
            tile_url_base,
            memory_cache: Arc::new(Mutex::new(HashMap::new())),
            downloading: Arc::new(Mutex::new(HashSet::new())),
            max_memory_tiles: 128,
            max_concurrent_downloads: 4,
        })
    }

    /// Get tile bytes from cache. Out-of-grid indices are declined so the
    /// renderer can enumerate window edges freely.
    pub fn get_tile(&self, tile: TileIndex) -> Result<Arc<Vec<u8>>> {
        if !tile.in_grid() {
            return Err(MinimapError::TileUnavailable(tile_cache_key(tile)));
        }

        // Check memory cache first
        {
            let cache = self.memory_cache.lock().unwrap();
            if let Some(bytes) = cache.get(&tile) {
                return Ok(Arc::clone(bytes));
            }
        }

        // Check disk cache
        let path = self.get_tile_path(tile);
        if path.exists() {
            let bytes = std::fs::read(&path)
                .map_err(|e| MinimapError::Other(format!("Failed to read cached tile: {}", e)))?;
            let bytes = Arc::new(bytes);
            self.add_to_memory_cache(tile, Arc::clone(&bytes));
            return Ok(bytes);
        }

        // Not in cache, need to download
        Err(MinimapError::TileUnavailable(tile_cache_key(tile)))
    }

    /// Download tile in background (non-blocking) with concurrency limit.
    /// At most one in-flight fetch per tile, however often the render loop
    /// asks for it.
    pub fn download_tile_async(&self, tile: TileIndex) {
        if !tile.in_grid() {
            return;
        }

        {
            let mut downloading = self.downloading.lock().unwrap();

            // Limit concurrent downloads
            if downloading.len() >= self.max_concurrent_downloads {
                return;
            }

            if downloading.contains(&tile) {
                return;
            }

            downloading.insert(tile);
        }

        let cache_dir = self.cache_dir.clone();
        let url = self.tile_url(tile);
        let memory_cache = Arc::clone(&self.memory_cache);
        let downloading = Arc::clone(&self.downloading);
        let max_memory_tiles = self.max_memory_tiles;

        std::thread::spawn(move || {
            if let Ok(bytes) = Self::download_tile(&url) {
                // Save to disk
                let path = Self::tile_path(&cache_dir, tile);
                if let Some(parent) = path.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                let _ = std::fs::write(&path, &bytes);

                // Add to memory cache
                let bytes = Arc::new(bytes);
                let mut cache = memory_cache.lock().unwrap();

                // Limit memory cache size
                if cache.len() >= max_memory_tiles {
                    if let Some(first_key) = cache.keys().next().copied() {
                        cache.remove(&first_key);
                    }
                }

                cache.insert(tile, bytes);
            }

            // Remove from downloading set
            downloading.lock().unwrap().remove(&tile);
        });
    }

    /// Download one tile image from the tile server
    fn download_tile(url: &str) -> Result<Vec<u8>> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("MinimapOverlay/1.0 (Rust minimap overlay)")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| MinimapError::Http(format!("HTTP client error: {}", e)))?;

        let response = client
            .get(url)
            .send()
            .map_err(|e| MinimapError::Http(format!("Download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MinimapError::Http(format!("HTTP error: {}", response.status())));
        }

        let bytes = response
            .bytes()
            .map_err(|e| MinimapError::Http(format!("Failed to read response: {}", e)))?
            .to_vec();

        Ok(bytes)
    }

    fn get_tile_path(&self, tile: TileIndex) -> PathBuf {
        Self::tile_path(&self.cache_dir, tile)
    }

    /// Disk location of a tile, derived from its cache key
    fn tile_path(cache_dir: &PathBuf, tile: TileIndex) -> PathBuf {
        cache_dir.join(format!("{}.png", tile_cache_key(tile)))
    }

    fn tile_url(&self, tile: TileIndex) -> String {
        format!(
            "{}/{}.png",
            self.tile_url_base.trim_end_matches('/'),
            tile_cache_key(tile)
        )
    }

    fn add_to_memory_cache(&self, tile: TileIndex, bytes: Arc<Vec<u8>>) {
        let mut cache = self.memory_cache.lock().unwrap();

        // Simple LRU-like behavior: remove oldest if at capacity
        if cache.len() >= self.max_memory_tiles {
            if let Some(first_key) = cache.keys().next().copied() {
                cache.remove(&first_key);
            }
        }

        cache.insert(tile, bytes);
    }

    /// Clear memory cache
    pub fn clear_memory_cache(&self) {
        self.memory_cache.lock().unwrap().clear();
    }

    /// Get cache statistics
    pub fn get_stats(&self) -> CacheStats {
        let memory_count = self.memory_cache.lock().unwrap().len();

        // Count disk cache files recursively
        let mut disk_count = 0;
        let mut disk_size = 0u64;

        fn walk_dir(path: &PathBuf, count: &mut usize, size: &mut u64) {
            if let Ok(entries) = std::fs::read_dir(path) {
                for entry in entries.flatten() {
                    if let Ok(metadata) = entry.metadata() {
                        if metadata.is_file() {
                            *count += 1;
                            *size += metadata.len();
                        } else if metadata.is_dir() {
                            walk_dir(&entry.path(), count, size);
                        }
                    }
                }
            }
        }

        walk_dir(&self.cache_dir, &mut disk_count, &mut disk_size);

        CacheStats {
            memory_tiles: memory_count,
            disk_tiles: disk_count,
            disk_size_mb: disk_size as f64 / 1_048_576.0,
        }
    }

    /// Clear entire disk cache
    pub fn clear_disk_cache(&self) -> Result<()> {
        std::fs::remove_dir_all(&self.cache_dir)
            .map_err(|e| MinimapError::Other(format!("Failed to clear cache: {}", e)))?;
        std::fs::create_dir_all(&self.cache_dir)
            .map_err(|e| MinimapError::Other(format!("Failed to recreate cache directory: {}", e)))?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub memory_tiles: usize,
    pub disk_tiles: usize,
    pub disk_size_mb: f64,
}
