// src/map/tiles.rs v2
//! World-to-tile coordinate transforms for the pre-rendered map mosaic

use serde::{Deserialize, Serialize};

/// Width of the tile grid, in tiles.
pub const GRID_WIDTH: u32 = 224;
/// Height of the tile grid, in tiles.
pub const GRID_HEIGHT: u32 = 225;
/// Pixel width of a single tile.
pub const TILE_WIDTH: u32 = 256;
/// Pixel height of a single tile.
pub const TILE_HEIGHT: u32 = 256;
/// Width of the game world, in world units.
pub const GAME_MAP_WIDTH: f64 = 14336.0;
/// Height of the game world, in world units.
pub const GAME_MAP_HEIGHT: f64 = 14400.0;

/// Continuous in-game position. World Y grows northward, image Y grows
/// downward; the transforms below flip between the two.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f64,
    pub y: f64,
}

impl WorldPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Column/row of one tile in the mosaic grid. Out-of-range world positions
/// produce out-of-grid indices; the tile cache declines to serve those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    pub x: i32,
    pub y: i32,
}

impl TileIndex {
    /// Whether this index addresses a tile that actually exists in the grid.
    pub fn in_grid(&self) -> bool {
        self.x >= 0 && (self.x as u32) < GRID_WIDTH && self.y >= 0 && (self.y as u32) < GRID_HEIGHT
    }
}

/// Position of a world point in mosaic-window pixel space, relative to the
/// top-left of the rendered tile window. May fall outside the viewport for
/// off-screen markers; callers clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelOffset {
    pub x: i64,
    pub y: i64,
}

/// Tile counts per axis needed to cover a viewport. Both counts are odd so a
/// single tile sits centered on the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportWindow {
    pub x: u32,
    pub y: u32,
}

impl ViewportWindow {
    /// Tile indices covered by this window when centered on `center`,
    /// row-major from the top-left tile.
    pub fn tiles_around(&self, center: TileIndex) -> impl Iterator<Item = TileIndex> + '_ {
        let half_x = (self.x / 2) as i32;
        let half_y = (self.y / 2) as i32;
        (-half_y..=half_y).flat_map(move |dy| {
            (-half_x..=half_x).map(move |dx| TileIndex {
                x: center.x + dx,
                y: center.y + dy,
            })
        })
    }
}

/// Calculate which tile of the mosaic contains a world position.
///
/// Total over all inputs: NaN or out-of-range coordinates yield an
/// out-of-grid index rather than an error.
pub fn world_to_tile(world_pos: WorldPosition) -> TileIndex {
    let total_width = (GRID_WIDTH * TILE_WIDTH) as f64;
    let total_height = (GRID_HEIGHT * TILE_HEIGHT) as f64;

    let image_x = world_pos.x / GAME_MAP_WIDTH * total_width;
    let image_y = (GAME_MAP_HEIGHT - world_pos.y) / GAME_MAP_HEIGHT * total_height;

    let tile_x = (image_x / TILE_WIDTH as f64).floor() as i32;
    let tile_y = (image_y / TILE_HEIGHT as f64).floor() as i32;

    // The mosaic's origin tile sits one row below pixel row 0. Dropping the
    // -1 misaligns every marker against the tile images by a full tile.
    TileIndex {
        x: tile_x,
        y: tile_y - 1,
    }
}

/// Calculate the minimum odd tile window covering a viewport of the given
/// pixel size when centered on the player's tile.
///
/// The doubled-and-incremented form keeps the count odd and leaves enough
/// margin on both sides of center for viewports that are not tile multiples.
pub fn required_tile_window(screen_width: f32, screen_height: f32, angle: Option<f32>) -> ViewportWindow {
    let x = (screen_width / TILE_WIDTH as f32 / 2.0).ceil() as u32 * 2 + 1;
    let y = (screen_height / TILE_HEIGHT as f32 / 2.0).ceil() as u32 * 2 + 1;

    if angle.unwrap_or(0.0) != 0.0 {
        // TODO: widen the window for rotated viewports; a rotated
        // rectangle's bounding box spans more tiles than the
        // axis-aligned one.
    }

    ViewportWindow { x, y }
}

/// Calculate where a target world position should be drawn, in pixels,
/// relative to the top-left of the tile window centered on the player.
pub fn world_to_minimap_pixel(
    player_pos: WorldPosition,
    target_pos: WorldPosition,
    screen_width: f32,
    screen_height: f32,
) -> PixelOffset {
    let window = required_tile_window(screen_width, screen_height, None);
    let total_width = (GRID_WIDTH * TILE_WIDTH) as f64;
    let total_height = (GRID_HEIGHT * TILE_HEIGHT) as f64;
    let tile = world_to_tile(player_pos);

    let pixel_x = (target_pos.x / GAME_MAP_WIDTH * total_width).floor() as i64;
    let pixel_y = ((GAME_MAP_HEIGHT - target_pos.y) / GAME_MAP_HEIGHT * total_height).floor() as i64;

    // The +1 on Y mirrors the -1 calibration in world_to_tile; the two must
    // match exactly or markers drift against the mosaic.
    let image_x = pixel_x - (tile.x as i64 - (window.x / 2) as i64) * TILE_WIDTH as i64;
    let image_y = pixel_y - (tile.y as i64 - (window.y / 2) as i64 + 1) * TILE_HEIGHT as i64;

    PixelOffset {
        x: image_x,
        y: image_y,
    }
}

/// Cache key for a tile, shared by the cache writer and reader. Decimal
/// components around a fixed separator, so distinct indices never collide.
pub fn tile_cache_key(tile: TileIndex) -> String {
    format!("{}/{}", tile.x, tile.y)
}

/// Cache key of the tile containing a world position.
pub fn tile_cache_key_for_world(world_pos: WorldPosition) -> String {
    tile_cache_key(world_to_tile(world_pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_position_fixture() {
        // Documented default position; regression fixture
        let tile = world_to_tile(WorldPosition::new(7728.177, 1988.299));
        assert_eq!(tile, TileIndex { x: 120, y: 192 });
    }

    #[test]
    fn test_city_position_fixture() {
        let tile = world_to_tile(WorldPosition::new(8912.0, 5783.0));
        assert_eq!(tile, TileIndex { x: 139, y: 133 });
    }

    #[test]
    fn test_corner_positions() {
        let origin = world_to_tile(WorldPosition::new(0.0, 0.0));
        assert_eq!(origin, TileIndex { x: 0, y: 224 });

        let far = world_to_tile(WorldPosition::new(GAME_MAP_WIDTH, GAME_MAP_HEIGHT));
        assert_eq!(far, TileIndex { x: 224, y: -1 });
    }

    #[test]
    fn test_in_range_positions_stay_in_grid() {
        for ix in 0..64 {
            for iy in 0..64 {
                let pos = WorldPosition::new(
                    ix as f64 / 64.0 * (GAME_MAP_WIDTH - 1.0),
                    iy as f64 / 64.0 * (GAME_MAP_HEIGHT - 1.0),
                );
                let tile = world_to_tile(pos);
                assert!(tile.x >= 0 && (tile.x as u32) < GRID_WIDTH, "x out of grid for {:?}", pos);
                assert!(tile.y >= -1 && tile.y < GRID_HEIGHT as i32, "y out of grid for {:?}", pos);
            }
        }
    }

    #[test]
    fn test_monotonic_in_x_and_flipped_in_y() {
        let mut last_x = i32::MIN;
        for step in 0..200 {
            let x = step as f64 / 200.0 * GAME_MAP_WIDTH;
            let tile = world_to_tile(WorldPosition::new(x, 7000.0));
            assert!(tile.x >= last_x);
            last_x = tile.x;
        }

        let mut last_y = i32::MAX;
        for step in 0..200 {
            let y = step as f64 / 200.0 * GAME_MAP_HEIGHT;
            let tile = world_to_tile(WorldPosition::new(7000.0, y));
            assert!(tile.y <= last_y);
            last_y = tile.y;
        }
    }

    #[test]
    fn test_nan_does_not_panic() {
        let tile = world_to_tile(WorldPosition::new(f64::NAN, f64::NAN));
        assert!(!tile.in_grid());
        let _ = world_to_minimap_pixel(
            WorldPosition::new(f64::NAN, 0.0),
            WorldPosition::new(0.0, f64::NAN),
            1920.0,
            1080.0,
        );
    }

    #[test]
    fn test_window_sizes() {
        assert_eq!(required_tile_window(1920.0, 1080.0, None), ViewportWindow { x: 9, y: 7 });
        assert_eq!(required_tile_window(1024.0, 512.0, None), ViewportWindow { x: 5, y: 3 });
        assert_eq!(required_tile_window(1.0, 1.0, None), ViewportWindow { x: 3, y: 3 });
    }

    #[test]
    fn test_window_always_odd() {
        for w in [1u32, 255, 256, 257, 800, 1366, 1920, 3840] {
            for h in [1u32, 255, 256, 257, 600, 768, 1080, 2160] {
                let window = required_tile_window(w as f32, h as f32, None);
                assert_eq!(window.x % 2, 1);
                assert_eq!(window.y % 2, 1);
                assert!(window.x >= 1 && window.y >= 1);
            }
        }
    }

    #[test]
    fn test_window_ignores_angle_for_now() {
        let flat = required_tile_window(1920.0, 1080.0, None);
        let rotated = required_tile_window(1920.0, 1080.0, Some(0.7));
        assert_eq!(flat, rotated);
    }

    #[test]
    fn test_window_enumeration_is_centered() {
        let window = ViewportWindow { x: 3, y: 3 };
        let center = TileIndex { x: 10, y: 20 };
        let tiles: Vec<TileIndex> = window.tiles_around(center).collect();
        assert_eq!(tiles.len(), 9);
        assert_eq!(tiles[0], TileIndex { x: 9, y: 19 });
        assert_eq!(tiles[4], center);
        assert_eq!(tiles[8], TileIndex { x: 11, y: 21 });
    }

    #[test]
    fn test_player_lands_at_window_center() {
        // Self-placement: the window is centered on the player's tile, so
        // the player's own offset stays within half a tile of the window
        // center regardless of absolute position.
        for pos in [
            WorldPosition::new(7728.177, 1988.299),
            WorldPosition::new(100.0, 100.0),
            WorldPosition::new(14000.0, 14000.0),
            WorldPosition::new(8912.0, 5783.0),
        ] {
            let window = required_tile_window(1920.0, 1080.0, None);
            let center_x = (window.x * TILE_WIDTH / 2) as i64;
            let center_y = (window.y * TILE_HEIGHT / 2) as i64;

            let offset = world_to_minimap_pixel(pos, pos, 1920.0, 1080.0);
            assert!((offset.x - center_x).abs() <= (TILE_WIDTH / 2) as i64, "x off-center for {:?}", pos);
            assert!((offset.y - center_y).abs() <= (TILE_HEIGHT / 2) as i64, "y off-center for {:?}", pos);
        }
    }

    #[test]
    fn test_marker_offset_tracks_world_delta() {
        let player = WorldPosition::new(7728.177, 1988.299);
        let east = WorldPosition::new(player.x + 256.0 / 4.0, player.y);
        let north = WorldPosition::new(player.x, player.y + 256.0 / 4.0);

        let base = world_to_minimap_pixel(player, player, 1920.0, 1080.0);
        let east_px = world_to_minimap_pixel(player, east, 1920.0, 1080.0);
        let north_px = world_to_minimap_pixel(player, north, 1920.0, 1080.0);

        // One world unit is four mosaic pixels on both axes; north is up.
        assert_eq!(east_px.x - base.x, 256);
        assert_eq!(east_px.y, base.y);
        assert_eq!(north_px.y - base.y, -256);
        assert_eq!(north_px.x, base.x);
    }

    #[test]
    fn test_cache_key_unique_across_grid() {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        for x in 0..GRID_WIDTH as i32 {
            for y in -1..GRID_HEIGHT as i32 {
                let key = tile_cache_key(TileIndex { x, y });
                assert!(seen.insert(key), "duplicate key for ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_cache_key_deterministic() {
        let tile = TileIndex { x: 120, y: 192 };
        assert_eq!(tile_cache_key(tile), tile_cache_key(tile));
        assert_eq!(tile_cache_key(tile), "120/192");
        assert_eq!(
            tile_cache_key_for_world(WorldPosition::new(7728.177, 1988.299)),
            "120/192"
        );
    }
}
