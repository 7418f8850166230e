//! Tile math helpers reusable by systems.
//!
//! World positions are continuous; gameplay rules are quantized to a square
//! tile grid. Distance is Chebyshev (king-move): one tile diagonally counts
//! the same as one tile straight.

use glam::Vec3;

/// World units per tile edge.
pub const TILE_SIZE_M: f32 = 1.0;

/// Discrete grid cell on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub col: i32,
    pub row: i32,
}

/// Floor-division mapping from a world position to its tile. Many-to-one
/// and deterministic: positions inside the same cell always map identically.
#[inline]
pub fn world_to_tile(pos: Vec3) -> TileCoord {
    TileCoord {
        col: (pos.x / TILE_SIZE_M).floor() as i32,
        row: (pos.z / TILE_SIZE_M).floor() as i32,
    }
}

/// `max(|Δcol|, |Δrow|)`: 8-directional adjacency distance.
#[inline]
pub fn chebyshev(a: TileCoord, b: TileCoord) -> i32 {
    (a.col - b.col).abs().max((a.row - b.row).abs())
}

/// True iff the tile Chebyshev distance between two world positions is at
/// most `radius_tiles`.
#[inline]
pub fn within_range(a: Vec3, b: Vec3, radius_tiles: i32) -> bool {
    chebyshev(world_to_tile(a), world_to_tile(b)) <= radius_tiles
}
