//! Tile Map
//!
//! The shared, immutable tile grid. Generated once per session and handed
//! to every player by `Arc`; there is no mutation path after construction.

use crate::core::vec2::{TilePos, TileRect};
use crate::game::terrain::{TerrainId, TerrainKind};

/// Half-width of the open square in the middle of a generated map.
pub const OPEN_HALF_EXTENT: i32 = 8;

/// Smallest map size whose open square fits inside the grid.
pub const MIN_MAP_SIZE: u32 = (2 * OPEN_HALF_EXTENT + 1) as u32;

/// Square grid of terrain ids, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    size: u32,
    cells: Vec<TerrainId>,
}

impl TileGrid {
    /// Generate the standard map: open floor in the centered square
    /// `[size/2 - 8, size/2 + 8]` on both axes, bush everywhere else.
    ///
    /// Deterministic for a given size. Sizes below `MIN_MAP_SIZE` still
    /// produce a grid, but the open square is clipped by the edges.
    pub fn generate(size: u32) -> Self {
        let open = Self::open_region_for(size);
        Self::from_fn(size, |tile| {
            if open.contains(tile) {
                TerrainId::FLOOR
            } else {
                TerrainId::BUSH
            }
        })
    }

    /// Build a grid by asking `terrain_at` for every cell.
    pub fn from_fn<F>(size: u32, mut terrain_at: F) -> Self
    where
        F: FnMut(TilePos) -> TerrainId,
    {
        let side = size as i32;
        let mut cells = Vec::with_capacity((size * size) as usize);
        for y in 0..side {
            for x in 0..side {
                cells.push(terrain_at(TilePos::new(x, y)));
            }
        }
        Self { size, cells }
    }

    fn open_region_for(size: u32) -> TileRect {
        let center = (size / 2) as i32;
        TileRect::new(
            TilePos::new(center - OPEN_HALF_EXTENT, center - OPEN_HALF_EXTENT),
            TilePos::new(center + OPEN_HALF_EXTENT, center + OPEN_HALF_EXTENT),
        )
    }

    /// Side length in tiles.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The whole grid as a rectangle.
    pub fn bounds(&self) -> TileRect {
        TileRect::square(self.size as i32)
    }

    /// The centered square a generated map leaves open.
    pub fn open_region(&self) -> TileRect {
        Self::open_region_for(self.size)
    }

    /// Check if a tile lies inside the grid.
    #[inline]
    pub fn contains(&self, tile: TilePos) -> bool {
        let side = self.size as i32;
        (0..side).contains(&tile.x) && (0..side).contains(&tile.y)
    }

    /// Terrain id at a tile, `None` outside the grid.
    pub fn terrain_id(&self, tile: TilePos) -> Option<TerrainId> {
        if !self.contains(tile) {
            return None;
        }
        let idx = tile.y as usize * self.size as usize + tile.x as usize;
        self.cells.get(idx).copied()
    }

    /// Terrain kind at a tile, `None` outside the grid.
    pub fn terrain(&self, tile: TilePos) -> Option<&'static TerrainKind> {
        self.terrain_id(tile).and_then(TerrainId::kind)
    }

    /// Check if a tile is inside the grid and can be entered.
    pub fn is_walkable(&self, tile: TilePos) -> bool {
        self.terrain(tile).is_some_and(|t| !t.is_impassable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_reference_size() {
        let grid = TileGrid::generate(22);
        assert_eq!(grid.size(), 22);
        assert!(grid.is_walkable(TilePos::new(3, 3)));
        assert!(!grid.is_walkable(TilePos::new(2, 2)));
        assert!(grid.is_walkable(TilePos::new(19, 19)));
        assert!(!grid.is_walkable(TilePos::new(20, 19)));
        assert_eq!(grid.terrain_id(TilePos::new(2, 2)), Some(TerrainId::BUSH));
        assert_eq!(
            grid.open_region(),
            TileRect::new(TilePos::new(3, 3), TilePos::new(19, 19))
        );
    }

    #[test]
    fn test_generate_counts_open_cells() {
        let grid = TileGrid::generate(22);
        let open = (0..22)
            .flat_map(|y| (0..22).map(move |x| TilePos::new(x, y)))
            .filter(|t| grid.is_walkable(*t))
            .count();
        assert_eq!(open, 17 * 17);
    }

    #[test]
    fn test_generate_is_deterministic() {
        assert_eq!(TileGrid::generate(30), TileGrid::generate(30));
    }

    #[test]
    fn test_out_of_bounds_lookup() {
        let grid = TileGrid::generate(22);
        assert!(grid.terrain_id(TilePos::new(-1, 5)).is_none());
        assert!(grid.terrain_id(TilePos::new(5, 22)).is_none());
        assert!(!grid.is_walkable(TilePos::new(22, 22)));
    }

    #[test]
    fn test_from_fn_places_cells_row_major() {
        let grid = TileGrid::from_fn(4, |t| {
            if t == TilePos::new(3, 1) { TerrainId::MUD } else { TerrainId::FLOOR }
        });
        assert_eq!(grid.terrain_id(TilePos::new(3, 1)), Some(TerrainId::MUD));
        assert_eq!(grid.terrain_id(TilePos::new(1, 3)), Some(TerrainId::FLOOR));
    }
}
