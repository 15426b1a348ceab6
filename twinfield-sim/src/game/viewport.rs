//! Viewport Query
//!
//! A read-only snapshot of the tiles and objects around one player, in the
//! shape a renderer wants: a square window of `2r x 2r` tiles whose top-left
//! corner is `r` tiles up and left of the player's tile.

use serde::{Serialize, Deserialize};

use crate::core::vec2::{SubTilePos, TilePos, TileRect};
use crate::game::map::TileGrid;
use crate::game::objects::{GameObject, ObjectRegistry};
use crate::game::state::{PlayerState, ViewportId};
use crate::game::terrain::TerrainId;

/// Largest radius a viewport is built with.
pub const MAX_VIEWPORT_RADIUS: u32 = i16::MAX as u32;

/// Where the window is pinned to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportAnchor {
    /// Tile the player stands on
    pub tile: TilePos,
    /// Exact player position, for smooth scrolling within the tile
    pub position: SubTilePos,
}

/// Window of the shared world seen by one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Which player view this belongs to
    pub id: ViewportId,
    /// Radius in tiles
    pub radius: u32,
    /// Map tile at the window's top-left cell
    pub origin: TilePos,
    /// Row-major terrain, `None` off the map
    pub tiles: Vec<Option<TerrainId>>,
    /// Objects inside the window, in registry order
    pub objects: Vec<GameObject>,
    /// Player anchor
    pub anchor: ViewportAnchor,
}

impl Viewport {
    /// Snapshot the window around `player`.
    ///
    /// `radius` is clamped to `1 ..= min(grid size, MAX_VIEWPORT_RADIUS)`;
    /// the stored `radius` is the clamped value.
    pub fn build(grid: &TileGrid, registry: &ObjectRegistry, player: &PlayerState, radius: u32) -> Self {
        let radius = radius.clamp(1, grid.size().clamp(1, MAX_VIEWPORT_RADIUS));
        let r = radius as i32;
        let tile = player.tile();
        let origin = tile.offset(-r, -r);
        let side = 2 * r;

        let mut tiles = Vec::with_capacity(side as usize * side as usize);
        for dy in 0..side {
            for dx in 0..side {
                tiles.push(grid.terrain_id(origin.offset(dx, dy)));
            }
        }

        let window = TileRect::new(origin, origin.offset(side - 1, side - 1));
        let objects = registry.within(window);

        Self {
            id: player.viewport,
            radius,
            origin,
            tiles,
            objects,
            anchor: ViewportAnchor { tile, position: player.position() },
        }
    }

    /// Side length of the window in tiles.
    #[inline]
    pub fn side(&self) -> u32 {
        self.radius.saturating_mul(2)
    }

    /// Terrain at window cell `(col, row)`. `None` outside the window or off the map.
    pub fn cell(&self, col: u32, row: u32) -> Option<TerrainId> {
        let side = self.side();
        if col >= side || row >= side {
            return None;
        }
        (row as usize)
            .checked_mul(side as usize)
            .and_then(|offset| offset.checked_add(col as usize))
            .and_then(|idx| self.tiles.get(idx).copied())
            .flatten()
    }

    /// Terrain at map tile `tile` if it falls inside the window.
    pub fn terrain_at(&self, tile: TilePos) -> Option<TerrainId> {
        let col = i64::from(tile.x) - i64::from(self.origin.x);
        let row = i64::from(tile.y) - i64::from(self.origin.y);
        match (u32::try_from(col), u32::try_from(row)) {
            (Ok(col), Ok(row)) => self.cell(col, row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::objects::ObjectKind;

    fn player_at(tile: TilePos) -> PlayerState {
        PlayerState::new(ViewportId(1), tile.to_sub_tile())
    }

    #[test]
    fn test_window_shape() {
        let grid = TileGrid::generate(22);
        let registry = ObjectRegistry::new();
        let view = Viewport::build(&grid, &registry, &player_at(TilePos::new(10, 10)), 11);

        assert_eq!(view.side(), 22);
        assert_eq!(view.tiles.len(), 22 * 22);
        assert_eq!(view.origin, TilePos::new(-1, -1));
        assert_eq!(view.id, ViewportId(1));
        // Top-left cell is off the map
        assert_eq!(view.cell(0, 0), None);
        // Player's own tile sits at offset (r, r)
        assert_eq!(view.cell(11, 11), Some(TerrainId::FLOOR));
        assert_eq!(view.terrain_at(TilePos::new(2, 2)), Some(TerrainId::BUSH));
        assert_eq!(view.cell(22, 0), None);
    }

    #[test]
    fn test_window_is_asymmetric() {
        let grid = TileGrid::generate(22);
        let registry = ObjectRegistry::new();
        let view = Viewport::build(&grid, &registry, &player_at(TilePos::new(10, 10)), 2);

        // Offsets -2 ..= 1
        assert_eq!(view.origin, TilePos::new(8, 8));
        assert!(view.terrain_at(TilePos::new(8, 8)).is_some());
        assert!(view.terrain_at(TilePos::new(11, 11)).is_some());
        assert_eq!(view.terrain_at(TilePos::new(12, 10)), None);
        assert_eq!(view.terrain_at(TilePos::new(7, 10)), None);
    }

    #[test]
    fn test_objects_in_window_only() {
        let grid = TileGrid::generate(22);
        let mut registry = ObjectRegistry::new();
        registry.place(ObjectKind::Egg, TilePos::new(9, 9), false);
        registry.place(ObjectKind::Beer, TilePos::new(12, 10), false);
        let view = Viewport::build(&grid, &registry, &player_at(TilePos::new(10, 10)), 2);

        assert_eq!(view.objects, vec![GameObject::new(ObjectKind::Egg, TilePos::new(9, 9))]);
    }

    #[test]
    fn test_build_clamps_radius() {
        let grid = TileGrid::generate(22);
        let registry = ObjectRegistry::new();
        let player = player_at(TilePos::new(10, 10));

        let view = Viewport::build(&grid, &registry, &player, u32::MAX);
        assert_eq!(view.radius, 22);
        assert_eq!(view.tiles.len(), 44 * 44);
        assert_eq!(view.cell(0, 0), None);

        let view = Viewport::build(&grid, &registry, &player, 0);
        assert_eq!(view.radius, 1);
        assert_eq!(view.tiles.len(), 4);
    }

    #[test]
    fn test_mismatched_snapshot_does_not_panic() {
        let grid = TileGrid::generate(22);
        let registry = ObjectRegistry::new();
        let mut view = Viewport::build(&grid, &registry, &player_at(TilePos::new(10, 10)), 2);

        // A deserialized value may carry a radius that disagrees with its tiles
        view.radius = u32::MAX;
        assert_eq!(view.cell(100, 100), None);
        assert_eq!(view.terrain_at(TilePos::new(i32::MAX, i32::MIN)), None);

        view.tiles.truncate(3);
        view.radius = 2;
        assert_eq!(view.cell(3, 3), None);
        assert_eq!(view.cell(1, 0), Some(TerrainId::FLOOR));
    }

    #[test]
    fn test_anchor_tracks_sub_tile_position() {
        let grid = TileGrid::generate(22);
        let registry = ObjectRegistry::new();
        let player = PlayerState::new(ViewportId(0), SubTilePos::new(184, 160));
        let view = Viewport::build(&grid, &registry, &player, 3);

        assert_eq!(view.anchor.tile, TilePos::new(11, 10));
        assert_eq!(view.anchor.position, SubTilePos::new(184, 160));
        assert_eq!(view.origin, TilePos::new(8, 7));
    }
}
