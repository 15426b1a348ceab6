//! Terrain Catalog
//!
//! Static table of tile kinds. Friction scales how much of a step is taken
//! when moving onto a tile; friction of 1.0 or more blocks movement.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, to_float};

/// Index into the terrain catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TerrainId(pub u8);

impl TerrainId {
    /// Walkable floor
    pub const FLOOR: Self = Self(0);
    /// Half-speed mud
    pub const MUD: Self = Self(1);
    /// Impassable bush (the map's wall tile)
    pub const BUSH: Self = Self(2);

    /// Look up this id in the catalog.
    pub fn kind(self) -> Option<&'static TerrainKind> {
        TERRAIN.get(self.0 as usize)
    }
}

/// A kind of tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TerrainKind {
    /// Display name
    pub name: &'static str,
    /// Friction coefficient in Q16.16 (0 = free, FIXED_ONE = blocked)
    pub friction: Fixed,
    /// Blocks line of sight
    pub opaque: bool,
}

impl TerrainKind {
    /// True when friction blocks movement entirely.
    #[inline]
    pub fn is_impassable(&self) -> bool {
        self.friction >= FIXED_ONE
    }

    /// Friction as a float, for display only.
    pub fn friction_f32(&self) -> f32 {
        to_float(self.friction)
    }
}

/// The terrain catalog, indexed by `TerrainId`.
pub static TERRAIN: [TerrainKind; 3] = [
    TerrainKind { name: "floor", friction: 0, opaque: false },
    TerrainKind { name: "mud", friction: FIXED_HALF, opaque: false },
    TerrainKind { name: "bush", friction: FIXED_ONE, opaque: true },
];
