//! Movement Resolution
//!
//! Moves a player one step in a cardinal direction, shortened by the
//! friction of the tile being entered.
//!
//! ## Step rule
//!
//! ```text
//! target = floor((pos + delta * 16) / 16)      per axis
//! target off-grid        -> OutOfBounds, position unchanged
//! friction(target) >= 1  -> Impassable,  position unchanged
//! otherwise              -> pos += delta * 16 * (1 - friction)
//! ```
//!
//! The step is computed in integer sub-tile units; with the shipped
//! catalog every step is exact (16 on floor, 8 on mud).

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::fixed::{Fixed, FIXED_ONE, POS_FACTOR, fixed_mul};
use crate::core::vec2::{SubTilePos, TilePos};
use crate::game::map::TileGrid;
use crate::game::terrain::TerrainId;

/// A unit step: at most one axis non-zero, each axis in `{-1, 0, 1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(i8, i8)", into = "(i8, i8)")]
pub struct Direction {
    dx: i8,
    dy: i8,
}

impl Direction {
    /// No movement
    pub const STAY: Self = Self { dx: 0, dy: 0 };
    /// Toward negative Y
    pub const UP: Self = Self { dx: 0, dy: -1 };
    /// Toward positive Y
    pub const DOWN: Self = Self { dx: 0, dy: 1 };
    /// Toward negative X
    pub const LEFT: Self = Self { dx: -1, dy: 0 };
    /// Toward positive X
    pub const RIGHT: Self = Self { dx: 1, dy: 0 };

    /// Create a direction, rejecting diagonals and non-unit components.
    pub const fn new(dx: i8, dy: i8) -> Option<Self> {
        let unit = dx >= -1 && dx <= 1 && dy >= -1 && dy <= 1;
        if !unit || (dx != 0 && dy != 0) {
            return None;
        }
        Some(Self { dx, dy })
    }

    /// X component.
    #[inline]
    pub fn dx(self) -> i32 {
        self.dx as i32
    }

    /// Y component.
    #[inline]
    pub fn dy(self) -> i32 {
        self.dy as i32
    }

    /// True for the zero direction.
    #[inline]
    pub fn is_stay(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

impl TryFrom<(i8, i8)> for Direction {
    type Error = String;

    fn try_from((dx, dy): (i8, i8)) -> Result<Self, Self::Error> {
        Direction::new(dx, dy).ok_or_else(|| format!("({dx}, {dy}) is not a unit cardinal step"))
    }
}

impl From<Direction> for (i8, i8) {
    fn from(dir: Direction) -> Self {
        (dir.dx, dir.dy)
    }
}

/// Why a move was refused. The player's position is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveBlocked {
    /// Target tile lies outside the grid.
    #[error("target tile {target} is outside the map")]
    OutOfBounds {
        /// Tile the step would have entered
        target: TilePos,
    },

    /// Target tile friction blocks movement.
    #[error("target tile {target} is impassable")]
    Impassable {
        /// Tile the step would have entered
        target: TilePos,
        /// Its terrain
        terrain: TerrainId,
    },
}

/// Resolve one step from `position` in `direction`.
///
/// Returns the new position, or why the move was blocked.
/// A `STAY` direction always succeeds with the position unchanged.
pub fn resolve(
    position: SubTilePos,
    direction: Direction,
    grid: &TileGrid,
) -> Result<SubTilePos, MoveBlocked> {
    if direction.is_stay() {
        return Ok(position);
    }

    let dx = direction.dx() * POS_FACTOR;
    let dy = direction.dy() * POS_FACTOR;
    let target = position.offset(dx, dy).tile();

    let terrain = grid
        .terrain_id(target)
        .ok_or(MoveBlocked::OutOfBounds { target })?;
    let kind = terrain
        .kind()
        .ok_or(MoveBlocked::Impassable { target, terrain })?;

    let step_x = friction_step(dx, kind.friction).ok_or(MoveBlocked::Impassable { target, terrain })?;
    let step_y = friction_step(dy, kind.friction).ok_or(MoveBlocked::Impassable { target, terrain })?;
    Ok(position.offset(step_x, step_y))
}

/// Sub-tile distance covered by a step of `delta` onto terrain with
/// `friction`: `delta * (1 - friction)`, truncated toward zero.
///
/// `None` when friction blocks movement.
#[inline]
pub fn friction_step(delta: i32, friction: Fixed) -> Option<i32> {
    if friction >= FIXED_ONE {
        return None;
    }
    Some(fixed_mul(delta, FIXED_ONE - friction))
}
