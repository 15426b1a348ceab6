//! Integer 2D Positions
//!
//! Tile and sub-tile coordinates. Two distinct types so a tile index can
//! never be mistaken for a sub-tile offset.

use std::fmt;
use std::ops::{Add, Sub};
use serde::{Serialize, Deserialize};

use super::fixed::{POS_FACTOR, sub_tile_to_tile};

/// Whole-tile grid coordinate.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TilePos {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl TilePos {
    /// Create a new tile position.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Sub-tile position of this tile's top-left corner.
    #[inline]
    pub const fn to_sub_tile(self) -> SubTilePos {
        SubTilePos {
            x: self.x * POS_FACTOR,
            y: self.y * POS_FACTOR,
        }
    }

    /// Translate by a tile offset.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Add for TilePos {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        self.offset(other.x, other.y)
    }
}

impl Sub for TilePos {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        self.offset(-other.x, -other.y)
    }
}

impl fmt::Debug for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Player position in sub-tile units (`POS_FACTOR` per tile).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SubTilePos {
    /// X in sub-tile units
    pub x: i32,
    /// Y in sub-tile units
    pub y: i32,
}

impl SubTilePos {
    /// Origin
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new sub-tile position.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing this position (floor per axis).
    #[inline]
    pub const fn tile(self) -> TilePos {
        TilePos {
            x: sub_tile_to_tile(self.x),
            y: sub_tile_to_tile(self.y),
        }
    }

    /// Translate by a sub-tile offset.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Convert to float tile coordinates for display.
    pub fn to_tile_floats(self) -> (f32, f32) {
        (
            self.x as f32 / POS_FACTOR as f32,
            self.y as f32 / POS_FACTOR as f32,
        )
    }
}

impl fmt::Debug for SubTilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tx, ty) = self.to_tile_floats();
        write!(f, "SubTilePos({}, {} ~ tile {:.3}, {:.3})", self.x, self.y, tx, ty)
    }
}

/// Inclusive rectangle of tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    /// Top-left corner (inclusive)
    pub min: TilePos,
    /// Bottom-right corner (inclusive)
    pub max: TilePos,
}

impl TileRect {
    /// Create a rectangle from inclusive corners.
    pub const fn new(min: TilePos, max: TilePos) -> Self {
        Self { min, max }
    }

    /// Whole `size × size` map.
    pub const fn square(size: i32) -> Self {
        Self {
            min: TilePos::new(0, 0),
            max: TilePos::new(size - 1, size - 1),
        }
    }

    /// Check if a tile lies inside the rectangle.
    #[inline]
    pub fn contains(&self, tile: TilePos) -> bool {
        tile.x >= self.min.x && tile.x <= self.max.x
            && tile.y >= self.min.y && tile.y <= self.max.y
    }

    /// True when `min` is not past `max` on either axis.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_tile_floor() {
        assert_eq!(SubTilePos::new(160, 160).tile(), TilePos::new(10, 10));
        assert_eq!(SubTilePos::new(175, 191).tile(), TilePos::new(10, 11));
        assert_eq!(SubTilePos::new(-1, 0).tile(), TilePos::new(-1, 0));
    }

    #[test]
    fn test_tile_round_trip() {
        let tile = TilePos::new(3, 19);
        assert_eq!(tile.to_sub_tile().tile(), tile);
        assert_eq!(tile + TilePos::new(1, -1), TilePos::new(4, 18));
        assert_eq!(tile - TilePos::new(3, 19), TilePos::new(0, 0));
    }

    #[test]
    fn test_rect_contains() {
        let rect = TileRect::square(22);
        assert!(rect.contains(TilePos::new(0, 0)));
        assert!(rect.contains(TilePos::new(21, 21)));
        assert!(!rect.contains(TilePos::new(22, 0)));
        assert!(!rect.contains(TilePos::new(0, -1)));
        assert!(rect.is_valid());
        assert!(!TileRect::new(TilePos::new(2, 0), TilePos::new(1, 0)).is_valid());
    }
}
