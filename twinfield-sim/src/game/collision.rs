//! Collision Detection
//!
//! Decides which objects a player overlaps enough to interact with.
//!
//! ## Overlap rule
//!
//! ```text
//! p       = position / 16              fractional tile coordinate
//! c       = object tile + 0.499        object center, nudged off 0.5
//! overlap = max(0, 1 - |c - p|)        per axis
//! hit     = overlap_x >= 0.5 && overlap_y >= 0.5
//! ```
//!
//! Evaluated in Q16.16. Player coordinates are multiples of 1/16 and the
//! center offset is 32702/65536, so no comparison ever lands on an exact
//! tie: per axis, an object on tile `o` is hit by sub-tile coordinates
//! `16*o ..= 16*o + 15`. In practice a hit means the player's position
//! floors to the object's tile.

use crate::core::fixed::{
    Fixed, FIXED_ONE, FIXED_HALF,
    fixed_abs, sub_tile_to_fixed, tile_to_fixed, to_fixed,
};
use crate::core::vec2::SubTilePos;
use crate::game::objects::{GameObject, ObjectRegistry};

/// Offset from an object's tile corner to the point treated as its center.
pub const OBJECT_CENTER_OFFSET: Fixed = to_fixed(0.499); // 32702

/// Minimum per-axis overlap that counts as a collision.
pub const OVERLAP_THRESHOLD: Fixed = FIXED_HALF;

/// Overlap along one axis between a player coordinate and an object tile.
///
/// Both in tile units; the result is in `[0, FIXED_ONE]`.
#[inline]
pub fn axis_overlap(player: Fixed, object_tile: i32) -> Fixed {
    let center = tile_to_fixed(object_tile) + OBJECT_CENTER_OFFSET;
    (FIXED_ONE - fixed_abs(center - player)).max(0)
}

/// Check if a player position collides with one object.
pub fn collides(position: SubTilePos, object: &GameObject) -> bool {
    let px = sub_tile_to_fixed(position.x);
    let py = sub_tile_to_fixed(position.y);
    axis_overlap(px, object.tile.x) >= OVERLAP_THRESHOLD
        && axis_overlap(py, object.tile.y) >= OVERLAP_THRESHOLD
}

/// All objects the player at `position` collides with, in registry order.
///
/// Returns owned copies so the caller can mutate the registry afterwards.
pub fn detect(position: SubTilePos, registry: &ObjectRegistry) -> Vec<GameObject> {
    registry
        .scan(move |object| collides(position, object))
        .copied()
        .collect()
}
