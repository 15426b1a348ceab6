//! Fixed-Point Units
//!
//! Integer arithmetic for positions and terrain coefficients.
//! No floats in game logic: positions are sub-tile integers, coefficients
//! are Q16.16.
//!
//! ## Units
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Sub-tile position (i32)                                    │
//! │    1 tile = POS_FACTOR (16) sub-tile units                  │
//! │    tile index = floor(sub / 16)                             │
//! │                                                             │
//! │  Q16.16 coefficient (i32)                                   │
//! │    1.0 = FIXED_ONE (65536)                                  │
//! │    friction, overlap, fractional tile coordinates           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! One sub-tile unit is exactly `FIXED_ONE / POS_FACTOR` (4096) in Q16.16,
//! so converting a position to a fractional tile coordinate never rounds.

/// Q16.16 fixed-point number stored as i32.
/// 16 bits integer, 16 bits fractional.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE; // 65536

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1; // 32768

/// Sub-tile units per tile.
pub const POS_FACTOR: i32 = 16;

/// Q16.16 value of one sub-tile unit (65536 / 16 = 4096).
pub const SUB_TILE_FIXED: Fixed = FIXED_ONE / POS_FACTOR;

/// Convert a compile-time float to fixed-point.
///
/// # Warning
/// Only use at compile-time or initialization. NEVER in turn logic.
///
/// # Example
/// ```
/// use twinfield::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i32 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert fixed-point to float for display.
///
/// # Warning
/// Only use for visual output. NEVER use result in game logic.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Multiply two fixed-point numbers.
///
/// Uses i64 intermediate to prevent overflow.
/// Truncates toward zero so that `fixed_mul(-a, b) == -fixed_mul(a, b)`.
#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    let wide = (a as i64) * (b as i64);
    (wide / FIXED_ONE as i64) as Fixed
}

/// Absolute value of a fixed-point number.
#[inline]
pub fn fixed_abs(x: Fixed) -> Fixed {
    if x < 0 { x.wrapping_neg() } else { x }
}

/// Convert a sub-tile coordinate to a Q16.16 tile coordinate (exact).
#[inline]
pub const fn sub_tile_to_fixed(sub: i32) -> Fixed {
    sub * SUB_TILE_FIXED
}

/// Convert a whole tile index to Q16.16.
#[inline]
pub const fn tile_to_fixed(tile: i32) -> Fixed {
    tile << FIXED_SCALE
}

/// Tile index containing a sub-tile coordinate (floor division).
#[inline]
pub const fn sub_tile_to_tile(sub: i32) -> i32 {
    sub.div_euclid(POS_FACTOR)
}
