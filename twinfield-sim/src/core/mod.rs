//! Core deterministic primitives.
//!
//! Integer units, positions, seeded randomness and state hashing.
//! Nothing in here knows about terrain, objects or players.

pub mod fixed;
pub mod vec2;
pub mod rng;
pub mod hash;

// Re-export core types
pub use fixed::{Fixed, FIXED_ONE, FIXED_HALF, POS_FACTOR};
pub use vec2::{SubTilePos, TilePos, TileRect};
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash};
