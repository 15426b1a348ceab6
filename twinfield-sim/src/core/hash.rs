//! State Hashing for Verification
//!
//! Deterministic hashing of session state, used to check that replaying
//! the same inputs from the same seed lands on the same shared state.

use sha2::{Sha256, Digest};

use super::vec2::{SubTilePos, TilePos};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for session state.
///
/// Wraps SHA-256 with helpers for position types.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for session state.
    pub fn for_session_state() -> Self {
        Self::new(b"TWINFIELD_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u16 value (little-endian).
    #[inline]
    pub fn update_u16(&mut self, value: u16) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a tile coordinate.
    #[inline]
    pub fn update_tile(&mut self, value: TilePos) {
        self.update_i32(value.x);
        self.update_i32(value.y);
    }

    /// Update with a sub-tile position.
    #[inline]
    pub fn update_sub_tile(&mut self, value: SubTilePos) {
        self.update_i32(value.x);
        self.update_i32(value.y);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for session verification.
///
/// Called by `Session::compute_hash()`.
/// The closure adds session-specific data after the turn counter and seed.
pub fn compute_state_hash<F>(turn: u64, rng_seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_session_state();

    hasher.update_u64(turn);
    hasher.update_u64(rng_seed);

    add_state(&mut hasher);

    hasher.finalize()
}
