//! Player State
//!
//! Per-player state. Never shared between players; the map and the
//! object registry live on the session instead.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::vec2::{SubTilePos, TilePos};
use crate::game::objects::ObjectKind;

/// Opaque handle the presentation layer uses to find a player's view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewportId(pub u32);

/// State of a single player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    /// Position in sub-tile units
    position: SubTilePos,

    /// View this player is drawn into
    pub viewport: ViewportId,

    /// Collected items by kind (BTreeMap for deterministic iteration)
    pub pockets: BTreeMap<ObjectKind, u32>,
}

impl PlayerState {
    /// Create a new player at a spawn position.
    pub fn new(viewport: ViewportId, position: SubTilePos) -> Self {
        Self {
            position,
            viewport,
            pockets: BTreeMap::new(),
        }
    }

    /// Current position in sub-tile units.
    #[inline]
    pub fn position(&self) -> SubTilePos {
        self.position
    }

    /// Tile the player stands on.
    #[inline]
    pub fn tile(&self) -> TilePos {
        self.position.tile()
    }

    /// Apply a position produced by the movement resolver.
    pub(crate) fn set_position(&mut self, position: SubTilePos) {
        self.position = position;
    }

    /// Add one item of `kind` to the pockets. Returns the new count.
    pub fn pocket(&mut self, kind: ObjectKind) -> u32 {
        let count = self.pockets.entry(kind).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// How many items of `kind` the player carries.
    pub fn pocket_count(&self, kind: ObjectKind) -> u32 {
        self.pockets.get(&kind).copied().unwrap_or(0)
    }

    /// Hash this player's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.viewport.0);
        hasher.update_sub_tile(self.position);
        hasher.update_u32(self.pockets.len() as u32);
        for (kind, count) in &self.pockets {
            kind.hash_into(hasher);
            hasher.update_u32(*count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_has_empty_pockets() {
        let player = PlayerState::new(ViewportId(1), SubTilePos::new(160, 160));
        assert_eq!(player.tile(), TilePos::new(10, 10));
        assert_eq!(player.pocket_count(ObjectKind::Beer), 0);
        assert!(player.pockets.is_empty());
    }

    #[test]
    fn test_pocket_counts_per_kind() {
        let mut player = PlayerState::new(ViewportId(0), SubTilePos::ZERO);
        assert_eq!(player.pocket(ObjectKind::Beer), 1);
        assert_eq!(player.pocket(ObjectKind::Beer), 2);
        assert_eq!(player.pocket(ObjectKind::Egg), 1);
        assert_eq!(player.pocket_count(ObjectKind::Beer), 2);
        assert_eq!(player.pocket_count(ObjectKind::Egg), 1);
    }

    #[test]
    fn test_hash_reflects_pockets() {
        let mut a = PlayerState::new(ViewportId(0), SubTilePos::ZERO);
        let b = a.clone();
        a.pocket(ObjectKind::Egg);

        let mut ha = StateHasher::for_session_state();
        let mut hb = StateHasher::for_session_state();
        a.hash_into(&mut ha);
        b.hash_into(&mut hb);
        assert_ne!(ha.finalize(), hb.finalize());
    }
}
