//! Interaction Rules
//!
//! What happens when a player collides with an object.
//! Beer and eggs are picked up: removed from the shared registry, added to
//! the player's pockets, and every view must refresh. Kinds without a rule
//! are only bumped into.

use serde::{Serialize, Deserialize};

use crate::game::objects::{GameObject, ObjectKind, ObjectRegistry};
use crate::game::state::PlayerState;

/// Effect of one collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interaction {
    /// Object removed from the map and pocketed.
    PickedUp {
        /// The object taken
        object: GameObject,
        /// Player's count of that kind afterwards
        pocket_count: u32,
    },
    /// Object touched but left in place.
    Bumped {
        /// The object touched
        object: GameObject,
    },
}

impl Interaction {
    /// Whether every player's view must be redrawn.
    pub fn requires_refresh(&self) -> bool {
        matches!(self, Interaction::PickedUp { .. })
    }

    /// The object involved.
    pub fn object(&self) -> &GameObject {
        match self {
            Interaction::PickedUp { object, .. } | Interaction::Bumped { object } => object,
        }
    }
}

/// All interactions from one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Interactions {
    /// In collision order
    pub items: Vec<Interaction>,
}

impl Interactions {
    /// True if any interaction requires a shared refresh.
    pub fn any_refresh_required(&self) -> bool {
        self.items.iter().any(Interaction::requires_refresh)
    }

    /// True when nothing was touched.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Whether objects of `kind` are picked up on contact.
#[inline]
pub fn is_collectible(kind: ObjectKind) -> bool {
    matches!(kind, ObjectKind::Beer | ObjectKind::Egg)
}

/// Apply the rules for every collision, in order.
///
/// `collisions` must be owned copies (see `collision::detect`); the registry
/// is mutated as each pickup is applied. An object already gone (for
/// example listed twice) is not pocketed a second time.
pub fn resolve_collisions(
    player: &mut PlayerState,
    collisions: &[GameObject],
    registry: &mut ObjectRegistry,
) -> Interactions {
    let mut result = Interactions::default();

    for object in collisions {
        if !is_collectible(object.kind) {
            result.items.push(Interaction::Bumped { object: *object });
            continue;
        }

        if registry.remove(object) {
            let pocket_count = player.pocket(object.kind);
            result.items.push(Interaction::PickedUp { object: *object, pocket_count });
        }
    }

    result
}
