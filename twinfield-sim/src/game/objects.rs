//! Object Registry
//!
//! The mutable, shared collection of items lying on the map.
//! At most one object per tile: a forced placement evicts the occupant.

use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::core::hash::StateHasher;
use crate::core::rng::DeterministicRng;
use crate::core::vec2::{TilePos, TileRect};

/// Type of a placed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Beer bottle, scattered at session start
    Beer,
    /// Egg, dropped by players
    Egg,
    /// A kind with no interaction rule in this build (tag kept for display)
    Unknown(u16),
}

impl ObjectKind {
    /// Stable discriminant and payload, hashed as separate fields.
    pub fn parts(self) -> (u8, u16) {
        match self {
            ObjectKind::Beer => (0, 0),
            ObjectKind::Egg => (1, 0),
            ObjectKind::Unknown(tag) => (2, tag),
        }
    }

    /// Hash this kind for verification.
    pub fn hash_into(self, hasher: &mut StateHasher) {
        let (discriminant, payload) = self.parts();
        hasher.update_u8(discriminant);
        hasher.update_u16(payload);
    }
}

/// An object lying on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameObject {
    /// What it is
    pub kind: ObjectKind,
    /// Where it lies
    pub tile: TilePos,
}

impl GameObject {
    /// Create a new object.
    pub const fn new(kind: ObjectKind, tile: TilePos) -> Self {
        Self { kind, tile }
    }
}

/// Ordered collection of placed objects.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ObjectRegistry {
    objects: Vec<GameObject>,
}

impl ObjectRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { objects: Vec::new() }
    }

    /// Place an object on a tile.
    ///
    /// Returns `false` without touching the registry if the tile is taken
    /// and `force` is not set. With `force`, the occupant is removed first.
    pub fn place(&mut self, kind: ObjectKind, tile: TilePos, force: bool) -> bool {
        if let Some(idx) = self.objects.iter().position(|o| o.tile == tile) {
            if !force {
                trace!("Placement of {:?} at {} rejected: occupied", kind, tile);
                return false;
            }
            let evicted = self.objects.remove(idx);
            trace!("Forced placement at {} evicts {:?}", tile, evicted.kind);
        }
        self.objects.push(GameObject::new(kind, tile));
        true
    }

    /// Remove the first object matching `object` exactly.
    ///
    /// Returns whether anything was removed. Absent objects are a no-op.
    pub fn remove(&mut self, object: &GameObject) -> bool {
        match self.objects.iter().position(|o| o == object) {
            Some(idx) => {
                self.objects.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Lazily enumerate objects matching `predicate`.
    ///
    /// Borrows the registry; collect before removing matches.
    pub fn scan<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = &'a GameObject> + 'a
    where
        P: FnMut(&GameObject) -> bool + 'a,
    {
        self.objects.iter().filter(move |o| predicate(*o))
    }

    /// Object on a tile, if any.
    pub fn at(&self, tile: TilePos) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.tile == tile)
    }

    /// Objects inside an inclusive tile rectangle, in registry order.
    pub fn within(&self, area: TileRect) -> Vec<GameObject> {
        self.scan(move |o| area.contains(o.tile)).copied().collect()
    }

    /// All objects in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when no objects are placed.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Make `count` placement attempts at random tiles inside `area`.
    ///
    /// Attempts landing on an occupied tile are skipped, not retried.
    /// Returns how many objects were actually placed.
    pub fn scatter(
        &mut self,
        kind: ObjectKind,
        count: u32,
        area: TileRect,
        rng: &mut DeterministicRng,
    ) -> u32 {
        let mut placed = 0;
        for _ in 0..count {
            let tile = rng.random_tile(area);
            if self.place(kind, tile, false) {
                placed += 1;
            }
        }
        placed
    }
}
