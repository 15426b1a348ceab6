//! Game Events
//!
//! Events generated while resolving turns, for logging and replay checks.

use serde::{Serialize, Deserialize};

use crate::core::vec2::{SubTilePos, TilePos};
use crate::game::movement::MoveBlocked;
use crate::game::objects::GameObject;

/// Why a move was refused, in serializable form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    /// Target tile outside the map
    OutOfBounds,
    /// Target tile impassable
    Impassable,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player moved
    Moved {
        from: SubTilePos,
        to: SubTilePos,
    },

    /// Player's move was refused
    MoveBlocked {
        target: TilePos,
        reason: BlockReason,
    },

    /// Player picked up an object
    ObjectPickedUp {
        object: GameObject,
        pocket_count: u32,
    },

    /// Player touched an object with no pickup rule
    ObjectBumped {
        object: GameObject,
    },

    /// Player dropped an object
    ObjectDropped {
        object: GameObject,
    },

    /// Player tried to drop onto an occupied tile
    DropRejected {
        tile: TilePos,
    },
}

/// A game event with its turn and acting player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Turn when the event occurred
    pub turn: u64,

    /// Index of the acting player
    pub player: usize,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(turn: u64, player: usize, data: GameEventData) -> Self {
        Self { turn, player, data }
    }

    /// Create moved event.
    pub fn moved(turn: u64, player: usize, from: SubTilePos, to: SubTilePos) -> Self {
        Self::new(turn, player, GameEventData::Moved { from, to })
    }

    /// Create move blocked event.
    pub fn move_blocked(turn: u64, player: usize, blocked: &MoveBlocked) -> Self {
        let (target, reason) = match *blocked {
            MoveBlocked::OutOfBounds { target } => (target, BlockReason::OutOfBounds),
            MoveBlocked::Impassable { target, .. } => (target, BlockReason::Impassable),
        };
        Self::new(turn, player, GameEventData::MoveBlocked { target, reason })
    }

    /// Create object picked up event.
    pub fn picked_up(turn: u64, player: usize, object: GameObject, pocket_count: u32) -> Self {
        Self::new(turn, player, GameEventData::ObjectPickedUp { object, pocket_count })
    }

    /// Create object bumped event.
    pub fn bumped(turn: u64, player: usize, object: GameObject) -> Self {
        Self::new(turn, player, GameEventData::ObjectBumped { object })
    }

    /// Create object dropped event.
    pub fn dropped(turn: u64, player: usize, object: GameObject) -> Self {
        Self::new(turn, player, GameEventData::ObjectDropped { object })
    }

    /// Create drop rejected event.
    pub fn drop_rejected(turn: u64, player: usize, tile: TilePos) -> Self {
        Self::new(turn, player, GameEventData::DropRejected { tile })
    }
}
