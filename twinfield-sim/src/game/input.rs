//! Input Commands
//!
//! A turn is driven by one command. Moving and acting are distinct
//! commands: an act never happens as a fallback from a failed move.
//!
//! Raw keys are translated through a per-player `ControlMap`. Keys that
//! are not in a map mean nothing to that player and are ignored.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::game::movement::Direction;

/// Non-movement actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActKind {
    /// Drop an egg on the current tile
    DropEgg,
}

/// One player command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Step in a direction (`STAY` re-checks the current tile)
    Move(Direction),
    /// Perform an action in place
    Act(ActKind),
}

/// Key bindings for one player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlMap {
    bindings: BTreeMap<String, Command>,
}

impl ControlMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key (case-insensitive) to a command, replacing any previous binding.
    pub fn bind(&mut self, key: &str, command: Command) -> &mut Self {
        self.bindings.insert(key.to_lowercase(), command);
        self
    }

    /// Look up a key. `None` for keys not in this map.
    pub fn command_for(&self, key: &str) -> Option<Command> {
        self.bindings.get(&key.to_lowercase()).copied()
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Build a map from `[left, right, up, down, drop, stay]` keys.
    pub fn from_keys(keys: [&str; 6]) -> Self {
        let [left, right, up, down, drop, stay] = keys;
        let mut map = Self::new();
        map.bind(left, Command::Move(Direction::LEFT))
            .bind(right, Command::Move(Direction::RIGHT))
            .bind(up, Command::Move(Direction::UP))
            .bind(down, Command::Move(Direction::DOWN))
            .bind(drop, Command::Act(ActKind::DropEgg))
            .bind(stay, Command::Move(Direction::STAY));
        map
    }

    /// Standard same-keyboard layout for player `index`.
    ///
    /// Player 0: `a s w z` to move, `c` drops, `v` stays.
    /// Player 1: `l ; p .` to move, `m` drops, `,` stays.
    /// Further players get an empty map.
    pub fn default_for_player(index: usize) -> Self {
        match index {
            0 => Self::from_keys(["a", "s", "w", "z", "c", "v"]),
            1 => Self::from_keys(["l", ";", "p", ".", "m", ","]),
            _ => Self::new(),
        }
    }
}
