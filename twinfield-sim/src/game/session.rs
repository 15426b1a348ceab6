//! Simulation Session
//!
//! Owns everything a game needs: the shared map, the shared object
//! registry and one state per player. A turn is one call to
//! `handle_input`, which holds `&mut self` for its whole duration, so the
//! move, collision scan, pickups and redraw decision are never interleaved
//! with another player's turn.
//!
//! ## Turn flow
//!
//! ```text
//! Move(dir) ── resolve ──┬─ blocked ───────────────────────────> None
//!                        └─ moved ── detect ── interactions ──┬─> All (pickup)
//!                                                             ├─> SelfOnly (stepped)
//!                                                             └─> None (stayed)
//! Act(DropEgg) ── place ─┬─ placed ──> SelfOnly (All if drop_redraw_all)
//!                        └─ occupied ─> None
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::TilePos;
use crate::game::collision::detect;
use crate::game::events::GameEvent;
use crate::game::input::{ActKind, Command, ControlMap};
use crate::game::interaction::{resolve_collisions, Interaction};
use crate::game::map::{TileGrid, MIN_MAP_SIZE};
use crate::game::movement::{self, Direction};
use crate::game::objects::{GameObject, ObjectKind, ObjectRegistry};
use crate::game::state::{PlayerState, ViewportId};
use crate::game::viewport::{Viewport, MAX_VIEWPORT_RADIUS};

/// Which player views must be redrawn after a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedrawScope {
    /// Nothing changed
    None,
    /// Only the acting player's view changed
    SelfOnly,
    /// Shared state changed; redraw every view
    All,
}

/// Outcome of one resolved turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    /// Turn number
    pub turn: u64,
    /// Which views must be redrawn
    pub scope: RedrawScope,
    /// Events generated this turn
    pub events: Vec<GameEvent>,
}

/// Turn processing phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    /// Between inputs
    Idle,
    /// Processing one input
    Resolving,
}

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Map too small for its open region.
    #[error("Map size {size} is below the minimum of {min}")]
    MapTooSmall {
        /// Requested size
        size: u32,
        /// Smallest accepted size
        min: u32,
    },

    /// A session needs at least one player.
    #[error("Session needs at least one player")]
    NoPlayers,

    /// Player index out of range.
    #[error("Player {0} not found")]
    PlayerNotFound(usize),

    /// Spawn tile cannot be stood on.
    #[error("Spawn tile {0} is not walkable")]
    SpawnNotWalkable(TilePos),

    /// Scatter area has inverted corners.
    #[error("Scatter area is empty")]
    EmptyScatterArea,

    /// Viewport radius must be positive and no larger than the map.
    #[error("Invalid viewport radius {0}")]
    InvalidRadius(u32),
}

/// A running game.
pub struct Session {
    id: Uuid,
    config: SessionConfig,
    grid: Arc<TileGrid>,
    objects: ObjectRegistry,
    players: Vec<PlayerState>,
    controls: Vec<ControlMap>,
    rng: DeterministicRng,
    turn: u64,
    phase: TurnPhase,
    turn_events: Vec<GameEvent>,
    event_log: VecDeque<GameEvent>,
}

impl Session {
    /// Create a session: generate the map, scatter beer, spawn players.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        if config.map_size < MIN_MAP_SIZE {
            return Err(SessionError::MapTooSmall { size: config.map_size, min: MIN_MAP_SIZE });
        }
        if config.player_count == 0 {
            return Err(SessionError::NoPlayers);
        }
        check_radius(config.viewport_radius, config.map_size)?;

        let grid = Arc::new(TileGrid::generate(config.map_size));
        if !grid.is_walkable(config.spawn_tile) {
            return Err(SessionError::SpawnNotWalkable(config.spawn_tile));
        }

        let area = config.beer_area();
        if !area.is_valid() {
            return Err(SessionError::EmptyScatterArea);
        }

        let mut rng = DeterministicRng::new(config.rng_seed);
        let mut objects = ObjectRegistry::new();
        let scattered = objects.scatter(ObjectKind::Beer, config.beer_count, area, &mut rng);

        let spawn = config.spawn_tile.to_sub_tile();
        let players = (0..config.player_count)
            .map(|i| PlayerState::new(ViewportId(i as u32), spawn))
            .collect();
        let controls = (0..config.player_count)
            .map(|i| config.controls_for(i))
            .collect();

        let id = Uuid::new_v4();
        info!(
            "Session {} created: {}x{} map, {} players, {} beer scattered",
            id, config.map_size, config.map_size, config.player_count, scattered
        );

        Ok(Self {
            id,
            config,
            grid,
            objects,
            players,
            controls,
            rng,
            turn: 0,
            phase: TurnPhase::Idle,
            turn_events: Vec::new(),
            event_log: VecDeque::new(),
        })
    }

    /// Create a session with default settings for the given size and player count.
    pub fn with_size(map_size: u32, player_count: usize) -> Result<Self, SessionError> {
        Self::new(SessionConfig::with_size(map_size, player_count))
    }

    /// Resolve one command for one player.
    ///
    /// Returns which views must be redrawn.
    pub fn handle_input(&mut self, player: usize, command: Command) -> Result<RedrawScope, SessionError> {
        self.handle_turn(player, command).map(|result| result.scope)
    }

    /// Resolve one command and return the turn's events with its redraw scope.
    ///
    /// The events are also appended to the bounded event log (see
    /// `take_events`).
    pub fn handle_turn(&mut self, player: usize, command: Command) -> Result<TurnResult, SessionError> {
        if player >= self.players.len() {
            return Err(SessionError::PlayerNotFound(player));
        }

        self.phase = TurnPhase::Resolving;
        self.turn += 1;

        let scope = match command {
            Command::Move(direction) => self.resolve_move(player, direction),
            Command::Act(kind) => self.resolve_act(player, kind),
        };

        self.phase = TurnPhase::Idle;
        debug!("Turn {}: player {} {:?} -> {:?}", self.turn, player, command, scope);

        let events = std::mem::take(&mut self.turn_events);
        self.log_events(&events);
        Ok(TurnResult { turn: self.turn, scope, events })
    }

    fn log_events(&mut self, events: &[GameEvent]) {
        let capacity = self.config.event_log_capacity;
        self.event_log.extend(events.iter().cloned());
        if self.event_log.len() > capacity {
            let overflow = self.event_log.len() - capacity;
            self.event_log.drain(..overflow);
            trace!("Event log full, dropped {} oldest events", overflow);
        }
    }

    /// Route a raw key through every player's control map.
    ///
    /// A key may belong to several players; each gets its own turn, in
    /// player order. Unbound keys are ignored.
    pub fn handle_key(&mut self, key: &str) -> Vec<(usize, RedrawScope)> {
        let commands: Vec<(usize, Command)> = self
            .controls
            .iter()
            .enumerate()
            .filter_map(|(idx, map)| map.command_for(key).map(|cmd| (idx, cmd)))
            .collect();

        if commands.is_empty() {
            trace!("Ignoring unbound key {:?}", key);
        }

        commands
            .into_iter()
            .filter_map(|(idx, cmd)| self.handle_input(idx, cmd).ok().map(|scope| (idx, scope)))
            .collect()
    }

    fn resolve_move(&mut self, idx: usize, direction: Direction) -> RedrawScope {
        let turn = self.turn;
        let player = &mut self.players[idx];
        let from = player.position();

        match movement::resolve(from, direction, &self.grid) {
            Ok(to) => {
                player.set_position(to);
                if to != from {
                    self.turn_events.push(GameEvent::moved(turn, idx, from, to));
                }
            }
            Err(blocked) => {
                trace!("Player {} blocked: {}", idx, blocked);
                self.turn_events.push(GameEvent::move_blocked(turn, idx, &blocked));
                return RedrawScope::None;
            }
        }

        let collisions = detect(player.position(), &self.objects);
        #[cfg(feature = "debug-tracing")]
        trace!("Player {} at {:?} collides with {:?}", idx, player.position(), collisions);

        let interactions = resolve_collisions(player, &collisions, &mut self.objects);
        for interaction in &interactions.items {
            let event = match *interaction {
                Interaction::PickedUp { object, pocket_count } => {
                    debug!("Player {} picked up {:?} at {}", idx, object.kind, object.tile);
                    GameEvent::picked_up(turn, idx, object, pocket_count)
                }
                Interaction::Bumped { object } => GameEvent::bumped(turn, idx, object),
            };
            self.turn_events.push(event);
        }

        if interactions.any_refresh_required() {
            RedrawScope::All
        } else if direction.is_stay() {
            RedrawScope::None
        } else {
            RedrawScope::SelfOnly
        }
    }

    fn resolve_act(&mut self, idx: usize, kind: ActKind) -> RedrawScope {
        match kind {
            ActKind::DropEgg => {
                let tile = self.players[idx].tile();
                if self.objects.place(ObjectKind::Egg, tile, false) {
                    let object = GameObject::new(ObjectKind::Egg, tile);
                    self.turn_events.push(GameEvent::dropped(self.turn, idx, object));
                    if self.config.drop_redraw_all {
                        RedrawScope::All
                    } else {
                        RedrawScope::SelfOnly
                    }
                } else {
                    self.turn_events.push(GameEvent::drop_rejected(self.turn, idx, tile));
                    RedrawScope::None
                }
            }
        }
    }

    /// Place an object directly (host setup, scripted scenarios).
    pub fn place_object(&mut self, kind: ObjectKind, tile: TilePos, force: bool) -> bool {
        self.objects.place(kind, tile, force)
    }

    /// Read-only window around a player for the renderer.
    pub fn viewport(&self, player: usize, radius: u32) -> Result<Viewport, SessionError> {
        check_radius(radius, self.grid.size())?;
        let state = self.players.get(player).ok_or(SessionError::PlayerNotFound(player))?;
        Ok(Viewport::build(&self.grid, &self.objects, state, radius))
    }

    /// Viewport at the configured radius.
    pub fn default_viewport(&self, player: usize) -> Result<Viewport, SessionError> {
        self.viewport(player, self.config.viewport_radius)
    }

    /// Drain the event log.
    ///
    /// The log keeps at most `SessionConfig::event_log_capacity` events;
    /// older ones are dropped when a host never drains it.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.event_log.drain(..).collect()
    }

    /// Compute state hash for determinism checks.
    ///
    /// Covers the turn counter, seed, RNG state, objects and players.
    /// The session id is random and excluded.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.turn, self.config.rng_seed, |hasher| {
            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
            hasher.update_u32(self.objects.len() as u32);
            for object in self.objects.iter() {
                object.kind.hash_into(hasher);
                hasher.update_tile(object.tile);
            }
            hasher.update_u32(self.players.len() as u32);
            for player in &self.players {
                player.hash_into(hasher);
            }
        })
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Configuration the session was built from.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Shared map handle.
    pub fn grid(&self) -> &Arc<TileGrid> {
        &self.grid
    }

    /// Shared object registry.
    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    /// All players, in index order.
    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    /// One player by index.
    pub fn player(&self, idx: usize) -> Option<&PlayerState> {
        self.players.get(idx)
    }

    /// Number of players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Turns resolved so far.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Current phase (always `Idle` between calls).
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }
}

/// A radius is valid when positive, no larger than the map side and
/// within `MAX_VIEWPORT_RADIUS`.
fn check_radius(radius: u32, map_size: u32) -> Result<(), SessionError> {
    if radius == 0 || radius > map_size || radius > MAX_VIEWPORT_RADIUS {
        return Err(SessionError::InvalidRadius(radius));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::SubTilePos;
    use crate::game::events::{BlockReason, GameEventData};

    fn empty_session() -> Session {
        let config = SessionConfig { beer_count: 0, ..SessionConfig::default() };
        Session::new(config).unwrap()
    }

    fn walk(session: &mut Session, player: usize, dir: Direction, steps: usize) {
        for _ in 0..steps {
            session.handle_input(player, Command::Move(dir)).unwrap();
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new(SessionConfig::default()).unwrap();
        assert_eq!(session.player_count(), 2);
        assert_eq!(session.grid().size(), 22);
        assert!(session.objects().len() <= 2);
        assert!(session.objects().iter().all(|o| o.kind == ObjectKind::Beer));
        for player in session.players() {
            assert_eq!(player.position(), SubTilePos::new(160, 160));
        }
        assert_eq!(session.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_players_share_one_grid() {
        let session = empty_session();
        let grid = Arc::clone(session.grid());
        assert!(Arc::ptr_eq(&grid, session.grid()));
    }

    #[test]
    fn test_rejects_bad_config() {
        assert_eq!(
            Session::with_size(16, 2).err(),
            Some(SessionError::MapTooSmall { size: 16, min: 17 })
        );
        assert_eq!(Session::with_size(22, 0).err(), Some(SessionError::NoPlayers));

        let config = SessionConfig { spawn_tile: TilePos::new(1, 1), ..SessionConfig::default() };
        assert_eq!(
            Session::new(config).err(),
            Some(SessionError::SpawnNotWalkable(TilePos::new(1, 1)))
        );
    }

    #[test]
    fn test_player_count_not_hardcoded() {
        let session = Session::with_size(40, 5).unwrap();
        assert_eq!(session.player_count(), 5);
    }

    #[test]
    fn test_move_onto_floor_redraws_self() {
        let mut session = empty_session();
        let scope = session.handle_input(0, Command::Move(Direction::RIGHT)).unwrap();
        assert_eq!(scope, RedrawScope::SelfOnly);
        assert_eq!(session.player(0).unwrap().position(), SubTilePos::new(176, 160));
        assert_eq!(session.player(1).unwrap().position(), SubTilePos::new(160, 160));
    }

    #[test]
    fn test_move_into_wall_is_noop() {
        let mut session = empty_session();
        // Tile 10 -> 19 is nine steps; the tenth hits the bush at x = 20
        walk(&mut session, 0, Direction::RIGHT, 9);
        let before = session.player(0).unwrap().position();
        assert_eq!(before.tile(), TilePos::new(19, 10));

        let scope = session.handle_input(0, Command::Move(Direction::RIGHT)).unwrap();
        assert_eq!(scope, RedrawScope::None);
        assert_eq!(session.player(0).unwrap().position(), before);

        let events = session.take_events();
        assert_eq!(
            events.last().map(|e| &e.data),
            Some(&GameEventData::MoveBlocked { target: TilePos::new(20, 10), reason: BlockReason::Impassable })
        );
    }

    #[test]
    fn test_pickup_redraws_all_and_pockets() {
        let mut session = empty_session();
        assert!(session.place_object(ObjectKind::Egg, TilePos::new(11, 10), false));

        let scope = session.handle_input(0, Command::Move(Direction::RIGHT)).unwrap();
        assert_eq!(scope, RedrawScope::All);
        assert!(session.objects().is_empty());
        assert_eq!(session.player(0).unwrap().pocket_count(ObjectKind::Egg), 1);
        assert_eq!(session.player(1).unwrap().pocket_count(ObjectKind::Egg), 0);
    }

    #[test]
    fn test_bump_unknown_object_redraws_self_only() {
        let mut session = empty_session();
        session.place_object(ObjectKind::Unknown(3), TilePos::new(11, 10), false);

        let scope = session.handle_input(0, Command::Move(Direction::RIGHT)).unwrap();
        assert_eq!(scope, RedrawScope::SelfOnly);
        assert_eq!(session.objects().len(), 1);
        let events = session.take_events();
        assert!(matches!(events.last().map(|e| &e.data), Some(GameEventData::ObjectBumped { .. })));
    }

    #[test]
    fn test_stay_picks_up_without_self_redraw() {
        let mut session = empty_session();
        let scope = session.handle_input(0, Command::Move(Direction::STAY)).unwrap();
        assert_eq!(scope, RedrawScope::None);

        session.place_object(ObjectKind::Beer, TilePos::new(10, 10), false);
        let scope = session.handle_input(0, Command::Move(Direction::STAY)).unwrap();
        assert_eq!(scope, RedrawScope::All);
        assert_eq!(session.player(0).unwrap().pocket_count(ObjectKind::Beer), 1);
    }

    #[test]
    fn test_drop_egg() {
        let mut session = empty_session();
        let scope = session.handle_input(1, Command::Act(ActKind::DropEgg)).unwrap();
        assert_eq!(scope, RedrawScope::SelfOnly);
        assert_eq!(
            session.objects().at(TilePos::new(10, 10)),
            Some(&GameObject::new(ObjectKind::Egg, TilePos::new(10, 10)))
        );

        // Same tile again: conflict, nothing changes
        let scope = session.handle_input(0, Command::Act(ActKind::DropEgg)).unwrap();
        assert_eq!(scope, RedrawScope::None);
        assert_eq!(session.objects().len(), 1);
    }

    #[test]
    fn test_drop_redraw_all_option() {
        let config = SessionConfig { beer_count: 0, drop_redraw_all: true, ..SessionConfig::default() };
        let mut session = Session::new(config).unwrap();
        let scope = session.handle_input(0, Command::Act(ActKind::DropEgg)).unwrap();
        assert_eq!(scope, RedrawScope::All);
    }

    #[test]
    fn test_drop_is_not_fallback_of_failed_move() {
        let mut session = empty_session();
        walk(&mut session, 0, Direction::UP, 7);
        assert_eq!(session.player(0).unwrap().tile(), TilePos::new(10, 3));

        let scope = session.handle_input(0, Command::Move(Direction::UP)).unwrap();
        assert_eq!(scope, RedrawScope::None);
        assert!(session.objects().is_empty());
    }

    #[test]
    fn test_unknown_player() {
        let mut session = empty_session();
        assert_eq!(
            session.handle_input(2, Command::Move(Direction::UP)),
            Err(SessionError::PlayerNotFound(2))
        );
        assert_eq!(session.turn(), 0);
    }

    #[test]
    fn test_handle_key_routes_by_player() {
        let mut session = empty_session();
        assert_eq!(session.handle_key("s"), vec![(0, RedrawScope::SelfOnly)]);
        assert_eq!(session.handle_key(";"), vec![(1, RedrawScope::SelfOnly)]);
        assert_eq!(session.handle_key("m"), vec![(1, RedrawScope::SelfOnly)]);
        assert!(session.handle_key("q").is_empty());
        assert_eq!(session.turn(), 3);
    }

    #[test]
    fn test_handle_turn_returns_turn_events() {
        let mut session = empty_session();
        session.place_object(ObjectKind::Egg, TilePos::new(11, 10), false);

        let result = session.handle_turn(0, Command::Move(Direction::RIGHT)).unwrap();
        assert_eq!(result.turn, 1);
        assert_eq!(result.scope, RedrawScope::All);
        assert_eq!(result.events.len(), 2);
        assert!(matches!(result.events[1].data, GameEventData::ObjectPickedUp { pocket_count: 1, .. }));

        // Only this turn's events come back
        let result = session.handle_turn(0, Command::Move(Direction::STAY)).unwrap();
        assert!(result.events.is_empty());
        assert_eq!(session.take_events().len(), 2);
    }

    #[test]
    fn test_event_log_stays_bounded() {
        let config = SessionConfig { beer_count: 0, event_log_capacity: 64, ..SessionConfig::default() };
        let mut session = Session::new(config).unwrap();

        for i in 0..10_000 {
            let dir = if i % 2 == 0 { Direction::RIGHT } else { Direction::LEFT };
            session.handle_input(0, Command::Move(dir)).unwrap();
        }

        let events = session.take_events();
        assert_eq!(events.len(), 64);
        assert_eq!(events.first().map(|e| e.turn), Some(10_000 - 63));
        assert_eq!(events.last().map(|e| e.turn), Some(10_000));
    }

    #[test]
    fn test_zero_capacity_log_keeps_nothing() {
        let config = SessionConfig { beer_count: 0, event_log_capacity: 0, ..SessionConfig::default() };
        let mut session = Session::new(config).unwrap();
        let result = session.handle_turn(0, Command::Move(Direction::UP)).unwrap();
        assert_eq!(result.events.len(), 1);
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_oversized_radius_rejected() {
        let session = empty_session();
        assert_eq!(session.viewport(0, 1 << 30).err(), Some(SessionError::InvalidRadius(1 << 30)));
        assert_eq!(session.viewport(0, u32::MAX).err(), Some(SessionError::InvalidRadius(u32::MAX)));
        assert_eq!(session.viewport(0, 23).err(), Some(SessionError::InvalidRadius(23)));

        let view = session.viewport(0, 22).unwrap();
        assert_eq!(view.side(), 44);
        assert_eq!(view.cell(0, 0), None);

        let config = SessionConfig { viewport_radius: 1 << 30, ..SessionConfig::default() };
        assert_eq!(Session::new(config).err(), Some(SessionError::InvalidRadius(1 << 30)));
    }

    #[test]
    fn test_hash_separates_unknown_kinds() {
        let mut a = empty_session();
        let mut b = empty_session();
        a.place_object(ObjectKind::Unknown(0), TilePos::new(5, 5), false);
        b.place_object(ObjectKind::Unknown(0x100), TilePos::new(5, 5), false);
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_events_drained() {
        let mut session = empty_session();
        session.handle_input(0, Command::Move(Direction::DOWN)).unwrap();
        let events = session.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].data,
            GameEventData::Moved { from: SubTilePos::new(160, 160), to: SubTilePos::new(160, 176) }
        );
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let script = [
            (0, Command::Move(Direction::RIGHT)),
            (1, Command::Act(ActKind::DropEgg)),
            (1, Command::Move(Direction::UP)),
            (0, Command::Move(Direction::LEFT)),
        ];
        let mut a = Session::new(SessionConfig::default()).unwrap();
        let mut b = Session::new(SessionConfig::default()).unwrap();
        for (p, cmd) in script {
            a.handle_input(p, cmd).unwrap();
            b.handle_input(p, cmd).unwrap();
        }
        assert_ne!(a.id(), b.id());
        assert_eq!(a.compute_hash(), b.compute_hash());

        b.handle_input(0, Command::Move(Direction::DOWN)).unwrap();
        assert_ne!(a.compute_hash(), b.compute_hash());
    }
}
