//! Shared Session Handle
//!
//! Hosts that drive players from separate tasks share one `Session` through
//! this handle. Each input takes the write lock for its whole turn, so the
//! pickup check and registry removal of one player can never interleave
//! with another player's turn. Viewport reads share the read lock.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::hash::StateHash;
use crate::game::events::GameEvent;
use crate::game::input::Command;
use crate::game::session::{RedrawScope, Session, SessionError, TurnResult};
use crate::game::viewport::Viewport;

/// Cloneable handle to a session shared between tasks.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<RwLock<Session>>,
}

impl SharedSession {
    /// Wrap a session for shared use.
    pub fn new(session: Session) -> Self {
        Self { inner: Arc::new(RwLock::new(session)) }
    }

    /// Resolve one command as an atomic turn.
    pub async fn handle_input(&self, player: usize, command: Command) -> Result<RedrawScope, SessionError> {
        let mut session = self.inner.write().await;
        session.handle_input(player, command)
    }

    /// Resolve one command as an atomic turn, returning its events.
    pub async fn handle_turn(&self, player: usize, command: Command) -> Result<TurnResult, SessionError> {
        self.inner.write().await.handle_turn(player, command)
    }

    /// Route a raw key as an atomic batch of turns.
    pub async fn handle_key(&self, key: &str) -> Vec<(usize, RedrawScope)> {
        self.inner.write().await.handle_key(key)
    }

    /// Snapshot a player's viewport.
    pub async fn viewport(&self, player: usize, radius: u32) -> Result<Viewport, SessionError> {
        self.inner.read().await.viewport(player, radius)
    }

    /// Drain pending events.
    pub async fn take_events(&self) -> Vec<GameEvent> {
        self.inner.write().await.take_events()
    }

    /// Current state hash.
    pub async fn compute_hash(&self) -> StateHash {
        self.inner.read().await.compute_hash()
    }

    /// Run a read-only closure against the session.
    pub async fn with<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let session = self.inner.read().await;
        f(&session)
    }

    /// Run a closure with exclusive access to the session.
    pub async fn with_mut<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self.inner.write().await;
        f(&mut session)
    }
}
