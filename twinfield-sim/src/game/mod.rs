//! Game Logic Module
//!
//! The simulation core. Everything here is deterministic for a given
//! config and input sequence.
//!
//! ## Module Structure
//!
//! - `terrain`: Terrain catalog and friction
//! - `map`: Shared tile grid and generator
//! - `objects`: Object registry
//! - `movement`: Friction-aware movement resolver
//! - `collision`: Player/object overlap detection
//! - `interaction`: Pickup rules
//! - `state`: Per-player state
//! - `input`: Commands and key bindings
//! - `events`: Turn events for logging and replay checks
//! - `session`: Turn orchestration and redraw scope
//! - `viewport`: Read-only window for renderers
//! - `shared`: Session handle for concurrent hosts

pub mod terrain;
pub mod map;
pub mod objects;
pub mod movement;
pub mod collision;
pub mod interaction;
pub mod state;
pub mod input;
pub mod events;
pub mod session;
pub mod viewport;
pub mod shared;

// Re-export key types
pub use input::{ActKind, Command, ControlMap};
pub use map::TileGrid;
pub use movement::Direction;
pub use objects::{GameObject, ObjectKind, ObjectRegistry};
pub use session::{RedrawScope, Session, SessionError, TurnResult};
pub use shared::SharedSession;
pub use state::PlayerState;
pub use viewport::Viewport;
pub use events::GameEvent;
