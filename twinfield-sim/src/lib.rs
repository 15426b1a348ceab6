//! # Twinfield Simulation
//!
//! Simulation core for a two-player grid game: each player walks a shared
//! tile map in their own scrolling viewport, picks up and drops objects,
//! and triggers redraws of one or every view.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TWINFIELD SIM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── fixed.rs      - Q16.16 fixed-point arithmetic           │
//! │  ├── vec2.rs       - Tile and sub-tile positions             │
//! │  ├── rng.rs        - Deterministic Xorshift128+ PRNG         │
//! │  └── hash.rs       - State hashing for replay checks         │
//! │                                                              │
//! │  game/             - Game logic (deterministic)              │
//! │  ├── terrain.rs    - Terrain catalog                         │
//! │  ├── map.rs        - Shared tile grid                        │
//! │  ├── objects.rs    - Object registry                         │
//! │  ├── movement.rs   - Movement with friction                  │
//! │  ├── collision.rs  - Collision detection                     │
//! │  ├── interaction.rs- Pickup rules                            │
//! │  ├── session.rs    - Turn orchestration                      │
//! │  ├── viewport.rs   - Renderer query                          │
//! │  └── shared.rs     - Shared handle for async hosts           │
//! │                                                              │
//! │  config.rs         - Session configuration                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Friction and collision math run in integer and Q16.16 fixed point.
//! Object placement randomness comes from a seeded Xorshift128+, so a
//! config plus an input sequence always yields the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod config;

// Re-export commonly used types
pub use crate::core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, POS_FACTOR};
pub use crate::core::vec2::{SubTilePos, TilePos, TileRect};
pub use crate::core::rng::DeterministicRng;
pub use config::SessionConfig;
pub use game::{Command, Direction, RedrawScope, Session, SessionError, SharedSession};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
