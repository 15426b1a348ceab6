//! Session Configuration
//!
//! Every tunable of a session, with defaults matching the standard
//! two-player game. Loadable from JSON; missing fields take defaults.

use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::vec2::{TilePos, TileRect};
use crate::game::input::ControlMap;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "TWINFIELD_CONFIG";

/// Default number of events a session retains for `take_events`.
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 1024;

/// Configuration for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Side length of the square map, in tiles
    pub map_size: u32,
    /// Number of players sharing the map
    pub player_count: usize,
    /// Tile every player starts on
    pub spawn_tile: TilePos,
    /// Placement attempts for the initial beer scatter
    pub beer_count: u32,
    /// Area the beer is scattered over (whole map when absent)
    pub beer_area: Option<TileRect>,
    /// Seed for the scatter RNG
    pub rng_seed: u64,
    /// Viewport radius in tiles (window is twice this on each side)
    pub viewport_radius: u32,
    /// Redraw every view after a drop instead of only the dropper's
    pub drop_redraw_all: bool,
    /// Key bindings per player; players without an entry get the defaults
    pub controls: Vec<ControlMap>,
    /// Events kept for `take_events`; the oldest are dropped past this
    pub event_log_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            map_size: 22,
            player_count: 2,
            spawn_tile: TilePos::new(10, 10),
            beer_count: 2,
            beer_area: None,
            rng_seed: 12345,
            viewport_radius: 11,
            drop_redraw_all: false,
            controls: Vec::new(),
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Default config with a different map size and player count.
    ///
    /// The spawn tile moves with the map centre, one tile up and left of it.
    pub fn with_size(map_size: u32, player_count: usize) -> Self {
        let centre = (map_size / 2) as i32 - 1;
        Self {
            map_size,
            player_count,
            spawn_tile: TilePos::new(centre, centre),
            ..Self::default()
        }
    }

    /// Controls for player `index`, falling back to the standard layout.
    pub fn controls_for(&self, index: usize) -> ControlMap {
        self.controls
            .get(index)
            .cloned()
            .unwrap_or_else(|| ControlMap::default_for_player(index))
    }

    /// Scatter area, defaulting to the whole map.
    pub fn beer_area(&self) -> TileRect {
        self.beer_area
            .unwrap_or_else(|| TileRect::square(self.map_size as i32))
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid config JSON.
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a config from JSON text.
pub fn from_json(text: &str) -> Result<SessionConfig, ConfigError> {
    Ok(serde_json::from_str(text)?)
}

/// Load a config from a JSON file.
pub fn load(path: impl AsRef<Path>) -> Result<SessionConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_json(&text)
}

/// Load the file named by `TWINFIELD_CONFIG`, or defaults when unset.
pub fn from_env() -> Result<SessionConfig, ConfigError> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => load(path),
        None => Ok(SessionConfig::default()),
    }
}
