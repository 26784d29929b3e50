//! Unipress - session engine for one-button arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty, physics, spawning, collisions, session)
//! - `config`: Fully resolved session configuration
//! - `error`: Configuration errors surfaced at session construction

pub mod config;
pub mod error;
pub mod sim;

pub use config::{CollectibleSpec, SessionConfig};
pub use error::{ConfigError, Result};
pub use sim::{GameEvent, Session, TickInput, tick};

/// Engine constants that are not tunable per game
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest dt a single tick will integrate
    pub const MAX_DT: f64 = 0.1;

    /// Difficulty scale bounds (inclusive)
    pub const MIN_DIFFICULTY: u8 = 1;
    pub const MAX_DIFFICULTY: u8 = 10;

    /// Multiplier on jump duration for the minimum hazard spacing
    pub const JUMP_SAFETY_MARGIN: f64 = 1.44;
    /// Absolute floor on hazard spacing (seconds)
    pub const MIN_SPAWN_SPACING: f64 = 2.5;
    /// Random cadence jitter applied to the minimum interval
    pub const SPAWN_JITTER_MIN: f64 = 0.8;
    pub const SPAWN_JITTER_MAX: f64 = 2.5;

    /// Band lower bound as a multiple of the player collision height
    pub const HEIGHT_BAND_PLAYER_FACTOR: f64 = 1.5;

    /// Blink toggle period while a life-lost pause is blinking (seconds)
    pub const BLINK_TOGGLE_INTERVAL: f64 = 0.1;
}
