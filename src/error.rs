//! Configuration errors
//!
//! The engine has no recoverable runtime errors; everything that can go
//! wrong is caught once when a session is constructed.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("difficulty {0} is outside 1..=10")]
    DifficultyOutOfRange(u8),

    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be a finite value in [0, 1], got {value}")]
    NotAFraction { field: &'static str, value: f64 },

    #[error("{field} range is invalid: [{low}, {high}]")]
    InvalidRange {
        field: &'static str,
        low: f64,
        high: f64,
    },

    #[error("height band is empty: player floor {low} is not below jump apex {high}")]
    EmptyHeightBand { low: f64, high: f64 },

    #[error("at least one hazard subtype is required")]
    NoHazardSubtypes,

    #[error("at least one collectible subtype is required")]
    NoCollectibles,

    #[error("collectible '{0}' has zero value")]
    WorthlessCollectible(String),

    #[error("collectible speed factors must not decrease as value increases ('{slower}' is slower than '{cheaper}')")]
    NonMonotoneCollectibleSpeed { cheaper: String, slower: String },

    #[error("max concurrent entities must be at least 1")]
    NoConcurrentEntities,

    #[error("lives must be at least 1")]
    NoLives,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
