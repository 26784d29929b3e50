//! Difficulty level to tunable parameters
//!
//! Every field moves in the "harder" direction as the level rises:
//! shorter spawn intervals and safe zones, more hazards and entities,
//! faster motion.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::consts::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::error::{ConfigError, Result};

/// Difficulty on the 1 (easy) to 10 (hard) scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DifficultyLevel(u8);

impl DifficultyLevel {
    pub fn new(level: u8) -> Result<Self> {
        if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ConfigError::DifficultyOutOfRange(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All levels, easiest first
    pub fn all() -> impl Iterator<Item = DifficultyLevel> {
        (MIN_DIFFICULTY..=MAX_DIFFICULTY).map(DifficultyLevel)
    }

    /// Steps above the easiest level
    fn steps(self) -> u32 {
        u32::from(self.0 - MIN_DIFFICULTY)
    }
}

impl TryFrom<u8> for DifficultyLevel {
    type Error = ConfigError;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

impl From<DifficultyLevel> for u8 {
    fn from(level: DifficultyLevel) -> u8 {
        level.0
    }
}

impl Default for DifficultyLevel {
    fn default() -> Self {
        Self(5)
    }
}

/// Spawn and pacing parameters derived once per session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Cadence floor between spawns (seconds)
    pub spawn_interval: f64,
    /// Probability that a spawn outside a safe zone is a hazard
    pub type_ratio: f64,
    /// Live entity cap
    pub max_concurrent: u32,
    /// Spawn height range (low, high) above ground
    pub height_band: (f64, f64),
    /// Multiplier on every entity's base speed
    pub speed_multiplier: f64,
    /// Length of each safe zone (seconds)
    pub safe_zone_duration: f64,
    /// Gap between safe zones (seconds)
    pub safe_zone_cooldown: f64,
}

/// Resolve a level into its profile
pub fn resolve(level: DifficultyLevel, config: &SessionConfig) -> DifficultyProfile {
    let steps = level.steps();
    let s = f64::from(steps);

    DifficultyProfile {
        spawn_interval: config.base_spawn_interval * (1.2 - 0.02 * s),
        type_ratio: (config.base_hazard_ratio * (0.5 + 0.06 * s)).clamp(0.0, 1.0),
        max_concurrent: config.base_max_concurrent + steps / 3,
        height_band: config.height_band(),
        speed_multiplier: 1.0 + 0.1 * s,
        safe_zone_duration: config.base_safe_zone_duration * (1.5 - 0.05 * s),
        safe_zone_cooldown: config.base_safe_zone_cooldown * (0.8 + 0.04 * s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn profiles(config: &SessionConfig) -> Vec<DifficultyProfile> {
        DifficultyLevel::all().map(|l| resolve(l, config)).collect()
    }

    #[test]
    fn test_level_bounds() {
        assert!(DifficultyLevel::new(0).is_err());
        assert!(DifficultyLevel::new(11).is_err());
        assert_eq!(DifficultyLevel::new(1).unwrap().get(), 1);
        assert_eq!(DifficultyLevel::new(10).unwrap().get(), 10);
        assert_eq!(DifficultyLevel::all().count(), 10);
    }

    #[test]
    fn test_level_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<DifficultyLevel>("7").is_ok());
        assert!(serde_json::from_str::<DifficultyLevel>("12").is_err());
    }

    #[test]
    fn test_default_profile_values() {
        let config = SessionConfig::default();
        let easy = resolve(DifficultyLevel::new(1).unwrap(), &config);
        assert!((easy.spawn_interval - 3.6).abs() < 1e-9);
        assert!((easy.type_ratio - 0.125).abs() < 1e-9);
        assert_eq!(easy.max_concurrent, 4);
        assert!((easy.safe_zone_duration - 22.5).abs() < 1e-9);
        assert!((easy.safe_zone_cooldown - 24.0).abs() < 1e-9);
        assert_eq!(easy.speed_multiplier, 1.0);

        let hard = resolve(DifficultyLevel::new(10).unwrap(), &config);
        assert_eq!(hard.max_concurrent, 7);
        assert!((hard.speed_multiplier - 1.9).abs() < 1e-9);
    }

    #[test]
    fn test_monotone_over_levels() {
        let all = profiles(&SessionConfig::default());
        for pair in all.windows(2) {
            let (easier, harder) = (&pair[0], &pair[1]);
            assert!(harder.spawn_interval < easier.spawn_interval);
            assert!(harder.safe_zone_duration < easier.safe_zone_duration);
            assert!(harder.type_ratio >= easier.type_ratio);
            assert!(harder.max_concurrent >= easier.max_concurrent);
            assert!(harder.speed_multiplier > easier.speed_multiplier);
        }
    }

    #[test]
    fn test_ratio_clamped_to_probability() {
        let config = SessionConfig {
            base_hazard_ratio: 1.0,
            ..Default::default()
        };
        for profile in profiles(&config) {
            assert!(profile.type_ratio <= 1.0);
        }
    }

    proptest! {
        #[test]
        fn prop_monotone_for_any_valid_bases(
            interval in 0.1f64..20.0,
            ratio in 0.0f64..1.0,
            max in 1u32..20,
            safe in 0.5f64..60.0,
            cooldown in 0.5f64..120.0,
        ) {
            let config = SessionConfig {
                base_spawn_interval: interval,
                base_hazard_ratio: ratio,
                base_max_concurrent: max,
                base_safe_zone_duration: safe,
                base_safe_zone_cooldown: cooldown,
                ..Default::default()
            };
            let all = profiles(&config);
            for pair in all.windows(2) {
                prop_assert!(pair[1].spawn_interval < pair[0].spawn_interval);
                prop_assert!(pair[1].safe_zone_duration < pair[0].safe_zone_duration);
                prop_assert!(pair[1].type_ratio >= pair[0].type_ratio);
                prop_assert!(pair[1].max_concurrent >= pair[0].max_concurrent);
                prop_assert!(pair[1].speed_multiplier > pair[0].speed_multiplier);
                prop_assert!(pair[1].spawn_interval > 0.0);
            }
        }
    }
}
