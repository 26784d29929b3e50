//! Session configuration
//!
//! One fully resolved, immutable value handed to the engine by whatever
//! configuration layer the host uses. The defaults are the Jump Sky tuning.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::HEIGHT_BAND_PLAYER_FACTOR;
use crate::error::{ConfigError, Result};

/// A collectible subtype with its score value and speed factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleSpec {
    pub name: String,
    pub value: u32,
    /// Velocity multiplier; higher value collectibles are thrown faster
    pub speed_factor: f64,
}

impl CollectibleSpec {
    pub fn new(name: impl Into<String>, value: u32, speed_factor: f64) -> Self {
        Self {
            name: name.into(),
            value,
            speed_factor,
        }
    }
}

/// Base constants for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    // === Difficulty bases ===
    /// Spawn interval before difficulty scaling (seconds)
    pub base_spawn_interval: f64,
    /// Hazard share before difficulty scaling
    pub base_hazard_ratio: f64,
    /// Live entity cap at difficulty 1
    pub base_max_concurrent: u32,
    /// Safe zone length before difficulty scaling (seconds)
    pub base_safe_zone_duration: f64,
    /// Gap between safe zones before difficulty scaling (seconds)
    pub base_safe_zone_cooldown: f64,
    /// A safe zone opens early if nothing has spawned after this long
    pub opening_safe_zone_delay: f64,

    // === Physics ===
    /// Downward acceleration (units/s²)
    pub gravity: f64,
    /// Jump apex above ground (units)
    pub jump_height: f64,

    // === Geometry (simulation units, ground at y = 0) ===
    /// Horizontal position of the player's center
    pub player_x: f64,
    /// Grounded hitbox size (width, height), feet at the player's height
    pub player_size: DVec2,
    /// Airborne hitbox size (tucked while jumping)
    pub airborne_player_size: DVec2,
    /// Entities enter here
    pub spawn_x: f64,
    /// Entities whose x falls below this are expired
    pub despawn_x: f64,

    // === Entities ===
    /// Base horizontal speed (units/s)
    pub base_speed: f64,
    pub hazard_subtypes: Vec<String>,
    pub hazard_half_size: DVec2,
    /// Per-spawn random speed factor range for hazards
    pub hazard_speed_range: (f64, f64),
    pub collectibles: Vec<CollectibleSpec>,
    pub collectible_half_size: DVec2,

    // === Session ===
    pub lives: u32,
    /// Minimum blink time after a life is lost (seconds)
    pub blink_duration: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_spawn_interval: 3.0,
            base_hazard_ratio: 0.25,
            base_max_concurrent: 4,
            base_safe_zone_duration: 15.0,
            base_safe_zone_cooldown: 30.0,
            opening_safe_zone_delay: 5.0,

            gravity: 800.0,
            jump_height: 150.0,

            player_x: 150.0,
            player_size: DVec2::new(24.0, 40.0),
            airborne_player_size: DVec2::new(24.0, 36.0),
            spawn_x: 850.0,
            despawn_x: -100.0,

            base_speed: 200.0,
            hazard_subtypes: vec!["bird1".into(), "bird2".into(), "bird3".into()],
            hazard_half_size: DVec2::splat(20.0),
            hazard_speed_range: (0.8, 1.8),
            collectibles: vec![
                CollectibleSpec::new("apple", 10, 1.0),
                CollectibleSpec::new("banana", 15, 1.3),
                CollectibleSpec::new("cherry", 20, 1.6),
                CollectibleSpec::new("orange", 25, 2.0),
            ],
            collectible_half_size: DVec2::splat(16.0),

            lives: 3,
            blink_duration: 1.0,
        }
    }
}

impl SessionConfig {
    /// Launch velocity that reaches `jump_height`
    pub fn jump_velocity(&self) -> f64 {
        (2.0 * self.gravity * self.jump_height).sqrt()
    }

    /// Highest point of the jump arc
    pub fn jump_apex(&self) -> f64 {
        self.jump_height
    }

    /// Vertical band entities spawn in: just above a standing player up to the apex
    pub fn height_band(&self) -> (f64, f64) {
        (
            self.player_size.y * HEIGHT_BAND_PLAYER_FACTOR,
            self.jump_apex(),
        )
    }

    /// Check every constant the engine relies on
    pub fn validate(&self) -> Result<()> {
        positive("base_spawn_interval", self.base_spawn_interval)?;
        positive("base_safe_zone_duration", self.base_safe_zone_duration)?;
        positive("base_safe_zone_cooldown", self.base_safe_zone_cooldown)?;
        positive("opening_safe_zone_delay", self.opening_safe_zone_delay)?;
        positive("gravity", self.gravity)?;
        positive("jump_height", self.jump_height)?;
        positive("base_speed", self.base_speed)?;
        positive("blink_duration", self.blink_duration)?;
        positive("player_size.x", self.player_size.x)?;
        positive("player_size.y", self.player_size.y)?;
        positive("airborne_player_size.x", self.airborne_player_size.x)?;
        positive("airborne_player_size.y", self.airborne_player_size.y)?;
        positive("hazard_half_size.x", self.hazard_half_size.x)?;
        positive("hazard_half_size.y", self.hazard_half_size.y)?;
        positive("collectible_half_size.x", self.collectible_half_size.x)?;
        positive("collectible_half_size.y", self.collectible_half_size.y)?;

        if !(0.0..=1.0).contains(&self.base_hazard_ratio) {
            return Err(ConfigError::NotAFraction {
                field: "base_hazard_ratio",
                value: self.base_hazard_ratio,
            });
        }
        if self.base_max_concurrent == 0 {
            return Err(ConfigError::NoConcurrentEntities);
        }
        if self.lives == 0 {
            return Err(ConfigError::NoLives);
        }

        let (low, high) = self.hazard_speed_range;
        positive("hazard_speed_range.0", low)?;
        if !high.is_finite() || high < low {
            return Err(ConfigError::InvalidRange {
                field: "hazard_speed_range",
                low,
                high,
            });
        }

        if !(self.spawn_x.is_finite() && self.despawn_x.is_finite())
            || self.despawn_x >= self.player_x
            || self.spawn_x <= self.player_x
        {
            return Err(ConfigError::InvalidRange {
                field: "despawn_x..spawn_x",
                low: self.despawn_x,
                high: self.spawn_x,
            });
        }

        let (band_low, band_high) = self.height_band();
        if band_low >= band_high {
            return Err(ConfigError::EmptyHeightBand {
                low: band_low,
                high: band_high,
            });
        }

        if self.hazard_subtypes.is_empty() {
            return Err(ConfigError::NoHazardSubtypes);
        }
        self.validate_collectibles()
    }

    fn validate_collectibles(&self) -> Result<()> {
        if self.collectibles.is_empty() {
            return Err(ConfigError::NoCollectibles);
        }
        for spec in &self.collectibles {
            if spec.value == 0 {
                return Err(ConfigError::WorthlessCollectible(spec.name.clone()));
            }
            positive("collectibles.speed_factor", spec.speed_factor)?;
        }

        let mut by_value: Vec<&CollectibleSpec> = self.collectibles.iter().collect();
        by_value.sort_by_key(|c| c.value);
        for pair in by_value.windows(2) {
            if pair[1].speed_factor < pair[0].speed_factor {
                return Err(ConfigError::NonMonotoneCollectibleSpeed {
                    cheaper: pair[0].name.clone(),
                    slower: pair[1].name.clone(),
                });
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
