//! Spawn scheduling
//!
//! Decides when an entity enters the field and what it is. Spacing is
//! derived from the jump physics: two hazards are never closer than
//! `max(jump_duration * 1.44, 2.5)` seconds, so a player who just landed
//! always has time to react.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyProfile;
use super::physics::PhysicsIntegrator;
use super::state::{DespawnReason, Entity, EntityId, EntityKind};
use crate::config::SessionConfig;
use crate::consts::{JUMP_SAFETY_MARGIN, MIN_SPAWN_SPACING, SPAWN_JITTER_MAX, SPAWN_JITTER_MIN};

/// Minimum spacing between hazards for a given jump duration
pub fn minimum_spacing(jump_duration: f64) -> f64 {
    (jump_duration * JUMP_SAFETY_MARGIN).max(MIN_SPAWN_SPACING)
}

/// Cadence and safe-zone timers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub time_since_last_spawn: f64,
    pub time_since_last_hazard: f64,
    pub in_safe_zone: bool,
    pub safe_zone_elapsed: f64,
    pub safe_zone_cooldown_elapsed: f64,
    /// Randomized wait drawn after the last spawn attempt
    pub next_interval: f64,
    /// A hazard was drawn before the spacing allowed it and waits its turn
    pub hazard_pending: bool,
}

impl SpawnTimers {
    fn new(next_interval: f64) -> Self {
        Self {
            time_since_last_spawn: 0.0,
            time_since_last_hazard: 0.0,
            in_safe_zone: false,
            safe_zone_elapsed: 0.0,
            safe_zone_cooldown_elapsed: 0.0,
            next_interval,
            hazard_pending: false,
        }
    }
}

/// Owns the live entity set and decides what spawns next
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    config: SessionConfig,
    rng: Pcg32,
    timers: SpawnTimers,
    min_interval: f64,
    /// Live entities, oldest first
    live: Vec<Entity>,
    /// Entities that left the live set this tick
    retired: Vec<(Entity, DespawnReason)>,
    next_id: EntityId,
    /// Session clock (seconds of running time)
    clock: f64,
    hazards_spawned: u32,
    collectibles_spawned: u32,
}

impl SpawnScheduler {
    pub fn new(config: &SessionConfig, physics: &PhysicsIntegrator, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let min_interval = minimum_spacing(physics.jump_duration());
        let next_interval = draw_interval(&mut rng, min_interval);

        Self {
            config: config.clone(),
            rng,
            timers: SpawnTimers::new(next_interval),
            min_interval,
            live: Vec::new(),
            retired: Vec::new(),
            next_id: 1,
            clock: 0.0,
            hazards_spawned: 0,
            collectibles_spawned: 0,
        }
    }

    /// Advance timers and spawn at most one entity.
    ///
    /// Returns the entities spawned this tick (also added to the live set).
    pub fn tick(
        &mut self,
        dt: f64,
        profile: &DifficultyProfile,
        physics: &PhysicsIntegrator,
    ) -> Vec<Entity> {
        self.min_interval = minimum_spacing(physics.jump_duration());
        self.clock += dt;
        self.timers.time_since_last_spawn += dt;
        self.timers.time_since_last_hazard += dt;

        self.update_safe_zone(dt, profile);

        // A held hazard blocks the cadence until spacing, safe zones and
        // the cap all let it through
        if self.timers.hazard_pending {
            if self.timers.in_safe_zone
                || self.timers.time_since_last_hazard < self.min_interval
                || self.live.len() >= profile.max_concurrent as usize
            {
                return Vec::new();
            }
            self.timers.hazard_pending = false;
            self.timers.time_since_last_spawn = 0.0;
            return vec![self.admit(profile, true)];
        }

        let wait = self.timers.next_interval.max(profile.spawn_interval);
        if self.timers.time_since_last_spawn < wait {
            return Vec::new();
        }

        // Every attempt restarts the cadence, spawned or not
        self.timers.time_since_last_spawn = 0.0;
        self.timers.next_interval = draw_interval(&mut self.rng, self.min_interval);

        if self.live.len() >= profile.max_concurrent as usize {
            log::debug!(
                "Spawn skipped: {} live entities at cap {}",
                self.live.len(),
                profile.max_concurrent
            );
            return Vec::new();
        }

        let hazard = !self.timers.in_safe_zone && self.rng.random_bool(profile.type_ratio);
        if hazard && self.timers.time_since_last_hazard < self.min_interval {
            log::debug!(
                "Hazard held: {:.2}s since last, need {:.2}s",
                self.timers.time_since_last_hazard,
                self.min_interval
            );
            self.timers.hazard_pending = true;
            return Vec::new();
        }

        vec![self.admit(profile, hazard)]
    }

    fn admit(&mut self, profile: &DifficultyProfile, hazard: bool) -> Entity {
        let entity = self.spawn(profile, hazard);
        self.live.push(entity.clone());
        debug_assert!(self.live.len() <= profile.max_concurrent as usize);
        entity
    }

    fn update_safe_zone(&mut self, dt: f64, profile: &DifficultyProfile) {
        let t = &mut self.timers;
        if t.in_safe_zone {
            t.safe_zone_elapsed += dt;
            if t.safe_zone_elapsed >= profile.safe_zone_duration {
                t.in_safe_zone = false;
                t.safe_zone_elapsed = 0.0;
                t.safe_zone_cooldown_elapsed = 0.0;
                log::info!("Safe zone ended after {:.1}s", profile.safe_zone_duration);
            }
        } else {
            t.safe_zone_cooldown_elapsed += dt;
            let nothing_spawned = self.hazards_spawned + self.collectibles_spawned == 0;
            if t.safe_zone_cooldown_elapsed >= profile.safe_zone_cooldown
                || (nothing_spawned
                    && t.safe_zone_cooldown_elapsed > self.config.opening_safe_zone_delay)
            {
                t.in_safe_zone = true;
                t.safe_zone_elapsed = 0.0;
                log::info!(
                    "Safe zone started for {:.1}s (hazards {}, collectibles {})",
                    profile.safe_zone_duration,
                    self.hazards_spawned,
                    self.collectibles_spawned
                );
            }
        }
    }

    /// Build the next entity of the chosen kind: pick a subtype, a height
    /// and a speed
    fn spawn(&mut self, profile: &DifficultyProfile, hazard: bool) -> Entity {
        debug_assert!(!hazard || self.timers.time_since_last_hazard >= self.min_interval);

        let (kind, half_extent) = if hazard {
            let cfg = &self.config;
            let subtype = cfg.hazard_subtypes[self.rng.random_range(0..cfg.hazard_subtypes.len())].clone();
            let (low, high) = cfg.hazard_speed_range;
            let speed_factor = self.rng.random_range(low..=high);
            (
                EntityKind::Hazard {
                    subtype,
                    speed_factor,
                },
                cfg.hazard_half_size,
            )
        } else {
            let cfg = &self.config;
            let spec = &cfg.collectibles[self.rng.random_range(0..cfg.collectibles.len())];
            (
                EntityKind::Collectible {
                    subtype: spec.name.clone(),
                    value: spec.value,
                    speed_factor: spec.speed_factor,
                },
                cfg.collectible_half_size,
            )
        };

        let (band_low, band_high) = profile.height_band;
        let height = self.rng.random_range(band_low..=band_high);
        let velocity = self.config.base_speed * profile.speed_multiplier * kind.speed_factor();

        if hazard {
            self.timers.time_since_last_hazard = 0.0;
            self.hazards_spawned += 1;
        } else {
            self.collectibles_spawned += 1;
        }

        let id = self.next_id;
        self.next_id += 1;

        log::debug!(
            "Spawned #{id} {} at height {height:.0}, velocity {velocity:.0} (hazards {}, collectibles {})",
            kind.subtype(),
            self.hazards_spawned,
            self.collectibles_spawned
        );

        Entity {
            id,
            kind,
            pos: DVec2::new(self.config.spawn_x, height),
            velocity,
            half_extent,
            spawn_time: self.clock,
        }
    }

    /// Move every live entity and retire the ones that left the field
    pub fn advance(&mut self, dt: f64) {
        let despawn_x = self.config.despawn_x;
        for entity in &mut self.live {
            entity.advance(dt);
        }

        let mut i = 0;
        while i < self.live.len() {
            if self.live[i].is_past(despawn_x) {
                let entity = self.live.remove(i);
                self.retired.push((entity, DespawnReason::Expired));
            } else {
                i += 1;
            }
        }
    }

    /// Remove entities consumed by collisions
    pub fn consume(&mut self, ids: &[EntityId]) {
        let mut i = 0;
        while i < self.live.len() {
            if ids.contains(&self.live[i].id) {
                let entity = self.live.remove(i);
                self.retired.push((entity, DespawnReason::Consumed));
            } else {
                i += 1;
            }
        }
    }

    /// Hand over everything retired since the last drain
    pub fn drain_retired(&mut self) -> Vec<(Entity, DespawnReason)> {
        std::mem::take(&mut self.retired)
    }

    /// Clear the field and restart all timers (after a life is lost).
    /// Entity ids keep counting so they stay unique for the session.
    pub fn reset(&mut self) {
        self.live.clear();
        self.retired.clear();
        let next_interval = draw_interval(&mut self.rng, self.min_interval);
        self.timers = SpawnTimers::new(next_interval);
        self.hazards_spawned = 0;
        self.collectibles_spawned = 0;
    }

    #[cfg(test)]
    pub(crate) fn push_live(&mut self, entity: Entity) {
        self.live.push(entity);
    }

    pub fn live(&self) -> &[Entity] {
        &self.live
    }

    pub fn timers(&self) -> &SpawnTimers {
        &self.timers
    }

    pub fn min_interval(&self) -> f64 {
        self.min_interval
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn hazards_spawned(&self) -> u32 {
        self.hazards_spawned
    }

    pub fn collectibles_spawned(&self) -> u32 {
        self.collectibles_spawned
    }

    /// Seconds left in the current safe zone
    pub fn safe_zone_remaining(&self, profile: &DifficultyProfile) -> Option<f64> {
        self.timers
            .in_safe_zone
            .then(|| (profile.safe_zone_duration - self.timers.safe_zone_elapsed).max(0.0))
    }

    /// Seconds until the next safe zone opens
    pub fn next_safe_zone_in(&self, profile: &DifficultyProfile) -> Option<f64> {
        (!self.timers.in_safe_zone)
            .then(|| (profile.safe_zone_cooldown - self.timers.safe_zone_cooldown_elapsed).max(0.0))
    }
}

/// Fresh randomized cadence, never below the safety floor's jitter range
fn draw_interval(rng: &mut Pcg32, min_interval: f64) -> f64 {
    min_interval * rng.random_range(SPAWN_JITTER_MIN..=SPAWN_JITTER_MAX)
}
