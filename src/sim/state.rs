//! Core simulation types
//!
//! Entities, the player snapshot, and the per-tick events handed to
//! collaborators (renderer, audio, persistence).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionOutcome;
use super::physics::PlayerMode;
use super::session::PhaseTransition;

/// Session-scoped entity identifier
pub type EntityId = u32;

/// What an entity is, and what it does on contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Costs a life on airborne contact
    Hazard {
        subtype: String,
        /// Random per-spawn velocity factor
        speed_factor: f64,
    },
    /// Awards `value` on contact in any mode
    Collectible {
        subtype: String,
        value: u32,
        /// Velocity factor from the subtype table
        speed_factor: f64,
    },
}

impl EntityKind {
    pub fn is_hazard(&self) -> bool {
        matches!(self, EntityKind::Hazard { .. })
    }

    pub fn subtype(&self) -> &str {
        match self {
            EntityKind::Hazard { subtype, .. } | EntityKind::Collectible { subtype, .. } => subtype,
        }
    }

    pub fn speed_factor(&self) -> f64 {
        match self {
            EntityKind::Hazard { speed_factor, .. }
            | EntityKind::Collectible { speed_factor, .. } => *speed_factor,
        }
    }
}

/// An approaching hazard or collectible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Center; y is height above ground
    pub pos: DVec2,
    /// Leftward speed (units/s)
    pub velocity: f64,
    /// Collision half-size
    pub half_extent: DVec2,
    /// Session clock at spawn (seconds)
    pub spawn_time: f64,
}

impl Entity {
    /// Move left by one step
    pub fn advance(&mut self, dt: f64) {
        self.pos.x -= self.velocity * dt;
    }

    /// Right edge has passed the despawn line
    pub fn is_past(&self, despawn_x: f64) -> bool {
        self.pos.x + self.half_extent.x < despawn_x
    }
}

/// Player snapshot shared with the collision resolver and collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub height: f64,
    pub vertical_velocity: f64,
    pub mode: PlayerMode,
    pub lives: u32,
    pub score: u64,
}

/// Why an entity left the live set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DespawnReason {
    /// Scrolled off screen
    Expired,
    /// Removed by a collision
    Consumed,
}

/// Events emitted from a single tick, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new entity entered the field
    Spawned {
        entity_id: EntityId,
        kind: EntityKind,
        position: DVec2,
        velocity: f64,
    },
    /// The player left the ground
    Jumped { vertical_velocity: f64 },
    /// Hazard hit or collectible picked up
    Collision(CollisionOutcome),
    /// An entity left the live set
    Despawned {
        entity_id: EntityId,
        reason: DespawnReason,
    },
    /// Collectibles only from now on
    SafeZoneStarted { duration: f64 },
    /// Hazards may spawn again
    SafeZoneEnded,
    /// Session phase changed
    Phase(PhaseTransition),
}
