//! Player vs entity collision detection and priority resolution
//!
//! Hazards occupy the jump arc, so a grounded player is always safe from
//! them. Collectibles can be taken anywhere on the arc. When both kinds
//! overlap in the same tick the hazard wins and nothing is scored.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::physics::PlayerMode;
use super::state::{Entity, EntityId, EntityKind, PlayerState};
use crate::config::SessionConfig;

/// Axis-aligned box given by center and half-size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: DVec2,
    pub half: DVec2,
}

impl Aabb {
    pub fn new(center: DVec2, half: DVec2) -> Self {
        Self { center, half }
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }
}

/// Result of a single contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionOutcome {
    LifeLost { entity_id: EntityId },
    ScoreGained { entity_id: EntityId, value: u32 },
}

impl CollisionOutcome {
    /// The entity this outcome consumes
    pub fn entity_id(&self) -> EntityId {
        match *self {
            CollisionOutcome::LifeLost { entity_id }
            | CollisionOutcome::ScoreGained { entity_id, .. } => entity_id,
        }
    }
}

/// Stateless per-tick collision pass
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    player_x: f64,
    grounded_size: DVec2,
    airborne_size: DVec2,
}

impl CollisionResolver {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            player_x: config.player_x,
            grounded_size: config.player_size,
            airborne_size: config.airborne_player_size,
        }
    }

    /// Player hitbox for the current mode, feet at `player.height`
    pub fn player_hitbox(&self, player: &PlayerState) -> Aabb {
        let size = match player.mode {
            PlayerMode::Grounded => self.grounded_size,
            PlayerMode::Airborne => self.airborne_size,
        };
        let half = size / 2.0;
        Aabb::new(DVec2::new(self.player_x, player.height + half.y), half)
    }

    /// Test every live entity against the player.
    ///
    /// Any hazard contact suppresses all collectible outcomes for the tick;
    /// suppressed collectibles stay in play.
    pub fn tick(&self, player: &PlayerState, entities: &[Entity]) -> Vec<CollisionOutcome> {
        let hitbox = self.player_hitbox(player);
        let airborne = player.mode == PlayerMode::Airborne;

        let mut hazards = Vec::new();
        let mut collectibles = Vec::new();

        for entity in entities {
            if !hitbox.overlaps(&Aabb::new(entity.pos, entity.half_extent)) {
                continue;
            }
            match entity.kind {
                EntityKind::Hazard { .. } if airborne => {
                    hazards.push(CollisionOutcome::LifeLost {
                        entity_id: entity.id,
                    });
                }
                EntityKind::Hazard { .. } => {}
                EntityKind::Collectible { value, .. } => {
                    collectibles.push(CollisionOutcome::ScoreGained {
                        entity_id: entity.id,
                        value,
                    });
                }
            }
        }

        if hazards.is_empty() { collectibles } else { hazards }
    }
}
