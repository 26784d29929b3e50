//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `tick` per frame, no blocking, no callbacks
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or persistence dependencies

pub mod collision;
pub mod difficulty;
pub mod physics;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionOutcome, CollisionResolver};
pub use difficulty::{DifficultyLevel, DifficultyProfile, resolve};
pub use physics::{Motion, PhysicsIntegrator, PlayerMode};
pub use session::{PhaseTransition, SessionPhase, SessionStateMachine};
pub use spawn::{SpawnScheduler, SpawnTimers, minimum_spacing};
pub use state::{DespawnReason, Entity, EntityId, EntityKind, GameEvent, PlayerState};
pub use tick::{Session, TickInput, final_score, tick};
