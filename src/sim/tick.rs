//! Per-frame session step
//!
//! One call advances every component in a fixed order and returns the
//! events that happened, for collaborators to consume after the call.

use super::collision::{CollisionOutcome, CollisionResolver};
use super::difficulty::{DifficultyLevel, DifficultyProfile, resolve};
use super::physics::{PhysicsIntegrator, PlayerMode};
use super::session::{PhaseTransition, SessionPhase, SessionStateMachine};
use super::spawn::SpawnScheduler;
use super::state::{Entity, GameEvent, PlayerState};
use crate::config::SessionConfig;
use crate::consts::{MAX_DT, SIM_DT};
use crate::error::Result;

/// Input for a single tick (already debounced)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// The one button: jump while running, continue while paused
    pub press: bool,
}

impl TickInput {
    pub fn pressed() -> Self {
        Self { press: true }
    }
}

/// A single play session from first spawn to game over
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    level: DifficultyLevel,
    seed: u64,
    profile: DifficultyProfile,
    physics: PhysicsIntegrator,
    scheduler: SpawnScheduler,
    resolver: CollisionResolver,
    lifecycle: SessionStateMachine,
    /// Running substeps advanced
    time_ticks: u64,
}

impl Session {
    /// Validate the configuration and build a fresh session
    pub fn new(level: u8, config: SessionConfig, seed: u64) -> Result<Self> {
        let level = DifficultyLevel::new(level)?;
        config.validate()?;

        let profile = resolve(level, &config);
        let physics = PhysicsIntegrator::new(&config);
        let scheduler = SpawnScheduler::new(&config, &physics, seed);
        let resolver = CollisionResolver::new(&config);
        let lifecycle = SessionStateMachine::new(config.lives, config.blink_duration);

        log::info!(
            "Session start: difficulty {}, seed {}, jump {:.2}s, hazard spacing {:.2}s, profile {:?}",
            level.get(),
            seed,
            physics.jump_duration(),
            scheduler.min_interval(),
            profile
        );

        Ok(Self {
            config,
            level,
            seed,
            profile,
            physics,
            scheduler,
            resolver,
            lifecycle,
            time_ticks: 0,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn level(&self) -> DifficultyLevel {
        self.level
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn phase(&self) -> SessionPhase {
        self.lifecycle.phase()
    }

    pub fn lives(&self) -> u32 {
        self.lifecycle.lives()
    }

    pub fn score(&self) -> u64 {
        self.lifecycle.score()
    }

    pub fn is_game_over(&self) -> bool {
        self.lifecycle.is_game_over()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Live entities in spawn order
    pub fn entities(&self) -> &[Entity] {
        self.scheduler.live()
    }

    pub fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    pub fn physics(&self) -> &PhysicsIntegrator {
        &self.physics
    }

    /// Combined player snapshot
    pub fn player(&self) -> PlayerState {
        let motion = self.physics.motion();
        PlayerState {
            height: motion.height,
            vertical_velocity: motion.vertical_velocity,
            mode: motion.mode,
            lives: self.lifecycle.lives(),
            score: self.lifecycle.score(),
        }
    }

    /// Whether the renderer should draw the player this frame
    pub fn player_visible(&self) -> bool {
        self.lifecycle.player_visible()
    }

    /// Blink finished; the next press resumes play
    pub fn awaiting_continue(&self) -> bool {
        self.lifecycle.awaiting_continue()
    }

    pub fn in_safe_zone(&self) -> bool {
        self.scheduler.timers().in_safe_zone
    }

    /// Seconds left in the current safe zone, for the HUD
    pub fn safe_zone_remaining(&self) -> Option<f64> {
        self.scheduler.safe_zone_remaining(&self.profile)
    }

    /// Seconds until the next safe zone, for the HUD
    pub fn next_safe_zone_in(&self) -> Option<f64> {
        self.scheduler.next_safe_zone_in(&self.profile)
    }
}

/// Advance the session by `dt` seconds.
///
/// A running session is stepped in slices of at most `SIM_DT` so fast
/// entities cannot skip over the player; stepping stops at the first
/// phase change.
pub fn tick(state: &mut Session, input: &TickInput, dt: f64) -> Vec<GameEvent> {
    let dt = if dt.is_finite() && dt >= 0.0 {
        dt.min(MAX_DT)
    } else {
        log::warn!("Ignoring invalid tick dt {dt}");
        0.0
    };
    let mut events = Vec::new();

    match state.lifecycle.phase() {
        SessionPhase::GameOver => {}

        SessionPhase::LifeLostPause { .. } => {
            // Everything frozen; only the blink timer runs
            state.lifecycle.advance_pause(dt);
            if let Some(transition) = state.lifecycle.try_continue(input.press) {
                state.scheduler.reset();
                state.physics.reset();
                events.push(GameEvent::Phase(transition));
            }
        }

        SessionPhase::Running => {
            let mut remaining = dt;
            // The press is one-shot: only the first substep sees it
            let mut press = input.press;
            loop {
                let step = remaining.min(SIM_DT);
                run(state, press, step, &mut events);
                remaining -= step;
                press = false;
                if remaining <= SUBSTEP_EPSILON || !state.lifecycle.is_running() {
                    break;
                }
            }
        }
    }

    events
}

/// Leftover below this is rounding, not time
const SUBSTEP_EPSILON: f64 = 1e-9;

fn run(state: &mut Session, press: bool, dt: f64, events: &mut Vec<GameEvent>) {
    state.time_ticks += 1;

    // 1. Player physics
    let was_grounded = state.physics.motion().mode == PlayerMode::Grounded;
    let motion = state.physics.tick(dt, press);
    if was_grounded && motion.mode == PlayerMode::Airborne {
        log::debug!("Jump, vertical velocity {:.0}", motion.vertical_velocity);
        events.push(GameEvent::Jumped {
            vertical_velocity: state.physics.jump_velocity(),
        });
    }

    // 2. Entity motion and off-screen cleanup
    state.scheduler.advance(dt);

    // 3. Collisions
    let outcomes = state.resolver.tick(&state.player(), state.scheduler.live());
    let consumed: Vec<_> = outcomes.iter().map(CollisionOutcome::entity_id).collect();
    state.scheduler.consume(&consumed);
    for (entity, reason) in state.scheduler.drain_retired() {
        log::debug!("Despawned #{} ({:?})", entity.id, reason);
        events.push(GameEvent::Despawned {
            entity_id: entity.id,
            reason,
        });
    }
    events.extend(outcomes.iter().copied().map(GameEvent::Collision));

    // 4. Lives, score, phase
    let transitions = state.lifecycle.apply_all(&outcomes);
    let still_running = transitions.is_empty();
    events.extend(transitions.into_iter().map(GameEvent::Phase));
    if !still_running {
        return;
    }

    // 5. Safe zones and spawning
    let was_safe = state.scheduler.timers().in_safe_zone;
    let spawned = state.scheduler.tick(dt, &state.profile, &state.physics);
    match (was_safe, state.scheduler.timers().in_safe_zone) {
        (false, true) => events.push(GameEvent::SafeZoneStarted {
            duration: state.profile.safe_zone_duration,
        }),
        (true, false) => events.push(GameEvent::SafeZoneEnded),
        _ => {}
    }
    events.extend(spawned.into_iter().map(|entity| GameEvent::Spawned {
        entity_id: entity.id,
        kind: entity.kind,
        position: entity.pos,
        velocity: entity.velocity,
    }));
}

/// Final score if this batch ended the session
pub fn final_score(events: &[GameEvent]) -> Option<u64> {
    events.iter().find_map(|e| match e {
        GameEvent::Phase(PhaseTransition::GameOver { final_score }) => Some(*final_score),
        _ => None,
    })
}
