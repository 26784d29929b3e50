//! Vertical player motion
//!
//! The player never moves horizontally; the world scrolls past. Height is
//! measured from the ground (y = 0) to the player's feet.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;

/// Whether the player is standing or in a jump arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerMode {
    #[default]
    Grounded,
    Airborne,
}

/// Instantaneous vertical state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Motion {
    pub height: f64,
    pub vertical_velocity: f64,
    pub mode: PlayerMode,
}

/// Gravity/jump integrator
#[derive(Debug, Clone)]
pub struct PhysicsIntegrator {
    gravity: f64,
    jump_height: f64,
    jump_velocity: f64,
    motion: Motion,
}

impl PhysicsIntegrator {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            gravity: config.gravity,
            jump_height: config.jump_height,
            jump_velocity: config.jump_velocity(),
            motion: Motion::default(),
        }
    }

    /// Advance one step. A jump request only takes effect from the ground.
    pub fn tick(&mut self, dt: f64, jump_requested: bool) -> Motion {
        let m = &mut self.motion;

        if jump_requested && m.mode == PlayerMode::Grounded {
            m.vertical_velocity = self.jump_velocity;
            m.mode = PlayerMode::Airborne;
        }

        if m.mode == PlayerMode::Airborne {
            m.vertical_velocity -= self.gravity * dt;
            m.height += m.vertical_velocity * dt;

            if m.height <= 0.0 {
                m.height = 0.0;
                m.vertical_velocity = 0.0;
                m.mode = PlayerMode::Grounded;
            }
        }

        *m
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Time from takeoff to landing for a full jump
    pub fn jump_duration(&self) -> f64 {
        2.0 * (2.0 * self.jump_height / self.gravity).sqrt()
    }

    /// Launch velocity used for every jump
    pub fn jump_velocity(&self) -> f64 {
        self.jump_velocity
    }

    /// Put the player back on the ground at rest
    pub fn reset(&mut self) {
        self.motion = Motion::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 240.0;

    fn integrator() -> PhysicsIntegrator {
        PhysicsIntegrator::new(&SessionConfig::default())
    }

    #[test]
    fn test_jump_from_ground() {
        let mut body = integrator();
        let m = body.tick(DT, true);
        assert_eq!(m.mode, PlayerMode::Airborne);
        assert!(m.height > 0.0);
        assert!(m.vertical_velocity > 0.0);
    }

    #[test]
    fn test_no_double_jump() {
        let mut body = integrator();
        body.tick(DT, true);
        for _ in 0..20 {
            body.tick(DT, false);
        }
        let before = body.motion();
        let after = body.tick(DT, true);
        // Velocity keeps decaying instead of being reset to the launch value
        assert!(after.vertical_velocity < before.vertical_velocity);
    }

    #[test]
    fn test_lands_and_clamps_to_ground() {
        let mut body = integrator();
        body.tick(DT, true);
        let mut steps = 1;
        while body.motion().mode == PlayerMode::Airborne {
            body.tick(DT, false);
            steps += 1;
            assert!(steps < 10_000, "never landed");
        }
        let m = body.motion();
        assert_eq!(m.height, 0.0);
        assert_eq!(m.vertical_velocity, 0.0);

        // Airtime matches the analytic jump duration within a couple of steps
        let airtime = steps as f64 * DT;
        assert!((airtime - body.jump_duration()).abs() < 3.0 * DT);
    }

    #[test]
    fn test_apex_near_jump_height() {
        let mut body = integrator();
        let mut apex: f64 = 0.0;
        body.tick(DT, true);
        while body.motion().mode == PlayerMode::Airborne {
            apex = apex.max(body.tick(DT, false).height);
        }
        assert!((apex - 150.0).abs() < 2.0, "apex {apex}");
    }

    #[test]
    fn test_jump_duration_formula() {
        let body = integrator();
        let expected = 2.0 * (2.0f64 * 150.0 / 800.0).sqrt();
        assert!((body.jump_duration() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_grounded_idle_is_stationary() {
        let mut body = integrator();
        let m = body.tick(1.0, false);
        assert_eq!(m, Motion::default());
    }

    #[test]
    fn test_reset() {
        let mut body = integrator();
        body.tick(DT, true);
        body.reset();
        assert_eq!(body.motion().mode, PlayerMode::Grounded);
        assert_eq!(body.motion().height, 0.0);
    }
}
