//! Lives, score and phase
//!
//! The life-lost pause is gated twice: it must blink for at least
//! `blink_duration`, and after that it waits for the player's press.
//! Both gates are plain fields checked on each tick.

use serde::{Deserialize, Serialize};

use super::collision::CollisionOutcome;
use crate::consts::BLINK_TOGGLE_INTERVAL;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Entities move, spawn and collide
    Running,
    /// A life was lost; everything is frozen while the player blinks
    LifeLostPause { elapsed: f64 },
    /// No lives left (terminal)
    GameOver,
}

/// Phase change reported to collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseTransition {
    /// Running → LifeLostPause
    LifeLost { lives_left: u32 },
    /// LifeLostPause → Running
    Resumed,
    /// → GameOver, with the score to persist
    GameOver { final_score: u64 },
}

/// Owns lives, score and phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStateMachine {
    phase: SessionPhase,
    lives: u32,
    score: u64,
    blink_duration: f64,
}

impl SessionStateMachine {
    pub fn new(lives: u32, blink_duration: f64) -> Self {
        debug_assert!(lives > 0, "a session needs at least one life");
        Self {
            phase: SessionPhase::Running,
            lives,
            score: 0,
            blink_duration,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Apply one collision outcome. Only a running session reacts.
    pub fn apply(&mut self, outcome: CollisionOutcome) -> Option<PhaseTransition> {
        if !self.is_running() {
            return None;
        }

        match outcome {
            CollisionOutcome::ScoreGained { value, .. } => {
                self.score += u64::from(value);
                None
            }
            CollisionOutcome::LifeLost { .. } => {
                self.lives = self.lives.saturating_sub(1);
                if self.lives == 0 {
                    self.phase = SessionPhase::GameOver;
                    log::info!("Game over, final score {}", self.score);
                    Some(PhaseTransition::GameOver {
                        final_score: self.score,
                    })
                } else {
                    self.phase = SessionPhase::LifeLostPause { elapsed: 0.0 };
                    log::info!("Life lost, {} remaining", self.lives);
                    Some(PhaseTransition::LifeLost {
                        lives_left: self.lives,
                    })
                }
            }
        }
    }

    /// Apply a tick's outcomes in order, collecting phase changes.
    ///
    /// Every hazard contact costs a life, even when several land in the
    /// same tick, so the first may pause the session and a later one can
    /// still end it.
    pub fn apply_all(&mut self, outcomes: &[CollisionOutcome]) -> Vec<PhaseTransition> {
        let mut transitions = Vec::new();
        for &outcome in outcomes {
            if self.is_game_over() {
                break;
            }
            if let CollisionOutcome::LifeLost { .. } = outcome {
                if let SessionPhase::LifeLostPause { .. } = self.phase {
                    // Extra simultaneous hit: charge the life without a second pause
                    self.phase = SessionPhase::Running;
                    transitions.pop();
                }
            }
            transitions.extend(self.apply(outcome));
        }
        transitions
    }

    /// Advance the blink timer while paused
    pub fn advance_pause(&mut self, dt: f64) {
        if let SessionPhase::LifeLostPause { elapsed } = &mut self.phase {
            *elapsed += dt;
        }
    }

    /// True once the minimum blink has run and the press is awaited
    pub fn awaiting_continue(&self) -> bool {
        matches!(self.phase, SessionPhase::LifeLostPause { elapsed } if elapsed >= self.blink_duration)
    }

    /// Resume on the player's press, once the blink has run
    pub fn try_continue(&mut self, signal: bool) -> Option<PhaseTransition> {
        if signal && self.awaiting_continue() {
            self.phase = SessionPhase::Running;
            log::info!("Resuming with {} lives, score {}", self.lives, self.score);
            Some(PhaseTransition::Resumed)
        } else {
            None
        }
    }

    /// Blink state for the renderer: toggles every 0.1 s during the blink,
    /// then stays visible while waiting for the press
    pub fn player_visible(&self) -> bool {
        match self.phase {
            SessionPhase::LifeLostPause { elapsed } if elapsed < self.blink_duration => {
                (elapsed / BLINK_TOGGLE_INTERVAL) as u64 % 2 == 0
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIT: CollisionOutcome = CollisionOutcome::LifeLost { entity_id: 1 };

    fn gain(value: u32) -> CollisionOutcome {
        CollisionOutcome::ScoreGained {
            entity_id: 2,
            value,
        }
    }

    #[test]
    fn test_initial_state() {
        let s = SessionStateMachine::new(3, 1.0);
        assert_eq!(s.phase(), SessionPhase::Running);
        assert_eq!(s.lives(), 3);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_score_accumulates() {
        let mut s = SessionStateMachine::new(3, 1.0);
        assert_eq!(s.apply(gain(10)), None);
        assert_eq!(s.apply(gain(25)), None);
        assert_eq!(s.score(), 35);
        assert!(s.is_running());
    }

    #[test]
    fn test_life_lost_pauses() {
        let mut s = SessionStateMachine::new(3, 1.0);
        assert_eq!(
            s.apply(HIT),
            Some(PhaseTransition::LifeLost { lives_left: 2 })
        );
        assert_eq!(s.phase(), SessionPhase::LifeLostPause { elapsed: 0.0 });
        // Frozen: no scoring during the pause
        assert_eq!(s.apply(gain(10)), None);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_continue_requires_full_blink() {
        let mut s = SessionStateMachine::new(3, 1.0);
        s.apply(HIT);
        s.advance_pause(0.5);
        assert!(!s.awaiting_continue());
        assert_eq!(s.try_continue(true), None);

        s.advance_pause(0.6);
        assert!(s.awaiting_continue());
        // No auto-resume without the press
        assert_eq!(s.try_continue(false), None);
        assert_eq!(s.try_continue(true), Some(PhaseTransition::Resumed));
        assert!(s.is_running());
    }

    #[test]
    fn test_score_survives_life_loss() {
        let mut s = SessionStateMachine::new(3, 1.0);
        s.apply(gain(20));
        s.apply(HIT);
        s.advance_pause(1.0);
        s.try_continue(true);
        assert_eq!(s.score(), 20);
        assert_eq!(s.lives(), 2);
    }

    #[test]
    fn test_last_life_ends_game_and_freezes_score() {
        let mut s = SessionStateMachine::new(1, 1.0);
        s.apply(gain(15));
        assert_eq!(
            s.apply(HIT),
            Some(PhaseTransition::GameOver { final_score: 15 })
        );
        assert!(s.is_game_over());
        assert_eq!(s.apply(gain(10)), None);
        s.advance_pause(5.0);
        assert_eq!(s.try_continue(true), None);
        assert_eq!(s.score(), 15);
        assert_eq!(s.lives(), 0);
    }

    #[test]
    fn test_simultaneous_hits_each_cost_a_life() {
        let mut s = SessionStateMachine::new(3, 1.0);
        let transitions = s.apply_all(&[HIT, HIT]);
        assert_eq!(s.lives(), 1);
        assert_eq!(
            transitions,
            vec![PhaseTransition::LifeLost { lives_left: 1 }]
        );
        assert!(matches!(s.phase(), SessionPhase::LifeLostPause { .. }));

        let mut s = SessionStateMachine::new(2, 1.0);
        let transitions = s.apply_all(&[HIT, HIT, HIT]);
        assert_eq!(s.lives(), 0);
        assert_eq!(
            transitions,
            vec![PhaseTransition::GameOver { final_score: 0 }]
        );
    }

    #[test]
    fn test_blink_toggles_then_stays_visible() {
        let mut s = SessionStateMachine::new(3, 1.0);
        assert!(s.player_visible());
        s.apply(HIT);
        s.advance_pause(0.05);
        assert!(s.player_visible());
        s.advance_pause(0.1);
        assert!(!s.player_visible());
        s.advance_pause(1.0);
        assert!(s.player_visible());
    }
}
