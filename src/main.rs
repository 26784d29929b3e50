//! Unipress headless runner
//!
//! Plays one seeded autopilot session per difficulty level and prints a
//! JSON summary. Set `RUST_LOG=debug` to follow spawns and collisions.

use serde::Serialize;

use unipress::consts::{MAX_DT, MAX_SUBSTEPS, SIM_DT};
use unipress::sim::{
    CollisionOutcome, DifficultyLevel, EntityKind, GameEvent, PhaseTransition, Session, TickInput,
    tick,
};
use unipress::SessionConfig;

const SEED: u64 = 0x5EED;
/// Give up on a session after this much simulated time (seconds)
const MAX_SESSION_TIME: f64 = 600.0;
/// Simulated frame times, cycled to exercise the accumulator
const FRAME_TIMES: [f64; 4] = [1.0 / 60.0, 1.0 / 58.0, 1.0 / 75.0, 1.0 / 30.0];

#[derive(Debug, Default, Serialize)]
struct Summary {
    difficulty: u8,
    final_score: u64,
    lives_left: u32,
    game_over: bool,
    seconds_played: f64,
    spawned_hazards: u32,
    spawned_collectibles: u32,
    collected: u32,
    lives_lost: u32,
    safe_zones: u32,
}

/// Fixed timestep driver holding leftover frame time
struct Runner {
    session: Session,
    accumulator: f64,
    input: TickInput,
}

impl Runner {
    fn new(session: Session) -> Self {
        Self {
            session,
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    /// Run simulation ticks for one rendered frame
    fn update(&mut self, frame_dt: f64, summary: &mut Summary) {
        self.accumulator += frame_dt.min(MAX_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let events = tick(&mut self.session, &self.input, SIM_DT);
            record(&events, summary);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot input is consumed by the first substep
            self.input.press = false;
        }
    }

    /// Decide whether to press the button this frame
    fn autopilot(&mut self) {
        if self.session.awaiting_continue() {
            self.input.press = true;
            return;
        }

        let player_x = self.session.config().player_x;
        let jump = self.session.physics().jump_duration();
        let eta = |x: f64, v: f64| (x - player_x) / v;

        let hazard_near = self.session.entities().iter().any(|e| {
            e.kind.is_hazard() && (-0.3..jump + 0.3).contains(&eta(e.pos.x, e.velocity))
        });
        let collectible_ready = self.session.entities().iter().any(|e| {
            matches!(e.kind, EntityKind::Collectible { .. })
                && (0.15..0.35).contains(&eta(e.pos.x, e.velocity))
        });

        self.input.press = collectible_ready && !hazard_near;
    }
}

fn record(events: &[GameEvent], summary: &mut Summary) {
    for event in events {
        match event {
            GameEvent::Spawned { kind, .. } if kind.is_hazard() => summary.spawned_hazards += 1,
            GameEvent::Spawned { .. } => summary.spawned_collectibles += 1,
            GameEvent::Collision(CollisionOutcome::ScoreGained { .. }) => summary.collected += 1,
            GameEvent::Collision(CollisionOutcome::LifeLost { .. }) => summary.lives_lost += 1,
            GameEvent::SafeZoneStarted { .. } => summary.safe_zones += 1,
            GameEvent::Phase(PhaseTransition::GameOver { final_score }) => {
                log::info!("Game over at difficulty {}: {}", summary.difficulty, final_score);
            }
            _ => {}
        }
    }
}

fn play(level: DifficultyLevel) -> unipress::Result<Summary> {
    let session = Session::new(level.get(), SessionConfig::default(), SEED + u64::from(level.get()))?;
    let mut runner = Runner::new(session);
    let mut summary = Summary {
        difficulty: level.get(),
        ..Default::default()
    };

    let mut elapsed = 0.0;
    let mut frame = 0;
    while elapsed < MAX_SESSION_TIME && !runner.session.is_game_over() {
        let frame_dt = FRAME_TIMES[frame % FRAME_TIMES.len()];
        runner.autopilot();
        runner.update(frame_dt, &mut summary);
        elapsed += frame_dt;
        frame += 1;
    }

    summary.final_score = runner.session.score();
    summary.lives_left = runner.session.lives();
    summary.game_over = runner.session.is_game_over();
    summary.seconds_played = elapsed;
    Ok(summary)
}

fn main() {
    env_logger::init();
    log::info!("Unipress headless runner starting...");

    let mut summaries = Vec::new();
    for level in DifficultyLevel::all() {
        match play(level) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                log::error!("Difficulty {}: {}", level.get(), e);
                std::process::exit(1);
            }
        }
    }

    match serde_json::to_string_pretty(&summaries) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode summary: {}", e),
    }
}
