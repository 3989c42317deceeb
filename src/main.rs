//! Amida Ladder entry point
//!
//! Headless runner: an autopilot draws a rung or two per round, starts it,
//! and lets the simulation play out.

use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use amida_ladder::GameSettings;
use amida_ladder::consts::*;
use amida_ladder::sim::{FixedClock, GameEvent, GameState, RoundPhase, TickInput, tick};

/// Frames to wait in a finished phase before sending "continue"
const RESULT_PAUSE_FRAMES: u32 = 30;
/// Gives up on a round that never ends (should not happen)
const MAX_FRAMES_PER_ROUND: u32 = 60 * 60 * 10;

#[derive(Parser, Debug)]
#[command(name = "amida-ladder")]
#[command(about = "Play Amida Ladder rounds headlessly with a scripted pencil")]
struct Args {
    /// Game seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Settings JSON overriding the built-in tables
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Rounds to play before exiting
    #[arg(long, default_value_t = 10)]
    rounds: u32,
}

/// Session driver holding the game and its scripted input
struct Game {
    state: GameState,
    clock: FixedClock,
    /// Queued inputs, one per tick
    script: VecDeque<TickInput>,
    /// Autopilot's own RNG, independent of the simulation
    pilot: Pcg32,
    rounds_played: u32,
    best_score: u32,
    idle_frames: u32,
    round_frames: u32,
}

impl Game {
    fn new(seed: u64, settings: GameSettings) -> Result<Self> {
        Ok(Self {
            state: GameState::with_settings(seed, settings).context("building game state")?,
            clock: FixedClock::new(),
            script: VecDeque::new(),
            pilot: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            rounds_played: 0,
            best_score: 0,
            idle_frames: 0,
            round_frames: 0,
        })
    }

    /// Queue a stroke across a random gap, then the start signal
    fn plan_round(&mut self) {
        let strokes = self.pilot.random_range(1..=2);
        for _ in 0..strokes {
            let gap = self.pilot.random_range(0..VERTICAL_COUNT - 1);
            let y = self.pilot.random_range(LADDER_END_Y + 40.0..LADDER_START_Y - 40.0);
            let tilt = self.pilot.random_range(-20.0..20.0);
            let from = Vec2::new(VERTICAL_XS[gap] + 4.0, y);
            let to = Vec2::new(VERTICAL_XS[gap + 1] + 4.0, y + tilt);

            for t in [0.0, 0.5, 1.0] {
                self.script.push_back(TickInput {
                    pencil: Some(from.lerp(to, t)),
                    ..Default::default()
                });
            }
            self.script.push_back(TickInput::default());
        }
        self.script.push_back(TickInput {
            start: true,
            ..Default::default()
        });
    }

    fn next_input(&mut self) -> TickInput {
        if let Some(input) = self.script.pop_front() {
            return input;
        }
        match self.state.phase {
            RoundPhase::ReadyToPlay => {
                self.plan_round();
                self.script.pop_front().unwrap_or_default()
            }
            RoundPhase::Playing => TickInput {
                // Hold speed-up in the second half of long rounds
                speed_up: self.round_frames > 60 * 20,
                ..Default::default()
            },
            RoundPhase::StageClear | RoundPhase::GameOver => {
                self.idle_frames += 1;
                TickInput {
                    start: self.idle_frames >= RESULT_PAUSE_FRAMES,
                    ..Default::default()
                }
            }
        }
    }

    /// Run one display frame of `frame_dt` seconds
    fn update(&mut self, frame_dt: f32) -> Result<()> {
        let substeps = self.clock.advance(frame_dt);
        for _ in 0..substeps {
            let input = self.next_input();
            tick(&mut self.state, &input, SIM_DT)
                .with_context(|| format!("tick {} failed", self.state.time_ticks))?;
            for event in self.state.drain_events() {
                self.handle_event(&event);
            }
        }
        if self.state.phase == RoundPhase::Playing {
            self.round_frames += 1;
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::TokenMoved { .. } => {}
            GameEvent::PhaseChanged { phase } => {
                match phase {
                    RoundPhase::StageClear | RoundPhase::GameOver => {
                        self.rounds_played += 1;
                        self.idle_frames = 0;
                        log::info!(
                            "Round {} ended: {:?} with score {}",
                            self.rounds_played,
                            phase,
                            self.state.score
                        );
                    }
                    RoundPhase::Playing => self.round_frames = 0,
                    RoundPhase::ReadyToPlay => {}
                }
            }
            GameEvent::ScoreChanged { new, .. } => {
                self.best_score = self.best_score.max(*new);
                log::debug!("{event:?}");
            }
            other => log::debug!("{other:?}"),
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<GameSettings> {
    let Some(path) = path else {
        return Ok(GameSettings::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    GameSettings::from_json(&json).with_context(|| format!("loading settings from {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = match args.seed {
        Some(seed) => seed,
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .context("system clock is before the epoch")?
            .as_millis() as u64,
    };
    let settings = load_settings(args.settings.as_ref())?;
    let rounds = args.rounds;

    log::info!("Amida Ladder starting with seed {seed}, {rounds} round(s)");

    let mut game = Game::new(seed, settings)?;
    while game.rounds_played < rounds {
        game.update(SIM_DT)?;
        if game.state.phase == RoundPhase::Playing && game.round_frames > MAX_FRAMES_PER_ROUND {
            log::warn!("Round exceeded {MAX_FRAMES_PER_ROUND} frames, cancelling");
            game.state.cancel_round();
            game.script.clear();
        }
    }

    println!(
        "Played {} round(s): final score {}, best score {}, stage {}",
        game.rounds_played,
        game.state.score,
        game.best_score,
        game.state.stage() + 1
    );
    Ok(())
}
