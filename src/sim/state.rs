//! Game state and round bookkeeping
//!
//! `GameState` lives for the whole session. Each round gets its own `Round`,
//! which owns the ladder, the slot layout and the tokens; dropping the round
//! cancels every token in it.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand::seq::index;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ladder::Ladder;
use super::pencil::PathPencil;
use super::segment::LineSegment;
use super::traversal::TraversalPoint;
use crate::consts::*;
use crate::error::Result;
use crate::settings::{GameSettings, LaunchSettings};

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Ladder is laid out, waiting for the start signal
    ReadyToPlay,
    /// Tokens are descending
    Playing,
    /// Score reached the stage quota
    StageClear,
    /// A token reached a hazard
    GameOver,
}

/// What waits at the bottom of a vertical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Reward,
    Hazard,
}

/// Events for the host (rendering, sound, HUD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new ladder was laid out
    VerticalsCreated { lines: [LineSegment; VERTICAL_COUNT] },
    /// A rung was added (canned or drawn)
    RungAdded { rung: LineSegment },
    /// A drawn rung crossed an existing one and was discarded
    RungRejected { candidate: LineSegment },
    /// Reward/hazard layout for the round, indexed by vertical
    SlotsAssigned { slots: [SlotKind; VERTICAL_COUNT] },
    TokenSpawned { token: u32, vertical: usize, position: Vec2 },
    TokenMoved { token: u32, position: Vec2 },
    /// A token switched between a vertical and a rung
    Turned { token: u32 },
    /// A token reached the bottom of a vertical
    TokenArrived { token: u32, vertical: usize, slot: SlotKind },
    ScoreChanged { old: u32, new: u32 },
    PhaseChanged { phase: RoundPhase },
    SpeedUpToggled { on: bool },
}

/// A token descending the ladder
#[derive(Debug, Clone)]
pub struct Token {
    pub id: u32,
    /// Seconds left before the first step
    pub delay_remaining: f32,
    pub point: TraversalPoint,
}

impl Token {
    pub fn is_launched(&self) -> bool {
        self.delay_remaining <= 0.0
    }
}

/// Everything that exists for the duration of one round
#[derive(Debug, Clone)]
pub struct Round {
    /// 0-based stage number
    pub stage: u32,
    pub launch: LaunchSettings,
    pub ladder: Ladder,
    pub slots: [SlotKind; VERTICAL_COUNT],
    /// Tokens in id order
    pub tokens: Vec<Token>,
    /// Cleared when the round ends; tokens stop at their next batch
    pub alive: bool,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub settings: GameSettings,
    /// Rewards collected (GamePoint)
    pub score: u32,
    pub phase: RoundPhase,
    /// Speed-up input is held
    pub speed_up: bool,
    /// Scheduling tick counter
    pub time_ticks: u64,
    /// Current round (always present once constructed)
    pub round: Round,
    pub pencil: PathPencil,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the built-in settings
    pub fn new(seed: u64) -> Self {
        Self::build(seed, GameSettings::default())
    }

    /// Create a new game in ReadyToPlay with the first round laid out.
    ///
    /// Fails if `settings` does not pass [`GameSettings::validate`].
    pub fn with_settings(seed: u64, settings: GameSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::build(seed, settings))
    }

    fn build(seed: u64, settings: GameSettings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut events = Vec::new();
        let round = prepare_round(&settings, 0, &mut rng, &mut events);
        Self {
            seed,
            settings,
            score: 0,
            phase: RoundPhase::ReadyToPlay,
            speed_up: false,
            time_ticks: 0,
            round,
            pencil: PathPencil::default(),
            rng,
            events,
            next_id: 1,
        }
    }

    /// Stage number derived from the score
    pub fn stage(&self) -> u32 {
        self.score / POINTS_PER_STAGE
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at pending events without draining them
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Allocate a new token ID
    pub fn next_token_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn set_phase(&mut self, phase: RoundPhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?} (score {})", self.phase, phase, self.score);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged { phase });
        }
    }

    pub(crate) fn set_score(&mut self, score: u32) {
        if self.score != score {
            self.events.push(GameEvent::ScoreChanged {
                old: self.score,
                new: score,
            });
            self.score = score;
        }
    }

    /// Lay out a fresh round for the current stage and enter ReadyToPlay
    pub fn reset_round(&mut self) {
        self.pencil.reset();
        let stage = self.stage();
        self.round = prepare_round(&self.settings, stage, &mut self.rng, &mut self.events);
        self.set_phase(RoundPhase::ReadyToPlay);
    }

    /// Spawn the round's tokens with staggered delays and enter Playing
    pub fn launch_tokens(&mut self) {
        let launch = self.round.launch;
        let count = launch.player_count.min(VERTICAL_COUNT);
        let starts = sample_verticals(&mut self.rng, count);

        log::info!(
            "Launching {} token(s) at verticals {:?}, {}s apart",
            count,
            starts,
            launch.delayed_second
        );

        for (order, vertical) in starts.into_iter().enumerate() {
            let id = self.next_token_id();
            let point = TraversalPoint::at_vertical(&self.round.ladder, vertical);
            self.events.push(GameEvent::TokenSpawned {
                token: id,
                vertical,
                position: point.position,
            });
            self.round.tokens.push(Token {
                id,
                delay_remaining: order as f32 * launch.delayed_second,
                point,
            });
        }
        self.round.alive = true;
        self.set_phase(RoundPhase::Playing);
    }

    /// Abort the round in flight without evaluating any outcome.
    ///
    /// Tokens and the current gesture are discarded and the same stage is
    /// laid out again.
    pub fn cancel_round(&mut self) {
        log::info!("Cancelling round (stage {})", self.round.stage);
        self.round.alive = false;
        self.round.tokens.clear();
        self.reset_round();
    }
}

/// Build the ladder and slot layout for `stage`
fn prepare_round(
    settings: &GameSettings,
    stage: u32,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) -> Round {
    let launch = settings.stages.launch_for_stage(stage);
    let ladder = Ladder::with_rungs(settings.stages.canned_rungs_for_stage(stage));
    let slots = assign_slots(rng, launch.star_count);

    log::info!(
        "Stage {}: {} player(s), {} star(s), {} canned rung(s), slots {:?}",
        stage,
        launch.player_count,
        launch.star_count,
        ladder.rungs().len(),
        slots
    );

    events.push(GameEvent::VerticalsCreated {
        lines: *ladder.verticals(),
    });
    for rung in ladder.rungs() {
        events.push(GameEvent::RungAdded { rung: *rung });
    }
    events.push(GameEvent::SlotsAssigned { slots });

    Round {
        stage,
        launch,
        ladder,
        slots,
        tokens: Vec::new(),
        alive: false,
    }
}

/// Pick `count` distinct verticals in random order
pub fn sample_verticals<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<usize> {
    index::sample(rng, VERTICAL_COUNT, count.min(VERTICAL_COUNT)).into_vec()
}

/// Mark `star_count` random verticals as rewards, the rest as hazards
pub fn assign_slots<R: Rng + ?Sized>(rng: &mut R, star_count: usize) -> [SlotKind; VERTICAL_COUNT] {
    let mut slots = [SlotKind::Hazard; VERTICAL_COUNT];
    for i in sample_verticals(rng, star_count) {
        slots[i] = SlotKind::Reward;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn test_new_game_is_ready() {
        let state = GameState::new(7);
        assert_eq!(state.phase, RoundPhase::ReadyToPlay);
        assert_eq!(state.score, 0);
        assert_eq!(state.round.stage, 0);
        assert!(state.round.tokens.is_empty());
        assert!(matches!(
            state.events().first(),
            Some(GameEvent::VerticalsCreated { .. })
        ));
    }

    #[test]
    fn test_slot_assignment_counts() {
        let mut rng = Pcg32::seed_from_u64(3);
        for stars in 0..=4 {
            let slots = assign_slots(&mut rng, stars);
            let rewards = slots.iter().filter(|s| **s == SlotKind::Reward).count();
            assert_eq!(rewards, stars);
        }
        // More stars than verticals saturates
        let slots = assign_slots(&mut rng, 9);
        assert!(slots.iter().all(|s| *s == SlotKind::Reward));
    }

    #[test]
    fn test_sample_verticals_distinct() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let mut picked = sample_verticals(&mut rng, 3);
            assert_eq!(picked.len(), 3);
            picked.sort_unstable();
            picked.dedup();
            assert_eq!(picked.len(), 3);
            assert!(picked.iter().all(|i| *i < VERTICAL_COUNT));
        }
    }

    #[test]
    fn test_launch_staggers_tokens() {
        let mut state = GameState::new(5);
        state.set_score(15); // stage 3: three players, 1.5s apart
        state.reset_round();
        state.launch_tokens();

        assert_eq!(state.phase, RoundPhase::Playing);
        let delays: Vec<f32> = state.round.tokens.iter().map(|t| t.delay_remaining).collect();
        assert_eq!(delays, vec![0.0, 1.5, 3.0]);
        assert!(state.round.alive);
    }

    #[test]
    fn test_with_settings_rejects_invalid_tables() {
        let mut settings = GameSettings::default();
        settings.stages.launch.clear();
        assert!(matches!(
            GameState::with_settings(1, settings),
            Err(SimError::InvalidSettings(_))
        ));

        let mut settings = GameSettings::default();
        settings.stages.launch[0].game_speed = 0;
        assert!(GameState::with_settings(1, settings).is_err());

        let mut settings = GameSettings::default();
        settings.tuning.step_distance = 0.0;
        assert!(GameState::with_settings(1, settings).is_err());

        assert!(GameState::with_settings(1, GameSettings::default()).is_ok());
    }

    #[test]
    fn test_cancel_round_drops_tokens() {
        let mut state = GameState::new(5);
        state.launch_tokens();
        state.drain_events();

        state.cancel_round();
        assert!(state.round.tokens.is_empty());
        assert!(!state.round.alive);
        assert_eq!(state.phase, RoundPhase::ReadyToPlay);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::PhaseChanged { phase: RoundPhase::ReadyToPlay })
        );
    }
}
