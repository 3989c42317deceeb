//! Fixed timestep simulation tick
//!
//! One call advances every token by one scheduling tick. Pencil input is
//! applied first, so a rung drawn this tick is visible to every token stepping
//! in it.

use glam::Vec2;
use rand::Rng;

use super::pencil::PencilOutcome;
use super::state::{GameEvent, GameState, Round, RoundPhase, SlotKind};
use super::traversal::{Step, TraversalPoint};
use crate::consts::*;
use crate::error::{Result, SimError};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pencil sample in ladder coordinates (None while lifted)
    pub pencil: Option<Vec2>,
    /// Start / continue signal
    pub start: bool,
    /// Speed-up is held
    pub speed_up: bool,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundEnd {
    Cleared,
    Failed,
}

/// Advance the game by one scheduling tick of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<()> {
    state.time_ticks += 1;

    if input.speed_up != state.speed_up {
        state.speed_up = input.speed_up;
        state.events.push(GameEvent::SpeedUpToggled { on: input.speed_up });
    }

    match state.phase {
        RoundPhase::ReadyToPlay | RoundPhase::Playing => apply_pencil(state, input.pencil),
        RoundPhase::StageClear | RoundPhase::GameOver => state.pencil.reset(),
    }

    if input.start {
        match state.phase {
            RoundPhase::ReadyToPlay => {
                state.launch_tokens();
                return Ok(());
            }
            RoundPhase::StageClear => {
                state.reset_round();
                return Ok(());
            }
            RoundPhase::GameOver => {
                state.set_score(0);
                state.reset_round();
                return Ok(());
            }
            RoundPhase::Playing => {}
        }
    }

    if state.phase == RoundPhase::Playing {
        advance_tokens(state, dt)?;
    }
    Ok(())
}

fn apply_pencil(state: &mut GameState, sample: Option<Vec2>) {
    let outcome = state
        .pencil
        .feed(sample, &mut state.round.ladder, &state.settings.tuning);
    match outcome {
        PencilOutcome::Accepted(rung) => state.events.push(GameEvent::RungAdded { rung }),
        PencilOutcome::Rejected(candidate) => {
            state.events.push(GameEvent::RungRejected { candidate })
        }
        PencilOutcome::Idle | PencilOutcome::Drawing => {}
    }
}

/// Steps per tick for the current round
pub fn sample_rate(state: &GameState) -> u32 {
    if state.speed_up {
        state.settings.tuning.speed_up_rate
    } else {
        state.round.launch.game_speed
    }
}

fn advance_tokens(state: &mut GameState, dt: f32) -> Result<()> {
    let rate = sample_rate(state);
    let speed = state.settings.tuning.step_distance;

    let GameState {
        round,
        rng,
        events,
        score,
        ..
    } = state;
    let Round {
        ladder,
        slots,
        tokens,
        alive,
        ..
    } = round;

    let mut ended = None;

    for token in tokens.iter_mut() {
        if !*alive {
            break;
        }
        if !token.is_launched() {
            token.delay_remaining -= dt;
            if !token.is_launched() {
                continue;
            }
        }

        for _ in 0..rate {
            if ladder.advance(&mut token.point, speed)? == Step::Turned {
                events.push(GameEvent::Turned { token: token.id });
            }
            events.push(GameEvent::TokenMoved {
                token: token.id,
                position: token.point.position,
            });

            if !token.point.has_finished(ladder) {
                continue;
            }

            let line = token.point.current_line(ladder);
            let vertical = ladder
                .vertical_index(line)
                .ok_or(SimError::MalformedLadder { target: line.end })?;
            let slot = slots[vertical];
            log::debug!("Token {} arrived at vertical {} ({:?})", token.id, vertical, slot);
            events.push(GameEvent::TokenArrived {
                token: token.id,
                vertical,
                slot,
            });

            match slot {
                SlotKind::Hazard => {
                    *alive = false;
                    ended = Some(RoundEnd::Failed);
                    break;
                }
                SlotKind::Reward => {
                    events.push(GameEvent::ScoreChanged {
                        old: *score,
                        new: *score + 1,
                    });
                    *score += 1;
                    if *score % POINTS_PER_STAGE == 0 {
                        *alive = false;
                        ended = Some(RoundEnd::Cleared);
                        break;
                    }

                    let respawn = rng.random_range(0..VERTICAL_COUNT);
                    token.point = TraversalPoint::at_vertical(ladder, respawn);
                    events.push(GameEvent::TokenSpawned {
                        token: token.id,
                        vertical: respawn,
                        position: token.point.position,
                    });
                }
            }
        }
    }

    if let Some(end) = ended {
        state.round.tokens.clear();
        state.pencil.reset();
        state.set_phase(match end {
            RoundEnd::Cleared => RoundPhase::StageClear,
            RoundEnd::Failed => RoundPhase::GameOver,
        });
    }
    Ok(())
}
