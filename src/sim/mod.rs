//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (tokens by ID, rungs by insertion)
//! - No rendering or platform dependencies

pub mod clock;
pub mod ladder;
pub mod pencil;
pub mod segment;
pub mod state;
pub mod tick;
pub mod traversal;

pub use clock::FixedClock;
pub use ladder::Ladder;
pub use pencil::{PathPencil, PencilOutcome, build_rung};
pub use segment::{LineSegment, clip_between_verticals, clip_x, intersects};
pub use state::{GameEvent, GameState, Round, RoundPhase, SlotKind, Token, assign_slots, sample_verticals};
pub use tick::{TickInput, sample_rate, tick};
pub use traversal::{LineRef, Step, TraversalPoint, step};
