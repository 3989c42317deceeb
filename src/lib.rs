//! Amida Ladder - a ghost-leg lottery board simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (segment geometry, ladder, traversal, rounds)
//! - `settings`: Stage launch table, canned rungs and tuning
//! - `error`: Error type shared by the fallible operations

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use settings::{ClipMode, GameSettings, LaunchSettings, StageTable, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed scheduling tick (one tick per display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of vertical lines on the board
    pub const VERTICAL_COUNT: usize = 4;
    /// X coordinate of each vertical, left to right
    pub const VERTICAL_XS: [f32; VERTICAL_COUNT] = [75.0, 235.0, 395.0, 555.0];
    /// Y where tokens enter a vertical
    pub const LADDER_START_Y: f32 = 590.0;
    /// Y of the terminal endpoint (reward/hazard slot)
    pub const LADDER_END_Y: f32 = 50.0;

    /// Tolerance when matching a coordinate to a vertical's x
    pub const X_TOLERANCE: f32 = 1e-3;

    /// Rewards needed to clear a stage
    pub const POINTS_PER_STAGE: u32 = 5;
}

/// Returns true if two x coordinates name the same vertical
#[inline]
pub fn same_x(a: f32, b: f32) -> bool {
    (a - b).abs() <= consts::X_TOLERANCE
}

/// Start and end point of vertical `index`
#[inline]
pub fn vertical_endpoints(index: usize) -> (Vec2, Vec2) {
    let x = consts::VERTICAL_XS[index];
    (
        Vec2::new(x, consts::LADDER_START_Y),
        Vec2::new(x, consts::LADDER_END_Y),
    )
}
