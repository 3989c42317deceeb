//! Fixed-step scheduling clock
//!
//! Converts variable frame times into whole scheduling ticks of `SIM_DT`.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame accepted before clamping (a stalled tab or debugger pause)
const MAX_FRAME_DT: f32 = 0.25;

#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    accumulator: f32,
}

impl FixedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed time and return how many ticks to run.
    ///
    /// At most `MAX_SUBSTEPS` ticks are returned per frame; time beyond that
    /// stays in the accumulator.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Fraction of a tick left over (for render interpolation)
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).min(1.0)
    }
}
