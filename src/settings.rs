//! Game settings and stage tables
//!
//! Static data: the built-in tables are the `Default` impls, and a host may
//! supply its own as JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{LADDER_END_Y, LADDER_START_Y, VERTICAL_COUNT};
use crate::error::{Result, SimError};
use crate::sim::ladder::Ladder;
use crate::sim::segment::LineSegment;

/// Launch parameters for one stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchSettings {
    /// Tokens launched at round start
    pub player_count: usize,
    /// Verticals that end in a reward
    pub star_count: usize,
    /// Seconds between consecutive token launches
    pub delayed_second: f32,
    /// Traversal steps per tick (larger is faster)
    pub game_speed: u32,
}

impl LaunchSettings {
    pub const fn new(player_count: usize, star_count: usize, delayed_second: f32, game_speed: u32) -> Self {
        Self {
            player_count,
            star_count,
            delayed_second,
            game_speed,
        }
    }
}

/// Built-in launch table, indexed by stage
const DEFAULT_LAUNCH: [LaunchSettings; 6] = [
    LaunchSettings::new(1, 2, 2.0, 1),
    LaunchSettings::new(2, 3, 2.0, 1),
    LaunchSettings::new(2, 2, 2.0, 1),
    LaunchSettings::new(3, 3, 1.5, 1),
    LaunchSettings::new(3, 2, 1.5, 1),
    LaunchSettings::new(3, 2, 1.5, 2),
];

/// How a drawn gesture is trimmed to the two verticals it crosses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClipMode {
    /// Recompute endpoints on the gesture's line at each vertical's x
    #[default]
    Slope,
    /// Clamp endpoint x to the verticals, keeping the drawn y
    Clamp,
}

/// Simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Distance moved per traversal step; also the turn tolerance
    pub step_distance: f32,
    /// Steps per tick while speed-up is held
    pub speed_up_rate: u32,
    /// How far a gesture's start is extended before the crossing test
    pub extend_length: f32,
    /// Gestures shorter than this are ignored
    pub min_gesture_length: f32,
    pub clip_mode: ClipMode,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            step_distance: 2.0,
            speed_up_rate: 5,
            extend_length: 10.0,
            min_gesture_length: 1.0,
            clip_mode: ClipMode::Slope,
        }
    }
}

/// Stage-indexed launch settings and canned rung sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTable {
    /// Launch settings; stages past the end reuse the last entry
    pub launch: Vec<LaunchSettings>,
    /// Rungs laid out before the player draws; stages past the end get none
    #[serde(default)]
    pub canned_rungs: Vec<Vec<LineSegment>>,
}

impl Default for StageTable {
    fn default() -> Self {
        let rung = |x0: f32, y0: f32, x1: f32, y1: f32| {
            LineSegment::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
        };
        Self {
            launch: DEFAULT_LAUNCH.to_vec(),
            canned_rungs: vec![
                Vec::new(),
                Vec::new(),
                vec![rung(235.0, 420.0, 395.0, 420.0)],
                vec![rung(75.0, 460.0, 235.0, 460.0), rung(395.0, 380.0, 555.0, 380.0)],
                vec![
                    rung(75.0, 480.0, 235.0, 480.0),
                    rung(235.0, 360.0, 395.0, 360.0),
                    rung(395.0, 240.0, 555.0, 240.0),
                ],
            ],
        }
    }
}

impl StageTable {
    /// Launch settings for `stage`, clamped to the last entry
    pub fn launch_for_stage(&self, stage: u32) -> LaunchSettings {
        let index = (stage as usize).min(self.launch.len().saturating_sub(1));
        self.launch[index]
    }

    /// Canned rungs for `stage` (empty beyond the table)
    pub fn canned_rungs_for_stage(&self, stage: u32) -> &[LineSegment] {
        self.canned_rungs
            .get(stage as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// All static configuration for a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSettings {
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub stages: StageTable,
}

impl GameSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: {} launch entries, {} canned rung sets",
            settings.stages.launch.len(),
            settings.stages.canned_rungs.len()
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tables the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.stages.launch.is_empty() {
            return Err(SimError::InvalidSettings("launch table is empty"));
        }
        if !(self.tuning.step_distance > 0.0) {
            return Err(SimError::InvalidSettings("step_distance must be positive"));
        }
        if self.tuning.speed_up_rate == 0 {
            return Err(SimError::InvalidSettings("speed_up_rate must be at least 1"));
        }
        for launch in &self.stages.launch {
            if launch.player_count == 0 || launch.player_count > VERTICAL_COUNT {
                return Err(SimError::InvalidSettings("player_count must be 1..=4"));
            }
            if launch.star_count > VERTICAL_COUNT {
                return Err(SimError::InvalidSettings("star_count must be at most 4"));
            }
            if launch.game_speed == 0 {
                return Err(SimError::InvalidSettings("game_speed must be at least 1"));
            }
            if !(launch.delayed_second >= 0.0) {
                return Err(SimError::InvalidSettings("delayed_second must not be negative"));
            }
        }

        let ladder = Ladder::new();
        for rung in self.stages.canned_rungs.iter().flatten() {
            let left = ladder.vertical_at_x(rung.start.x.min(rung.end.x));
            let right = ladder.vertical_at_x(rung.start.x.max(rung.end.x));
            if !matches!((left, right), (Some(l), Some(r)) if r == l + 1) {
                return Err(SimError::InvalidSettings("canned rungs must join adjacent verticals"));
            }
            let on_board = |y: f32| (LADDER_END_Y..=LADDER_START_Y).contains(&y);
            if !(on_board(rung.start.y) && on_board(rung.end.y)) {
                return Err(SimError::InvalidSettings("canned rung endpoints must lie on the verticals"));
            }
        }
        Ok(())
    }
}
