//! Error type for the fallible parts of the simulation

use glam::Vec2;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// A point on a rung is heading for a place no vertical reaches.
    /// Insertion only accepts rungs clipped to verticals, so this means the
    /// ladder was built by hand with a stray rung.
    #[error("malformed ladder: no vertical at rung target ({}, {})", .target.x, .target.y)]
    MalformedLadder { target: Vec2 },

    /// Settings parsed but failed validation
    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),

    /// Settings JSON could not be parsed
    #[error("settings json: {0}")]
    Json(#[from] serde_json::Error),
}
