//! Turns pencil gestures into rungs
//!
//! The pencil reports `Some(point)` while a gesture is active and `None`
//! otherwise. The first `Some` after a `None` fixes the gesture's start; every
//! later `Some` tries to build a rung from start to the current point. Once a
//! rung is accepted or rejected the gesture is spent, and further points are
//! ignored until the pencil is lifted.

use glam::Vec2;

use super::ladder::Ladder;
use super::segment::{LineSegment, clip_between_verticals, clip_x};
use crate::settings::{ClipMode, Tuning};

/// Result of feeding one pencil sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PencilOutcome {
    /// Pencil is up or the gesture is spent
    Idle,
    /// Gesture in progress, no rung yet
    Drawing,
    /// Rung accepted into the ladder (as stored, left to right)
    Accepted(LineSegment),
    /// Candidate crossed an existing rung; gesture stopped
    Rejected(LineSegment),
}

impl PencilOutcome {
    /// True if the host should stop the gesture it is drawing
    pub fn stops_gesture(&self) -> bool {
        matches!(self, PencilOutcome::Accepted(_) | PencilOutcome::Rejected(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Gesture {
    #[default]
    Up,
    Drawing { start: Vec2 },
    /// Finished with a rung (or rejection); waiting for the pencil to lift
    Spent,
}

/// Input-to-rung adapter
#[derive(Debug, Clone, Default)]
pub struct PathPencil {
    gesture: Gesture,
}

impl PathPencil {
    /// Drop any gesture in progress
    pub fn reset(&mut self) {
        self.gesture = Gesture::Up;
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.gesture, Gesture::Drawing { .. })
    }

    /// Gesture start point, while drawing
    pub fn gesture_start(&self) -> Option<Vec2> {
        match self.gesture {
            Gesture::Drawing { start } => Some(start),
            _ => None,
        }
    }

    /// Feed the pencil's current sample
    pub fn feed(&mut self, sample: Option<Vec2>, ladder: &mut Ladder, tuning: &Tuning) -> PencilOutcome {
        let Some(current) = sample else {
            self.gesture = Gesture::Up;
            return PencilOutcome::Idle;
        };

        let start = match self.gesture {
            Gesture::Up => {
                self.gesture = Gesture::Drawing { start: current };
                return PencilOutcome::Drawing;
            }
            Gesture::Spent => return PencilOutcome::Idle,
            Gesture::Drawing { start } => start,
        };

        let stroke = LineSegment::new(start, current);
        if stroke.length() < tuning.min_gesture_length {
            return PencilOutcome::Drawing;
        }

        let Some(candidate) = build_rung(&stroke, ladder, tuning) else {
            return PencilOutcome::Drawing;
        };

        self.gesture = Gesture::Spent;
        if ladder.try_add_rung(candidate) {
            let rung = *ladder.rungs().last().unwrap_or(&candidate);
            log::debug!(
                "Rung added ({}, {}) -> ({}, {}), {} total",
                rung.start.x,
                rung.start.y,
                rung.end.x,
                rung.end.y,
                ladder.rungs().len()
            );
            PencilOutcome::Accepted(rung)
        } else {
            log::debug!("Rung rejected: crosses an existing rung");
            PencilOutcome::Rejected(candidate)
        }
    }
}

/// Build a candidate rung from a stroke, if it spans two adjacent verticals.
///
/// The stroke's start is extended first so a short flick that stops just
/// short of a vertical still registers.
pub fn build_rung(stroke: &LineSegment, ladder: &Ladder, tuning: &Tuning) -> Option<LineSegment> {
    let extended = stroke.extend_start(tuning.extend_length);
    ladder.verticals().windows(2).find_map(|pair| {
        let (left, right) = (&pair[0], &pair[1]);
        if !(extended.intersects(left) && extended.intersects(right)) {
            return None;
        }
        let clipped = match tuning.clip_mode {
            ClipMode::Slope => clip_between_verticals(&extended, left, right),
            ClipMode::Clamp => clamp_to_span(&clip_x(&extended, left.start.x, right.start.x), left),
        };
        Some(clipped.left_to_right())
    })
}

/// Keep both endpoints' y within the y range of `vertical`
fn clamp_to_span(seg: &LineSegment, vertical: &LineSegment) -> LineSegment {
    let (low, high) = (vertical.start.y.min(vertical.end.y), vertical.start.y.max(vertical.end.y));
    let clamp = |p: Vec2| Vec2::new(p.x, p.y.clamp(low, high));
    LineSegment::new(clamp(seg.start), clamp(seg.end))
}
