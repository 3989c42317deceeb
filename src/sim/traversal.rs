//! Per-step movement of a point along the ladder
//!
//! A point is either on a vertical (descending) or on a rung (crossing to the
//! neighbouring vertical). Each call to [`step`] moves it a fixed distance and
//! may switch it from one to the other. Turning onto a rung is decided by
//! distance rather than by geometric crossing, so a discrete step can never
//! skip over a rung endpoint as long as `speed` exceeds the spacing error.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ladder::Ladder;
use super::segment::LineSegment;
use crate::consts::X_TOLERANCE;
use crate::error::{Result, SimError};
use crate::same_x;

/// Which line a point is currently travelling on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineRef {
    /// Index into the ladder's verticals
    Vertical(usize),
    /// Index into the ladder's rungs
    Rung(usize),
}

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved straight along the current line
    Advanced,
    /// Switched between a vertical and a rung
    Turned,
}

/// Movement state of one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalPoint {
    pub position: Vec2,
    /// Unit vector of travel
    pub direction: Vec2,
    /// Point currently being approached
    pub target: Vec2,
    pub line: LineRef,
}

impl TraversalPoint {
    /// A point at the start of vertical `index`, heading for its end
    pub fn at_vertical(ladder: &Ladder, index: usize) -> Self {
        let vertical = ladder.vertical(index);
        Self {
            position: vertical.start,
            direction: vertical.s_to_e(),
            target: vertical.end,
            line: LineRef::Vertical(index),
        }
    }

    /// The segment the point is on
    pub fn current_line<'a>(&self, ladder: &'a Ladder) -> &'a LineSegment {
        match self.line {
            LineRef::Vertical(i) => ladder.vertical(i),
            LineRef::Rung(i) => ladder.rung(i),
        }
    }

    /// True once the point has passed the terminal end of its vertical
    pub fn has_finished(&self, ladder: &Ladder) -> bool {
        match self.line {
            LineRef::Vertical(i) => self.position.y <= ladder.vertical(i).end.y,
            LineRef::Rung(_) => false,
        }
    }

    fn advance_straight(&mut self, speed: f32) -> Step {
        self.position += self.direction * speed;
        Step::Advanced
    }
}

/// Rung endpoint nearest below the point on one vertical
struct Candidate {
    rung: usize,
    via_start: bool,
    distance: f32,
}

/// Nearest rung whose chosen endpoint lies on vertical `x` strictly below `y`
fn nearest_below(
    rungs: &[LineSegment],
    x: f32,
    y: f32,
    via_start: bool,
) -> Option<Candidate> {
    rungs
        .iter()
        .enumerate()
        .filter_map(|(rung, seg)| {
            let endpoint = if via_start { seg.start } else { seg.end };
            (same_x(endpoint.x, x) && endpoint.y < y).then(|| Candidate {
                rung,
                via_start,
                distance: (endpoint.y - y).abs(),
            })
        })
        .min_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Choose the rung to turn onto, if the nearer candidate is within `speed`.
///
/// A start-matched candidate beats an end-matched one at equal distance.
fn pick_turn(from_start: Option<Candidate>, from_end: Option<Candidate>, speed: f32) -> Option<Candidate> {
    let nearest = match (from_start, from_end) {
        (None, None) => None,
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (Some(a), Some(b)) => Some(if a.distance <= b.distance { a } else { b }),
    };
    nearest.filter(|c| c.distance <= speed)
}

/// Advance `point` by `speed` along `ladder`.
///
/// On a vertical the point turns onto the nearest rung below it once that
/// rung's endpoint is within `speed`; a rung reached via its start wins a tie.
/// On a rung the point snaps onto the destination vertical once the next step
/// would touch it.
pub fn step(point: &mut TraversalPoint, ladder: &Ladder, speed: f32) -> Result<Step> {
    match point.line {
        LineRef::Vertical(index) => Ok(step_on_vertical(point, ladder, index, speed)),
        LineRef::Rung(_) => step_on_rung(point, ladder, speed),
    }
}

fn step_on_vertical(point: &mut TraversalPoint, ladder: &Ladder, index: usize, speed: f32) -> Step {
    let x = ladder.vertical(index).start.x;
    let y = point.position.y;

    let from_start = nearest_below(ladder.rungs(), x, y, true);
    let from_end = nearest_below(ladder.rungs(), x, y, false);

    let Some(candidate) = pick_turn(from_start, from_end, speed) else {
        return point.advance_straight(speed);
    };

    let rung = ladder.rung(candidate.rung);
    if candidate.via_start {
        point.position = rung.start;
        point.direction = rung.s_to_e();
        point.target = rung.end;
    } else {
        point.position = rung.end;
        point.direction = rung.e_to_s();
        point.target = rung.start;
    }
    point.line = LineRef::Rung(candidate.rung);
    Step::Turned
}

fn step_on_rung(point: &mut TraversalPoint, ladder: &Ladder, speed: f32) -> Result<Step> {
    let destination = ladder
        .vertical_at_x(point.target.x)
        .ok_or(SimError::MalformedLadder {
            target: point.target,
        })?;
    let vertical = ladder.vertical(destination);

    let probe = LineSegment::new(point.position, point.position + point.direction * speed);
    if !probe.intersects(vertical) {
        // Reaching the target's x without meeting the vertical means the
        // rung ends off the vertical's span; never walk past it
        let passed = (probe.end.x - point.target.x) * point.direction.x >= 0.0;
        if !passed {
            return Ok(point.advance_straight(speed));
        }
        if !on_span(vertical, point.target.y) {
            return Err(SimError::MalformedLadder {
                target: point.target,
            });
        }
    }

    point.position = point.target;
    point.direction = vertical.s_to_e();
    point.target = vertical.end;
    point.line = LineRef::Vertical(destination);
    Ok(Step::Turned)
}

/// True if `y` lies within the vertical's extent
fn on_span(vertical: &LineSegment, y: f32) -> bool {
    let (low, high) = (vertical.start.y.min(vertical.end.y), vertical.start.y.max(vertical.end.y));
    (low - X_TOLERANCE..=high + X_TOLERANCE).contains(&y)
}
