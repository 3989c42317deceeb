//! Line segment geometry for verticals and rungs
//!
//! A segment is an ordered pair of points. Direction matters: tokens travel
//! from `start` to `end` on verticals, and rungs are stored left to right.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An immutable 2D line segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Vec2,
    pub end: Vec2,
}

impl LineSegment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Unit vector from start toward end (zero for a degenerate segment)
    #[inline]
    pub fn s_to_e(&self) -> Vec2 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Unit vector from end toward start (zero for a degenerate segment)
    #[inline]
    pub fn e_to_s(&self) -> Vec2 {
        (self.start - self.end).normalize_or_zero()
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    /// True if start and end coincide
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length() < f32::EPSILON
    }

    /// Same segment with start and end swapped
    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Orient the segment so that `start.x <= end.x`
    pub fn left_to_right(&self) -> Self {
        if self.start.x > self.end.x {
            self.reversed()
        } else {
            *self
        }
    }

    /// Check whether two segments share at least one point.
    ///
    /// Touching endpoints and colinear overlap both count as intersecting.
    pub fn intersects(&self, other: &LineSegment) -> bool {
        intersects(self, other)
    }

    /// Move `start` further away from `end` by `length`
    pub fn extend_start(&self, length: f32) -> Self {
        Self::new(self.start + self.e_to_s() * length, self.end)
    }
}

/// 2D cross product of (a - o) and (b - o)
#[inline]
fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

/// Inclusive segment intersection test.
///
/// Bounding boxes must overlap, and neither segment may have both endpoints
/// strictly on the same side of the other. A zero orientation (endpoint on
/// the other line) counts as a hit.
pub fn intersects(a: &LineSegment, b: &LineSegment) -> bool {
    let a_min = a.start.min(a.end);
    let a_max = a.start.max(a.end);
    let b_min = b.start.min(b.end);
    let b_max = b.start.max(b.end);

    if a_min.x > b_max.x || b_min.x > a_max.x || a_min.y > b_max.y || b_min.y > a_max.y {
        return false;
    }

    let d1 = cross(a.start, a.end, b.start);
    let d2 = cross(a.start, a.end, b.end);
    if d1 * d2 > 0.0 {
        return false;
    }

    let d3 = cross(b.start, b.end, a.start);
    let d4 = cross(b.start, b.end, a.end);
    d3 * d4 <= 0.0
}

/// Recompute `seg` as an infinite line clipped to two verticals.
///
/// The result's endpoints sit exactly at the verticals' x, with y taken from
/// the line through `seg`. If `seg` runs left to right the new start is on the
/// left vertical, otherwise on the right one.
///
/// # Panics
///
/// Panics if `seg` is vertical (start and end share an x). Callers only clip
/// gestures that already cross two distinct verticals.
pub fn clip_between_verticals(seg: &LineSegment, v1: &LineSegment, v2: &LineSegment) -> LineSegment {
    let dx = seg.end.x - seg.start.x;
    assert!(dx != 0.0, "cannot clip a vertical segment between verticals");

    let slope = (seg.end.y - seg.start.y) / dx;
    let intercept = seg.start.y - slope * seg.start.x;
    let at = |x: f32| Vec2::new(x, slope * x + intercept);

    let (left_x, right_x) = if v1.start.x <= v2.start.x {
        (v1.start.x, v2.start.x)
    } else {
        (v2.start.x, v1.start.x)
    };

    if seg.start.x <= seg.end.x {
        LineSegment::new(at(left_x), at(right_x))
    } else {
        LineSegment::new(at(right_x), at(left_x))
    }
}

/// Clamp each endpoint's x into `[x_min, x_max]`, leaving y untouched
pub fn clip_x(seg: &LineSegment, x_min: f32, x_max: f32) -> LineSegment {
    let clamp = |p: Vec2| Vec2::new(p.x.clamp(x_min, x_max), p.y);
    LineSegment::new(clamp(seg.start), clamp(seg.end))
}
