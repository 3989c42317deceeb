//! The ladder: four fixed verticals plus the rungs drawn between them

use super::segment::LineSegment;
use super::traversal::{self, Step, TraversalPoint};
use crate::consts::*;
use crate::{same_x, vertical_endpoints};

/// Verticals and the accepted rungs of one round.
///
/// Rungs never intersect each other, touching endpoints included. The rung
/// list is append-only, so indices into it stay valid for the round.
#[derive(Debug, Clone)]
pub struct Ladder {
    verticals: [LineSegment; VERTICAL_COUNT],
    rungs: Vec<LineSegment>,
}

impl Default for Ladder {
    fn default() -> Self {
        Self::new()
    }
}

impl Ladder {
    /// A ladder with the four standard verticals and no rungs
    pub fn new() -> Self {
        let verticals = std::array::from_fn(|i| {
            let (start, end) = vertical_endpoints(i);
            LineSegment::new(start, end)
        });
        Self {
            verticals,
            rungs: Vec::new(),
        }
    }

    /// A ladder pre-seeded with canned rungs.
    ///
    /// Canned rungs go through the same validation as drawn ones; any that
    /// cross an earlier entry are dropped.
    pub fn with_rungs(canned: &[LineSegment]) -> Self {
        let mut ladder = Self::new();
        for rung in canned {
            if !ladder.try_add_rung(*rung) {
                log::warn!(
                    "Skipping canned rung ({}, {}) -> ({}, {}): crosses an existing rung",
                    rung.start.x,
                    rung.start.y,
                    rung.end.x,
                    rung.end.y
                );
            }
        }
        ladder
    }

    pub fn verticals(&self) -> &[LineSegment; VERTICAL_COUNT] {
        &self.verticals
    }

    pub fn vertical(&self, index: usize) -> &LineSegment {
        &self.verticals[index]
    }

    pub fn rungs(&self) -> &[LineSegment] {
        &self.rungs
    }

    pub fn rung(&self, index: usize) -> &LineSegment {
        &self.rungs[index]
    }

    /// Try to add a rung.
    ///
    /// Returns false, leaving the ladder untouched, if the candidate is
    /// degenerate or touches any existing rung. Accepted rungs are stored left
    /// to right.
    pub fn try_add_rung(&mut self, candidate: LineSegment) -> bool {
        if candidate.is_degenerate() {
            return false;
        }
        if self.rungs.iter().any(|rung| rung.intersects(&candidate)) {
            return false;
        }
        self.rungs.push(candidate.left_to_right());
        true
    }

    /// Index of the vertical at `x`, if any
    pub fn vertical_at_x(&self, x: f32) -> Option<usize> {
        self.verticals.iter().position(|v| same_x(v.start.x, x))
    }

    /// Index of the vertical whose x matches `line.start.x`
    pub fn vertical_index(&self, line: &LineSegment) -> Option<usize> {
        self.vertical_at_x(line.start.x)
    }

    /// Advance `point` one step of `speed` along this ladder
    pub fn advance(&self, point: &mut TraversalPoint, speed: f32) -> crate::Result<Step> {
        traversal::step(point, self, speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn rung(x0: f32, y0: f32, x1: f32, y1: f32) -> LineSegment {
        LineSegment::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    #[test]
    fn test_new_ladder_has_four_verticals() {
        let ladder = Ladder::new();
        assert_eq!(ladder.verticals().len(), 4);
        assert!(ladder.rungs().is_empty());
        for (i, v) in ladder.verticals().iter().enumerate() {
            assert_eq!(v.start, Vec2::new(VERTICAL_XS[i], LADDER_START_Y));
            assert_eq!(v.end, Vec2::new(VERTICAL_XS[i], LADDER_END_Y));
        }
    }

    #[test]
    fn test_crossing_rung_rejected() {
        let mut ladder = Ladder::new();
        assert!(ladder.try_add_rung(rung(75.0, 300.0, 235.0, 300.0)));
        assert!(!ladder.try_add_rung(rung(75.0, 280.0, 235.0, 320.0)));
        assert_eq!(ladder.rungs().len(), 1);
    }

    #[test]
    fn test_shared_endpoint_rejected() {
        let mut ladder = Ladder::new();
        assert!(ladder.try_add_rung(rung(75.0, 300.0, 235.0, 300.0)));
        assert!(!ladder.try_add_rung(rung(235.0, 300.0, 395.0, 300.0)));
        assert!(ladder.try_add_rung(rung(235.0, 310.0, 395.0, 310.0)));
        assert_eq!(ladder.rungs().len(), 2);
    }

    #[test]
    fn test_rung_normalized_left_to_right() {
        let mut ladder = Ladder::new();
        assert!(ladder.try_add_rung(rung(235.0, 250.0, 75.0, 260.0)));
        assert_eq!(ladder.rung(0).start, Vec2::new(75.0, 260.0));
        assert_eq!(ladder.rung(0).end, Vec2::new(235.0, 250.0));
    }

    #[test]
    fn test_degenerate_rung_rejected() {
        let mut ladder = Ladder::new();
        assert!(!ladder.try_add_rung(rung(75.0, 300.0, 75.0, 300.0)));
        assert!(ladder.rungs().is_empty());
    }

    #[test]
    fn test_vertical_index() {
        let ladder = Ladder::new();
        assert_eq!(ladder.vertical_index(ladder.vertical(2)), Some(2));
        assert_eq!(ladder.vertical_at_x(555.0005), Some(3));
        assert_eq!(ladder.vertical_at_x(100.0), None);
        assert_eq!(ladder.vertical_index(&rung(235.0, 300.0, 395.0, 300.0)), Some(1));
    }

    #[test]
    fn test_with_rungs_skips_crossings() {
        let ladder = Ladder::with_rungs(&[
            rung(75.0, 300.0, 235.0, 300.0),
            rung(75.0, 310.0, 235.0, 290.0),
            rung(395.0, 200.0, 555.0, 220.0),
        ]);
        assert_eq!(ladder.rungs().len(), 2);
    }
}
