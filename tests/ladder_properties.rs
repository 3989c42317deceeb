//! Property-based tests for segment geometry and the ladder.
//!
//! 1. Intersection is symmetric
//! 2. No two accepted rungs ever intersect; rejected inserts change nothing
//! 3. Clipping lands exactly on the verticals and stays on the original line
//! 4. A point descending a vertical never moves back up before turning
//! 5. Replaying a token over a fixed ladder is deterministic

use amida_ladder::consts::*;
use amida_ladder::sim::{
    Ladder, LineRef, LineSegment, Step, TraversalPoint, clip_between_verticals, intersects, step,
};
use glam::Vec2;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn point_strategy() -> impl Strategy<Value = Vec2> {
    (0.0f32..640.0, 0.0f32..640.0).prop_map(|(x, y)| Vec2::new(x, y))
}

fn segment_strategy() -> impl Strategy<Value = LineSegment> {
    (point_strategy(), point_strategy()).prop_map(|(a, b)| LineSegment::new(a, b))
}

/// A rung between two adjacent verticals, possibly tilted, in either orientation
fn rung_strategy() -> impl Strategy<Value = LineSegment> {
    (
        0usize..VERTICAL_COUNT - 1,
        LADDER_END_Y + 10.0..LADDER_START_Y - 10.0,
        -30.0f32..30.0,
        any::<bool>(),
    )
        .prop_map(|(gap, y, tilt, flip)| {
            let rung = LineSegment::new(
                Vec2::new(VERTICAL_XS[gap], y),
                Vec2::new(VERTICAL_XS[gap + 1], (y + tilt).clamp(LADDER_END_Y + 1.0, LADDER_START_Y - 1.0)),
            );
            if flip { rung.reversed() } else { rung }
        })
}

fn ladder_from(rungs: &[LineSegment]) -> Ladder {
    let mut ladder = Ladder::new();
    for rung in rungs {
        ladder.try_add_rung(*rung);
    }
    ladder
}

/// Walk a token until it finishes, recording every position
fn walk(ladder: &Ladder, vertical: usize, speed: f32) -> Vec<(Vec2, LineRef)> {
    let mut point = TraversalPoint::at_vertical(ladder, vertical);
    let mut trace = Vec::new();
    for _ in 0..20_000 {
        step(&mut point, ladder, speed).unwrap();
        trace.push((point.position, point.line));
        if point.has_finished(ladder) {
            break;
        }
    }
    trace
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn intersection_is_symmetric(a in segment_strategy(), b in segment_strategy()) {
        prop_assert_eq!(intersects(&a, &b), intersects(&b, &a));
    }

    #[test]
    fn segment_intersects_itself(a in segment_strategy()) {
        prop_assert!(intersects(&a, &a));
    }

    #[test]
    fn accepted_rungs_never_intersect(rungs in prop::collection::vec(rung_strategy(), 0..40)) {
        let mut ladder = Ladder::new();
        for rung in &rungs {
            let before = ladder.rungs().to_vec();
            let accepted = ladder.try_add_rung(*rung);
            if accepted {
                prop_assert_eq!(ladder.rungs().len(), before.len() + 1);
                let stored = ladder.rungs().last().unwrap();
                prop_assert!(stored.start.x <= stored.end.x);
            } else {
                prop_assert_eq!(ladder.rungs(), before.as_slice());
            }
        }

        let stored = ladder.rungs();
        for i in 0..stored.len() {
            for j in (i + 1)..stored.len() {
                prop_assert!(!stored[i].intersects(&stored[j]));
            }
        }
    }

    #[test]
    fn clip_lands_on_verticals_and_line(
        gap in 0usize..VERTICAL_COUNT - 1,
        x0 in 0.0f32..640.0,
        dx in prop_oneof![-300.0f32..-1.0, 1.0f32..300.0],
        slope in -1.5f32..1.5,
        intercept in 100.0f32..500.0,
    ) {
        let line = |x: f32| slope * x + intercept;
        let x1 = x0 + dx;
        let seg = LineSegment::new(Vec2::new(x0, line(x0)), Vec2::new(x1, line(x1)));
        let ladder = Ladder::new();
        let (v1, v2) = (ladder.vertical(gap), ladder.vertical(gap + 1));

        let clipped = clip_between_verticals(&seg, v1, v2);
        let mut xs = [clipped.start.x, clipped.end.x];
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        prop_assert_eq!(xs, [VERTICAL_XS[gap], VERTICAL_XS[gap + 1]]);

        for p in [clipped.start, clipped.end] {
            prop_assert!((p.y - line(p.x)).abs() < 1e-2, "{} vs {}", p.y, line(p.x));
        }
        // Orientation follows the original segment
        prop_assert_eq!(clipped.start.x < clipped.end.x, x0 < x1);
    }

    #[test]
    fn descent_never_backtracks(
        rungs in prop::collection::vec(rung_strategy(), 0..12),
        vertical in 0usize..VERTICAL_COUNT,
    ) {
        let ladder = ladder_from(&rungs);
        let trace = walk(&ladder, vertical, 2.0);
        prop_assert!(!trace.is_empty());

        let mut previous = ladder.vertical(vertical).start;
        let mut previous_line = LineRef::Vertical(vertical);
        for (position, line) in &trace {
            if let (LineRef::Vertical(_), LineRef::Vertical(_)) = (previous_line, *line) {
                prop_assert!(position.y <= previous.y);
            }
            previous = *position;
            previous_line = *line;
        }

        let (last, line) = trace.last().unwrap();
        prop_assert!(matches!(line, LineRef::Vertical(_)));
        prop_assert!(last.y <= LADDER_END_Y);
    }

    #[test]
    fn replay_is_deterministic(
        rungs in prop::collection::vec(rung_strategy(), 0..12),
        vertical in 0usize..VERTICAL_COUNT,
    ) {
        let ladder = ladder_from(&rungs);
        prop_assert_eq!(walk(&ladder, vertical, 2.0), walk(&ladder, vertical, 2.0));
    }
}

#[test]
fn crossing_rung_leaves_single_rung() {
    let mut ladder = Ladder::new();
    assert!(ladder.try_add_rung(LineSegment::new(Vec2::new(75.0, 300.0), Vec2::new(235.0, 300.0))));
    assert!(!ladder.try_add_rung(LineSegment::new(Vec2::new(75.0, 250.0), Vec2::new(235.0, 350.0))));
    assert_eq!(ladder.rungs().len(), 1);
}

#[test]
fn example_board_turns_at_rung() {
    let mut ladder = Ladder::new();
    assert!(ladder.try_add_rung(LineSegment::new(Vec2::new(75.0, 300.0), Vec2::new(235.0, 300.0))));
    let mut point = TraversalPoint::at_vertical(&ladder, 0);
    assert_eq!(point.position, Vec2::new(75.0, 590.0));

    let mut turns = Vec::new();
    let mut n = 0;
    while !point.has_finished(&ladder) {
        n += 1;
        if step(&mut point, &ladder, 2.0).unwrap() == Step::Turned {
            turns.push((n, point.position, point.direction));
        }
    }

    assert_eq!(
        turns,
        vec![
            (145, Vec2::new(75.0, 300.0), Vec2::new(1.0, 0.0)),
            (225, Vec2::new(235.0, 300.0), Vec2::new(0.0, -1.0)),
        ]
    );
    assert_eq!(point.line, LineRef::Vertical(1));
    assert_eq!(n, 225 + 125);
    assert_eq!(point.position, Vec2::new(235.0, LADDER_END_Y));
}
