#![allow(clippy::float_cmp)]

use std::convert::Infallible;

use super::*;

// =============================================================
// Helpers
// =============================================================

const NOW: i64 = 1_700_000_000_000;

fn core() -> EngineCore {
    EngineCore::new(UserRegistry::new("user_test", "MainUser"))
}

fn rect() -> CanvasRect {
    CanvasRect::unscaled(CANVAS_WIDTH, CANVAS_HEIGHT)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn stroke_by(id: &str, author: &str) -> Stroke {
    Stroke {
        id: id.to_owned(),
        color: "#000000".to_owned(),
        line_width: 2.0,
        points: vec![pt(0.0, 0.0), pt(1.0, 1.0)],
        timestamp: String::new(),
        author: Some(author.to_owned()),
    }
}

fn submitted(actions: &[Action]) -> &Stroke {
    match actions {
        [Action::Submit(stroke)] => stroke,
        other => panic!("expected a single Submit, got {other:?}"),
    }
}

#[derive(Default)]
struct Recording {
    clears: usize,
    segments: Vec<Vec<Point>>,
}

impl Surface for Recording {
    type Error = Infallible;

    fn clear(&mut self, _w: f64, _h: f64) -> Result<(), Infallible> {
        self.clears += 1;
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Point], _style: &LineStyle) -> Result<(), Infallible> {
        self.segments.push(points.to_vec());
        Ok(())
    }
}

// =============================================================
// Drawing lifecycle
// =============================================================

#[test]
fn begin_stroke_enters_drawing() {
    let mut c = core();
    let actions = c.begin_stroke(pt(10.0, 20.0), &rect());
    assert!(actions.is_empty());
    let InputState::Drawing { pending } = &c.input else {
        panic!("expected Drawing, got {:?}", c.input);
    };
    assert_eq!(pending.points, vec![pt(10.0, 20.0)]);
    assert_eq!(pending.color, "#000000");
    assert_eq!(pending.line_width, 5.0);
}

#[test]
fn begin_stroke_transforms_coordinates() {
    let mut c = core();
    let rect = CanvasRect { left: 50.0, top: 30.0, width: 250.0, height: 1000.0, buffer_width: 500.0, buffer_height: 500.0 };
    c.begin_stroke(pt(100.0, 130.0), &rect);
    let InputState::Drawing { pending } = &c.input else {
        panic!("expected Drawing");
    };
    assert_eq!(pending.points[0], pt(100.0, 50.0));
}

#[test]
fn begin_stroke_uses_current_pen() {
    let mut c = core();
    c.set_color("#ff0000");
    c.set_line_width(9.0);
    c.begin_stroke(pt(0.0, 0.0), &rect());
    let InputState::Drawing { pending } = &c.input else {
        panic!("expected Drawing");
    };
    assert_eq!(pending.color, "#ff0000");
    assert_eq!(pending.line_width, 9.0);
}

#[test]
fn extend_stroke_paints_segment_and_appends() {
    let mut c = core();
    c.begin_stroke(pt(0.0, 0.0), &rect());
    let actions = c.extend_stroke(pt(3.0, 4.0), &rect());
    assert_eq!(
        actions,
        vec![Action::PaintSegment {
            from: pt(0.0, 0.0),
            to: pt(3.0, 4.0),
            style: LineStyle { color: "#000000".into(), width: 5.0, alpha: 1.0 },
        }]
    );
    let actions = c.extend_stroke(pt(6.0, 8.0), &rect());
    let [Action::PaintSegment { from, to, .. }] = actions.as_slice() else {
        panic!("expected PaintSegment");
    };
    assert_eq!((*from, *to), (pt(3.0, 4.0), pt(6.0, 8.0)));
}

#[test]
fn extend_stroke_when_idle_is_noop() {
    let mut c = core();
    assert!(c.extend_stroke(pt(1.0, 1.0), &rect()).is_empty());
    assert_eq!(c.input, InputState::Idle);
}

#[test]
fn end_stroke_when_idle_is_noop() {
    let mut c = core();
    assert!(c.end_stroke(NOW).is_empty());
    assert_eq!(c.input, InputState::Idle);
}

#[test]
fn end_stroke_finalizes_and_enters_submitting() {
    let mut c = core();
    c.begin_stroke(pt(0.0, 0.0), &rect());
    c.extend_stroke(pt(10.0, 10.0), &rect());
    let actions = c.end_stroke(NOW);
    let stroke = submitted(&actions);
    assert_eq!(stroke.points, vec![pt(0.0, 0.0), pt(10.0, 10.0)]);
    assert!(stroke.id.starts_with("stroke_1700000000000_"));
    assert!(stroke.timestamp.starts_with("2023-11-14T22:13:20"));
    assert!(stroke.author.is_none());
    assert_eq!(c.input, InputState::Submitting);
}

#[test]
fn end_stroke_does_not_touch_history() {
    let mut c = core();
    c.begin_stroke(pt(0.0, 0.0), &rect());
    c.end_stroke(NOW);
    assert!(c.strokes().is_empty());
}

#[test]
fn second_end_stroke_is_noop() {
    let mut c = core();
    c.begin_stroke(pt(0.0, 0.0), &rect());
    assert_eq!(c.end_stroke(NOW).len(), 1);
    assert!(c.end_stroke(NOW).is_empty());
}

// =============================================================
// Refresh gate
// =============================================================

#[test]
fn begin_stroke_while_refreshing_is_rejected() {
    let mut c = core();
    c.apply_batch(StrokeBatch { strokes: vec![stroke_by("a", "alice")], consumed: 1, skipped: 0 });
    assert!(c.begin_refresh(RefreshKind::CatchUp));
    let before = c.strokes().to_vec();

    let actions = c.begin_stroke(pt(5.0, 5.0), &rect());

    assert_eq!(actions, vec![Action::Notify(REFRESH_BUSY_MESSAGE.to_owned())]);
    assert_eq!(c.input, InputState::Refreshing);
    assert_eq!(c.strokes(), before.as_slice());
}

#[test]
fn begin_stroke_while_submitting_is_rejected() {
    let mut c = core();
    c.begin_stroke(pt(0.0, 0.0), &rect());
    c.end_stroke(NOW);
    let actions = c.begin_stroke(pt(1.0, 1.0), &rect());
    assert!(matches!(actions.as_slice(), [Action::Notify(_)]));
    assert_eq!(c.input, InputState::Submitting);
}

#[test]
fn begin_refresh_twice_returns_false() {
    let mut c = core();
    assert!(c.begin_refresh(RefreshKind::Full));
    assert!(!c.begin_refresh(RefreshKind::Full));
}

#[test]
fn full_refresh_waits_for_pending_catch_up() {
    let mut c = core();
    c.begin_stroke(pt(0.0, 0.0), &rect());
    c.end_stroke(NOW);
    assert!(!c.begin_refresh(RefreshKind::Full));
    assert_eq!(c.input, InputState::Submitting);
    assert!(c.begin_refresh(RefreshKind::CatchUp));
}

#[test]
fn full_refresh_resets_registry() {
    let mut c = core();
    c.apply_batch(StrokeBatch { strokes: vec![stroke_by("a", "alice")], consumed: 1, skipped: 0 });
    c.begin_refresh(RefreshKind::Full);
    assert!(c.strokes().is_empty());
    assert_eq!(c.fetch_offset(RefreshKind::Full), 0);
}

#[test]
fn catch_up_refresh_keeps_registry_and_fetches_from_cursor() {
    let mut c = core();
    c.apply_batch(StrokeBatch { strokes: vec![stroke_by("a", "alice")], consumed: 2, skipped: 1 });
    c.begin_refresh(RefreshKind::CatchUp);
    assert_eq!(c.strokes().len(), 1);
    assert_eq!(c.fetch_offset(RefreshKind::CatchUp), 2);
}

#[test]
fn finish_refresh_returns_to_idle_and_allows_drawing() {
    let mut c = core();
    c.begin_stroke(pt(0.0, 0.0), &rect());
    c.end_stroke(NOW);
    assert!(c.begin_refresh(RefreshKind::CatchUp));
    c.finish_refresh();
    assert_eq!(c.input, InputState::Idle);
    assert!(c.begin_stroke(pt(1.0, 1.0), &rect()).is_empty());
    assert!(c.input.is_drawing());
}

#[test]
fn finish_refresh_outside_refresh_is_noop() {
    let mut c = core();
    c.begin_stroke(pt(0.0, 0.0), &rect());
    c.finish_refresh();
    assert!(c.input.is_drawing());
}

#[test]
fn full_refresh_drops_in_progress_stroke() {
    let mut c = core();
    c.begin_stroke(pt(0.0, 0.0), &rect());
    assert!(c.begin_refresh(RefreshKind::Full));
    c.finish_refresh();
    assert!(c.end_stroke(NOW).is_empty());
}

// =============================================================
// Filter, clear, queries
// =============================================================

#[test]
fn set_filter_reports_change() {
    let mut c = core();
    assert!(!c.set_filter(""));
    assert!(c.set_filter("alice"));
    assert!(!c.set_filter("alice"));
    assert!(c.set_filter(""));
    assert!(!c.filter.is_active());
}

#[test]
fn clear_resets_registry_and_requests_wipe() {
    let mut c = core();
    c.apply_batch(StrokeBatch { strokes: vec![stroke_by("a", "alice")], consumed: 1, skipped: 0 });
    assert_eq!(c.clear(), vec![Action::ClearSurface]);
    assert!(c.strokes().is_empty());
    assert_eq!(c.registry.cursor(), 0);
}

#[test]
fn clear_while_refreshing_is_rejected() {
    let mut c = core();
    c.apply_batch(StrokeBatch { strokes: vec![stroke_by("a", "alice")], consumed: 1, skipped: 0 });
    assert!(c.begin_refresh(RefreshKind::CatchUp));
    assert_eq!(c.clear(), vec![Action::Notify(REFRESH_BUSY_MESSAGE.to_owned())]);
    assert_eq!(c.strokes().len(), 1);
    assert_eq!(c.registry.cursor(), 1);
}

#[test]
fn authors_are_derived_from_registry() {
    let mut c = core();
    c.apply_batch(StrokeBatch {
        strokes: vec![stroke_by("a", "alice"), stroke_by("b", "bob"), stroke_by("c", "alice")],
        consumed: 3,
        skipped: 0,
    });
    assert_eq!(c.authors(), ["alice", "bob"]);
}

#[test]
fn redraw_draws_every_stroke() {
    let mut c = core();
    c.apply_batch(StrokeBatch { strokes: vec![stroke_by("a", "alice"), stroke_by("b", "bob")], consumed: 2, skipped: 0 });
    let mut surface = Recording::default();
    c.redraw(&mut surface).unwrap();
    assert_eq!(surface.clears, 1);
    assert_eq!(surface.segments.len(), 2);
}

// =============================================================
// paint_actions
// =============================================================

#[test]
fn paint_actions_executes_surface_actions_only() {
    let mut surface = Recording::default();
    let actions = vec![
        Action::Notify("hi".into()),
        Action::PaintSegment { from: pt(0.0, 0.0), to: pt(1.0, 2.0), style: LineStyle { color: "#000".into(), width: 1.0, alpha: 1.0 } },
        Action::Submit(stroke_by("a", "alice")),
        Action::ClearSurface,
    ];
    paint_actions(&mut surface, &actions).unwrap();
    assert_eq!(surface.segments, vec![vec![pt(0.0, 0.0), pt(1.0, 2.0)]]);
    assert_eq!(surface.clears, 1);
}
