#![allow(clippy::float_cmp)]

use std::convert::Infallible;

use super::*;
use crate::viewport::Point;

/// Surface that records every call for inspection.
#[derive(Default)]
struct Recording {
    clears: usize,
    lines: Vec<(Vec<Point>, LineStyle)>,
}

impl Surface for Recording {
    type Error = Infallible;

    fn clear(&mut self, _width: f64, _height: f64) -> Result<(), Infallible> {
        self.clears += 1;
        self.lines.clear();
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Point], style: &LineStyle) -> Result<(), Infallible> {
        self.lines.push((points.to_vec(), style.clone()));
        Ok(())
    }
}

fn stroke(id: &str, author: Option<&str>) -> Stroke {
    Stroke {
        id: id.to_owned(),
        color: "#123456".to_owned(),
        line_width: 4.0,
        points: vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(9.0, 1.0)],
        timestamp: String::new(),
        author: author.map(str::to_owned),
    }
}

fn sample() -> Vec<Stroke> {
    vec![
        stroke("1", Some("alice")),
        stroke("2", Some("bob")),
        stroke("3", None),
        stroke("4", Some("alice")),
    ]
}

// =============================================================
// Opacity
// =============================================================

#[test]
fn no_filter_draws_everyone_opaque() {
    let strokes = sample();
    let calls = plan(&strokes, &AuthorFilter::all());
    assert!(calls.iter().all(|c| c.alpha == FULL_ALPHA));
}

#[test]
fn empty_selection_draws_everyone_opaque() {
    let strokes = sample();
    let calls = plan(&strokes, &AuthorFilter::from_selection(""));
    assert!(calls.iter().all(|c| c.alpha == 1.0));
}

#[test]
fn filter_ghosts_other_authors() {
    let strokes = sample();
    let calls = plan(&strokes, &AuthorFilter::from_selection("alice"));
    let alphas: Vec<f64> = calls.iter().map(|c| c.alpha).collect();
    assert_eq!(alphas, [1.0, 0.1, 0.1, 1.0]);
}

#[test]
fn filter_by_unknown_author_ghosts_everything() {
    let strokes = sample();
    let calls = plan(&strokes, &AuthorFilter::from_selection("carol"));
    assert!(calls.iter().all(|c| c.alpha == GHOST_ALPHA));
}

#[test]
fn plan_preserves_arrival_order() {
    let strokes = sample();
    let ids: Vec<&str> = plan(&strokes, &AuthorFilter::all()).iter().map(|c| c.stroke.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3", "4"]);
}

// =============================================================
// Replay
// =============================================================

#[test]
fn replay_clears_then_draws_each_stroke() {
    let strokes = sample();
    let mut surface = Recording::default();
    replay(&mut surface, &strokes, &AuthorFilter::from_selection("bob")).unwrap();
    assert_eq!(surface.clears, 1);
    assert_eq!(surface.lines.len(), 4);
    let (points, style) = &surface.lines[1];
    assert_eq!(points.len(), 3);
    assert_eq!(style.color, "#123456");
    assert_eq!(style.width, 4.0);
    assert_eq!(style.alpha, 1.0);
    assert_eq!(surface.lines[0].1.alpha, 0.1);
}

#[test]
fn replay_is_a_pure_function_of_strokes_and_filter() {
    let strokes = sample();
    let filter = AuthorFilter::from_selection("alice");
    let mut a = Recording::default();
    let mut b = Recording::default();
    replay(&mut a, &strokes, &filter).unwrap();
    replay(&mut b, &strokes, &filter).unwrap();
    replay(&mut b, &strokes, &filter).unwrap();
    assert_eq!(a.lines, b.lines);
}

#[test]
fn replay_of_nothing_only_clears() {
    let mut surface = Recording::default();
    replay(&mut surface, &[], &AuthorFilter::all()).unwrap();
    assert_eq!(surface.clears, 1);
    assert!(surface.lines.is_empty());
}

// =============================================================
// derive_authors
// =============================================================

#[test]
fn derive_authors_distinct_first_seen_order() {
    let mut strokes = sample();
    strokes.push(stroke("5", Some("carol")));
    strokes.push(stroke("6", Some("bob")));
    assert_eq!(derive_authors(&strokes), ["alice", "bob", "carol"]);
}

#[test]
fn derive_authors_skips_anonymous_and_empty() {
    let strokes = vec![stroke("1", None), stroke("2", Some(""))];
    assert!(derive_authors(&strokes).is_empty());
}
