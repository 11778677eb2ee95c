//! Replay: redraw the whole canvas from the accumulated stroke history.
//!
//! Rendering never mutates application state. [`plan`] decides what to draw
//! and at which opacity, [`replay`] executes a plan against a [`Surface`], and
//! [`derive_authors`] computes the author list for the selector as a separate
//! pure pass.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, FULL_ALPHA, GHOST_ALPHA};
use crate::doc::Stroke;
use crate::input::AuthorFilter;
use crate::surface::{LineStyle, Surface};

/// One stroke to draw and the opacity to draw it at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall<'a> {
    pub stroke: &'a Stroke,
    pub alpha: f64,
}

impl DrawCall<'_> {
    #[must_use]
    pub fn style(&self) -> LineStyle {
        LineStyle { color: self.stroke.color.clone(), width: self.stroke.line_width, alpha: self.alpha }
    }
}

/// Opacity for `stroke` under `filter`: ghosted only when a filter is active and names someone else.
#[must_use]
pub fn alpha_for(stroke: &Stroke, filter: &AuthorFilter) -> f64 {
    match filter.selected() {
        Some(author) if !stroke.is_by(author) => GHOST_ALPHA,
        _ => FULL_ALPHA,
    }
}

/// Draw calls for `strokes` in arrival order.
#[must_use]
pub fn plan<'a>(strokes: &'a [Stroke], filter: &AuthorFilter) -> Vec<DrawCall<'a>> {
    strokes
        .iter()
        .map(|stroke| DrawCall { stroke, alpha: alpha_for(stroke, filter) })
        .collect()
}

/// Clear `surface` and draw every stroke.
///
/// # Errors
///
/// Returns the first error reported by the surface.
pub fn replay<S: Surface>(surface: &mut S, strokes: &[Stroke], filter: &AuthorFilter) -> Result<(), S::Error> {
    surface.clear(CANVAS_WIDTH, CANVAS_HEIGHT)?;
    for call in plan(strokes, filter) {
        surface.stroke_polyline(&call.stroke.points, &call.style())?;
    }
    Ok(())
}

/// Distinct authors in first-seen order. Strokes without an author are ignored.
#[must_use]
pub fn derive_authors(strokes: &[Stroke]) -> Vec<String> {
    let mut authors: Vec<String> = Vec::new();
    for author in strokes.iter().filter_map(|s| s.author.as_deref()) {
        if author.is_empty() || authors.iter().any(|a| a == author) {
            continue;
        }
        authors.push(author.to_owned());
    }
    authors
}
