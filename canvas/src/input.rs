//! Input model: the pen, the author filter, and the controller state machine.
//!
//! `Pen` captures the style the next stroke will be drawn with. `InputState`
//! is the controller's phase; the active `Drawing` variant carries the pending
//! stroke being built between pointer-down and pointer-up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{DEFAULT_COLOR, DEFAULT_LINE_WIDTH, MAX_LINE_WIDTH, MIN_LINE_WIDTH};
use crate::viewport::Point;

/// Style applied to new strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    color: String,
    line_width: f64,
}

impl Default for Pen {
    fn default() -> Self {
        Self { color: DEFAULT_COLOR.to_owned(), line_width: DEFAULT_LINE_WIDTH }
    }
}

impl Pen {
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    /// Set the line width, clamped to the slider range. Non-finite input is ignored.
    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() {
            self.line_width = width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH);
        }
    }
}

/// Which author's strokes are shown at full opacity.
///
/// `None` shows everyone; an empty string from the selector also means `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter(Option<String>);

impl AuthorFilter {
    /// Show every author at full opacity.
    #[must_use]
    pub fn all() -> Self {
        Self(None)
    }

    /// Build a filter from selector input, treating `""` as no filter.
    #[must_use]
    pub fn from_selection(author: &str) -> Self {
        if author.is_empty() { Self(None) } else { Self(Some(author.to_owned())) }
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.0.as_deref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }
}

/// How a refresh rebuilds the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// Reset the registry and fetch from offset 0 (mount, filter change, manual refresh).
    Full,
    /// Fetch only records past the registry cursor (after a submit).
    CatchUp,
}

/// A stroke being drawn, not yet submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingStroke {
    pub color: String,
    pub line_width: f64,
    pub points: Vec<Point>,
}

impl PendingStroke {
    /// The most recent point, which the next incremental segment starts from.
    #[must_use]
    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Controller phase.
///
/// `Idle → Drawing → Submitting → Refreshing → Idle`. `Refreshing` is also
/// entered directly from `Idle` on mount, filter change and manual refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// Waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pointer is down; points are being appended to the pending stroke.
    Drawing {
        /// The stroke under construction.
        pending: PendingStroke,
    },
    /// A finished stroke has been handed to the host for submission.
    Submitting,
    /// A fetch and replay is in flight; new strokes are rejected.
    Refreshing,
}

impl InputState {
    /// Whether new strokes must be rejected.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Submitting | Self::Refreshing)
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}
