//! Shared numeric constants for the canvas crate.

// ── Canvas buffer ───────────────────────────────────────────────

/// Width of the drawing buffer in canvas pixels.
pub const CANVAS_WIDTH: f64 = 500.0;

/// Height of the drawing buffer in canvas pixels.
pub const CANVAS_HEIGHT: f64 = 500.0;

// ── Pen ─────────────────────────────────────────────────────────

/// Pen color used until the user picks another.
pub const DEFAULT_COLOR: &str = "#000000";

/// Line width used until the user picks another.
pub const DEFAULT_LINE_WIDTH: f64 = 5.0;

/// Smallest line width the width slider allows.
pub const MIN_LINE_WIDTH: f64 = 1.0;

/// Largest line width the width slider allows.
pub const MAX_LINE_WIDTH: f64 = 20.0;

// ── Replay ──────────────────────────────────────────────────────

/// Opacity for strokes drawn by the selected author (or by anyone when unfiltered).
pub const FULL_ALPHA: f64 = 1.0;

/// Opacity for strokes by other authors while a filter is active.
pub const GHOST_ALPHA: f64 = 0.1;

// ── Session ─────────────────────────────────────────────────────

/// Display name for the local session user.
pub const DEFAULT_USERNAME: &str = "MainUser";

/// Message shown when the user tries to draw while a refresh is in flight.
pub const REFRESH_BUSY_MESSAGE: &str = "Please wait for the canvas to refresh before drawing again.";
