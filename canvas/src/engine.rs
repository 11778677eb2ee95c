use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, FULL_ALPHA, REFRESH_BUSY_MESSAGE};
use crate::doc::{Stroke, StrokeBatch, UserRegistry, generate_stroke_id, iso_timestamp};
use crate::input::{AuthorFilter, InputState, Pen, PendingStroke, RefreshKind};
use crate::render;
use crate::surface::{LineStyle, Surface};
use crate::viewport::{CanvasRect, Point};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Tell the user something (a blocking alert in the browser).
    Notify(String),
    /// Paint one incremental segment of the stroke being drawn.
    PaintSegment { from: Point, to: Point, style: LineStyle },
    /// Persist this finished stroke, then refresh.
    Submit(Stroke),
    /// Wipe the drawing surface.
    ClearSurface,
}

/// Core controller state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub registry: UserRegistry,
    pub pen: Pen,
    pub filter: AuthorFilter,
    pub input: InputState,
}

impl EngineCore {
    #[must_use]
    pub fn new(registry: UserRegistry) -> Self {
        Self { registry, pen: Pen::default(), filter: AuthorFilter::all(), input: InputState::Idle }
    }

    // --- Pointer input ---

    /// Pointer-down: start a new stroke at the transformed canvas coordinate.
    ///
    /// Rejected with a notification while a submit or refresh is in flight.
    pub fn begin_stroke(&mut self, client: Point, rect: &CanvasRect) -> Vec<Action> {
        if self.input.is_busy() {
            return vec![Action::Notify(REFRESH_BUSY_MESSAGE.to_owned())];
        }
        let start = rect.client_to_canvas(client);
        self.input = InputState::Drawing {
            pending: PendingStroke {
                color: self.pen.color().to_owned(),
                line_width: self.pen.line_width(),
                points: vec![start],
            },
        };
        Vec::new()
    }

    /// Pointer-move: append a point and paint the segment leading to it.
    pub fn extend_stroke(&mut self, client: Point, rect: &CanvasRect) -> Vec<Action> {
        let InputState::Drawing { pending } = &mut self.input else {
            return Vec::new();
        };
        let to = rect.client_to_canvas(client);
        let from = pending.last_point().unwrap_or(to);
        pending.points.push(to);
        vec![Action::PaintSegment {
            from,
            to,
            style: LineStyle { color: pending.color.clone(), width: pending.line_width, alpha: FULL_ALPHA },
        }]
    }

    /// Pointer-up or pointer-leave: finalize the pending stroke and hand it off for submission.
    pub fn end_stroke(&mut self, now_ms: i64) -> Vec<Action> {
        if !self.input.is_drawing() {
            return Vec::new();
        }
        let InputState::Drawing { pending } = std::mem::replace(&mut self.input, InputState::Submitting) else {
            return Vec::new();
        };
        let stroke = Stroke {
            id: generate_stroke_id(now_ms),
            color: pending.color,
            line_width: pending.line_width,
            points: pending.points,
            timestamp: iso_timestamp(now_ms),
            author: None,
        };
        vec![Action::Submit(stroke)]
    }

    // --- Refresh cycle ---

    /// Enter `Refreshing`. Returns `false` if a refresh is already running, or
    /// if a `Full` refresh is requested while a submitted stroke awaits its catch-up.
    ///
    /// A `Full` refresh empties the registry; any stroke still being drawn is dropped.
    pub fn begin_refresh(&mut self, kind: RefreshKind) -> bool {
        match (&self.input, kind) {
            (InputState::Refreshing, _) | (InputState::Submitting, RefreshKind::Full) => return false,
            _ => {}
        }
        self.input = InputState::Refreshing;
        if kind == RefreshKind::Full {
            self.registry.reset();
        }
        true
    }

    /// Append a fetched batch to the registry.
    pub fn apply_batch(&mut self, batch: StrokeBatch) {
        self.registry.apply_batch(batch);
    }

    /// Leave `Refreshing` and accept new strokes again.
    pub fn finish_refresh(&mut self) {
        if self.input == InputState::Refreshing {
            self.input = InputState::Idle;
        }
    }

    /// Offset to fetch from for `kind`.
    #[must_use]
    pub fn fetch_offset(&self, kind: RefreshKind) -> usize {
        match kind {
            RefreshKind::Full => 0,
            RefreshKind::CatchUp => self.registry.cursor(),
        }
    }

    // --- Controls ---

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.pen.set_color(color);
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.pen.set_line_width(width);
    }

    /// Select the author shown at full opacity; `""` selects everyone.
    ///
    /// Returns `true` if the filter changed, in which case the host should run a full refresh.
    pub fn set_filter(&mut self, author: &str) -> bool {
        let next = AuthorFilter::from_selection(author);
        if next == self.filter {
            return false;
        }
        self.filter = next;
        true
    }

    /// Forget every local stroke and wipe the surface. The store is untouched.
    ///
    /// Rejected with a notification while a submit or refresh is in flight.
    pub fn clear(&mut self) -> Vec<Action> {
        if self.input.is_busy() {
            return vec![Action::Notify(REFRESH_BUSY_MESSAGE.to_owned())];
        }
        self.registry.reset();
        vec![Action::ClearSurface]
    }

    // --- Queries ---

    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        self.registry.strokes()
    }

    /// Distinct authors across every known stroke.
    #[must_use]
    pub fn authors(&self) -> Vec<String> {
        render::derive_authors(self.registry.strokes())
    }

    /// Redraw every known stroke onto `surface`.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the surface.
    pub fn redraw<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        render::replay(surface, self.registry.strokes(), &self.filter)
    }
}

/// Execute the actions that only touch the surface; the rest are left for the host.
///
/// # Errors
///
/// Returns the first error reported by the surface.
pub fn paint_actions<S: Surface>(surface: &mut S, actions: &[Action]) -> Result<(), S::Error> {
    for action in actions {
        match action {
            Action::PaintSegment { from, to, style } => surface.stroke_polyline(&[*from, *to], style)?,
            Action::ClearSurface => surface.clear(CANVAS_WIDTH, CANVAS_HEIGHT)?,
            Action::Notify(_) | Action::Submit(_) => {}
        }
    }
    Ok(())
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, registry: UserRegistry) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        Ok(Self { canvas, ctx, core: EngineCore::new(registry) })
    }

    fn rect(&self) -> CanvasRect {
        let r = self.canvas.get_bounding_client_rect();
        CanvasRect {
            left: r.left(),
            top: r.top(),
            width: r.width(),
            height: r.height(),
            buffer_width: f64::from(self.canvas.width()),
            buffer_height: f64::from(self.canvas.height()),
        }
    }

    // --- Input events ---

    /// # Errors
    ///
    /// Returns `Err` if painting fails.
    pub fn on_pointer_down(&mut self, client: Point) -> Result<Vec<Action>, JsValue> {
        let rect = self.rect();
        let actions = self.core.begin_stroke(client, &rect);
        paint_actions(&mut self.ctx, &actions)?;
        Ok(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if painting fails.
    pub fn on_pointer_move(&mut self, client: Point) -> Result<Vec<Action>, JsValue> {
        let rect = self.rect();
        let actions = self.core.extend_stroke(client, &rect);
        paint_actions(&mut self.ctx, &actions)?;
        Ok(actions)
    }

    /// Pointer-up and pointer-leave both finish the stroke.
    #[allow(clippy::cast_possible_truncation)]
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.end_stroke(js_sys::Date::now() as i64)
    }

    /// # Errors
    ///
    /// Returns `Err` if painting fails.
    pub fn clear(&mut self) -> Result<(), JsValue> {
        let actions = self.core.clear();
        paint_actions(&mut self.ctx, &actions)
    }

    // --- Render ---

    /// Redraw all known strokes.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn redraw(&mut self) -> Result<(), JsValue> {
        self.core.redraw(&mut self.ctx)
    }
}
