//! Drawing surfaces.
//!
//! The controller and the replay renderer only ever need two primitives:
//! wipe the buffer, and stroke a round-capped polyline. [`Surface`] is that
//! seam. The browser implementation sits directly on
//! [`web_sys::CanvasRenderingContext2d`]; [`crate::svg::SvgSurface`] renders
//! the same calls to text.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::viewport::Point;

/// Style for one polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    /// CSS color string.
    pub color: String,
    /// Line width in canvas pixels.
    pub width: f64,
    /// Global opacity, `0.0..=1.0`.
    pub alpha: f64,
}

/// A 2D target that strokes can be drawn onto.
pub trait Surface {
    type Error;

    /// Erase the whole `width` × `height` buffer.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn clear(&mut self, width: f64, height: f64) -> Result<(), Self::Error>;

    /// Stroke a connected polyline through `points`. Fewer than two points draws nothing visible.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn stroke_polyline(&mut self, points: &[Point], style: &LineStyle) -> Result<(), Self::Error>;
}

impl Surface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn clear(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.set_global_alpha(1.0);
        self.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Point], style: &LineStyle) -> Result<(), JsValue> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.set_global_alpha(style.alpha);
        self.begin_path();
        self.set_stroke_style_str(&style.color);
        self.set_line_width(style.width);
        self.set_line_cap("round");
        self.set_line_join("round");
        self.move_to(first.x, first.y);
        for p in rest {
            self.line_to(p.x, p.y);
        }
        self.stroke();
        Ok(())
    }
}
