#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

/// A point in either client (DOM) space or canvas buffer space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where the canvas element sits on the page and how big its pixel buffer is.
///
/// `left`/`top`/`width`/`height` come from the element's bounding client rect
/// (CSS pixels). `buffer_width`/`buffer_height` are the `width`/`height`
/// attributes of the canvas, which differ from the rendered size whenever the
/// element is stretched by layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub buffer_width: f64,
    pub buffer_height: f64,
}

impl CanvasRect {
    /// A rect whose rendered size equals its buffer size, placed at the origin.
    #[must_use]
    pub fn unscaled(buffer_width: f64, buffer_height: f64) -> Self {
        Self { left: 0.0, top: 0.0, width: buffer_width, height: buffer_height, buffer_width, buffer_height }
    }

    /// Horizontal buffer-pixels per CSS pixel. `1.0` when the element has no rendered width.
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        if self.width > 0.0 { self.buffer_width / self.width } else { 1.0 }
    }

    /// Vertical buffer-pixels per CSS pixel. `1.0` when the element has no rendered height.
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        if self.height > 0.0 { self.buffer_height / self.height } else { 1.0 }
    }

    /// Convert a pointer position in client coordinates into canvas buffer coordinates.
    #[must_use]
    pub fn client_to_canvas(&self, client: Point) -> Point {
        Point {
            x: (client.x - self.left) * self.scale_x(),
            y: (client.y - self.top) * self.scale_y(),
        }
    }
}
