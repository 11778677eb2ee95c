//! SVG surface: renders replay output as a standalone SVG document.

#[cfg(test)]
#[path = "svg_test.rs"]
mod svg_test;

use std::convert::Infallible;

use crate::surface::{LineStyle, Surface};
use crate::viewport::Point;

/// Accumulates polylines and renders them as SVG text.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
}

impl SvgSurface {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, body: String::new() }
    }

    /// The complete SVG document.
    #[must_use]
    pub fn finish(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body,
        )
    }
}

impl Surface for SvgSurface {
    type Error = Infallible;

    fn clear(&mut self, width: f64, height: f64) -> Result<(), Infallible> {
        self.width = width;
        self.height = height;
        self.body.clear();
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Point], style: &LineStyle) -> Result<(), Infallible> {
        if points.is_empty() {
            return Ok(());
        }
        let coords = points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        self.body.push_str(&format!(
            "  <polyline points=\"{coords}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-opacity=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
            escape_attr(&style.color),
            style.width,
            style.alpha,
        ));
        Ok(())
    }
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
