//! Draw a `ReportSpec` with Plotters.
//!
//! Only the SVG backend is used for exports; the TUI reuses the color
//! conversion and draws through `plotters-ratatui-backend`.

use plotters::style::RGBColor;

use crate::domain::Rgb;

pub mod svg;

pub use svg::*;

pub fn to_plotters(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// `c` composited at `opacity` over an opaque `background`.
pub fn blend_over(c: Rgb, background: Rgb, opacity: f64) -> RGBColor {
    let a = if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { 1.0 };
    let mix = |fg: u8, bg: u8| (fg as f64 * a + bg as f64 * (1.0 - a)).round() as u8;
    RGBColor(mix(c.0, background.0), mix(c.1, background.1), mix(c.2, background.2))
}
