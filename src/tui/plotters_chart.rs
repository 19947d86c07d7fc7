//! Plotters-powered valuation chart widget for Ratatui.
//!
//! Draws the same `ChartSpec` the SVG exporter uses, so the terminal preview
//! and the exported file agree on zones, ranges and markers.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::Rgb;
use crate::render::{blend_over, to_plotters};
use crate::report::ChartSpec;

const TERMINAL_BACKGROUND: Rgb = Rgb(0, 0, 0);

/// Render-only view over a built chart layout.
pub struct PsfPlottersChart<'a> {
    pub spec: &'a ChartSpec,
    /// Color for axes and tick labels.
    pub axis: RGBColor,
}

impl<'a> Widget for PsfPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let spec = self.spec;
        let axis = self.axis;
        let (x0, x1) = (spec.x_range.min, spec.x_range.max);
        let (y0, y1) = (spec.y_range.min, spec.y_range.max);
        if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Only the PSF axis carries meaning; rows are labelled in the form panel.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .disable_y_axis()
                .x_labels(5)
                .x_label_formatter(&|v| format!("${v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&axis))
                .axis_style(&axis)
                .draw()?;

            // 1) Reference zones. Terminal cells cannot alpha-blend, so the tint
            // is pre-mixed over the dark terminal background.
            chart.draw_series(spec.zones.iter().map(|z| {
                Rectangle::new(
                    [(z.low, y0), (z.high, y1)],
                    blend_over(z.color, TERMINAL_BACKGROUND, z.opacity).filled(),
                )
            }))?;

            // 2) Market ranges.
            for range in [&spec.transacted, &spec.asking] {
                chart.draw_series(LineSeries::new(
                    [(range.range.low, range.y), (range.range.high, range.y)],
                    &to_plotters(range.color),
                ))?;
            }

            // 3) Guides and markers.
            //
            // `Circle` is avoided on purpose: `plotters-ratatui-backend` maps circle
            // radii to normalized canvas units, producing huge circles. A `Pixel`
            // gives a clean dot in terminals.
            // The FMV marker is black in the theme, so it takes the axis color here.
            let markers = [(&spec.fmv, axis), (&spec.ask, to_plotters(spec.status_color))];
            for (marker, color) in markers {
                chart.draw_series(LineSeries::new(
                    [(marker.x, marker.guide_floor), (marker.x, marker.y)],
                    &color,
                ))?;
                chart.draw_series(std::iter::once(Pixel::new((marker.x, marker.y), color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
