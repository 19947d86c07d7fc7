//! SVG rendering of a report.
//!
//! The SVG backend emits text as `<text>` elements, so no font rasterizer is
//! needed. The branding image (if any) is appended as an `<image>` element
//! with an embedded data URI, making the exported file self-contained.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::domain::{BrandingAsset, Theme};
use crate::error::AppError;
use crate::render::to_plotters;
use crate::report::{AwaitingSpec, ChartSpec, Label, PixelRect, ReportSpec, TextAlign};

type DrawResult = Result<(), Box<dyn std::error::Error>>;

/// Render a report to an SVG document.
///
/// `branding` is only drawn when the layout reserved a region for it.
pub fn render_svg(spec: &ReportSpec, theme: &Theme, branding: Option<&BrandingAsset>) -> Result<String, AppError> {
    let mut buf = String::new();
    let drawn = match spec {
        ReportSpec::Awaiting(awaiting) => draw_awaiting(&mut buf, awaiting, theme),
        ReportSpec::Chart(chart) => draw_chart(&mut buf, chart, theme),
    };
    drawn.map_err(|e| AppError::new(4, format!("Failed to render SVG: {e}")))?;

    if let (Some(chart), Some(asset)) = (spec.as_chart(), branding) {
        if let Some(region) = chart.branding_area {
            buf = embed_branding(buf, region, asset);
        }
    }

    Ok(buf)
}

fn draw_awaiting(buf: &mut String, spec: &AwaitingSpec, theme: &Theme) -> DrawResult {
    let root = SVGBackend::with_string(buf, (spec.canvas.width, spec.canvas.height)).into_drawing_area();
    root.fill(&to_plotters(theme.palette.background))?;

    let style = (theme.fonts.family.as_str(), theme.fonts.status_size as f64)
        .into_font()
        .style(FontStyle::Bold)
        .color(&to_plotters(spec.color))
        .pos(Pos::new(HPos::Center, VPos::Center));
    let center = ((spec.canvas.width / 2) as i32, (spec.canvas.height / 2) as i32);
    root.draw(&Text::new(spec.message.as_str(), center, style))?;

    root.present()?;
    Ok(())
}

fn draw_chart(buf: &mut String, spec: &ChartSpec, theme: &Theme) -> DrawResult {
    let root = SVGBackend::with_string(buf, (spec.canvas.width, spec.canvas.height)).into_drawing_area();
    root.fill(&to_plotters(theme.palette.background))?;

    // Header: title + status line, in pixels relative to the header area.
    let header = sub_area(&root, spec.header_area);
    for line in &spec.header_lines {
        header.draw(&Text::new(
            line.text.as_str(),
            (line.x.round() as i32, line.y.round() as i32),
            text_style(line, theme),
        ))?;
    }

    let plot = sub_area(&root, spec.plot_area);
    let (x0, x1) = (spec.x_range.min, spec.x_range.max);
    let (y0, y1) = (spec.y_range.min, spec.y_range.max);
    let mut chart = ChartBuilder::on(&plot).build_cartesian_2d(x0..x1, y0..y1)?;

    // 1) Reference zones (behind everything else).
    chart.draw_series(spec.zones.iter().map(|z| {
        Rectangle::new(
            [(z.low, y0), (z.high, y1)],
            to_plotters(z.color).mix(z.opacity).filled(),
        )
    }))?;

    // 2) Guide lines from the FMV / ask markers down to the annotation row.
    let guide = to_plotters(theme.palette.guide).mix(0.4).stroke_width(1);
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(spec.fmv.x, spec.fmv.y), (spec.fmv.x, spec.fmv.guide_floor)],
        guide,
    )))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(spec.ask.x, spec.ask.y), (spec.ask.x, spec.ask.guide_floor)],
        to_plotters(spec.ask.color).stroke_width(2),
    )))?;

    // 3) Market ranges with end dots.
    for range in [&spec.transacted, &spec.asking] {
        let color = to_plotters(range.color);
        let (lo, hi, y) = (range.range.low, range.range.high, range.y);
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(lo, y), (hi, y)],
            color.stroke_width(range.line_width),
        )))?;
        chart.draw_series(
            [lo, hi]
                .into_iter()
                .map(|x| Circle::new((x, y), range.line_width + 2, color.filled())),
        )?;
    }

    // 4) FMV and ask markers.
    for marker in [&spec.fmv, &spec.ask] {
        let pos = (marker.x, marker.y);
        chart.draw_series(std::iter::once(Circle::new(
            pos,
            marker.radius,
            to_plotters(marker.color).filled(),
        )))?;
        if marker.outlined {
            chart.draw_series(std::iter::once(Circle::new(
                pos,
                marker.radius,
                to_plotters(theme.palette.text).stroke_width(2),
            )))?;
        }
    }

    // 5) Labels.
    for label in &spec.plot_labels {
        chart.draw_series(std::iter::once(Text::new(
            label.text.clone(),
            (label.x, label.y),
            text_style(label, theme),
        )))?;
    }

    root.present()?;
    Ok(())
}

fn sub_area<'a>(
    root: &DrawingArea<SVGBackend<'a>, plotters::coord::Shift>,
    rect: PixelRect,
) -> DrawingArea<SVGBackend<'a>, plotters::coord::Shift> {
    root.clone()
        .shrink((rect.x, rect.y), (rect.width, rect.height))
}

fn text_style<'a>(label: &Label, theme: &'a Theme) -> TextStyle<'a> {
    let font_style = match (label.bold, label.italic) {
        (true, _) => FontStyle::Bold,
        (false, true) => FontStyle::Italic,
        (false, false) => FontStyle::Normal,
    };
    let h = match label.align {
        TextAlign::Left => HPos::Left,
        TextAlign::Center => HPos::Center,
        TextAlign::Right => HPos::Right,
    };
    (theme.fonts.family.as_str(), label.size as f64)
        .into_font()
        .style(font_style)
        .color(&to_plotters(label.color))
        .pos(Pos::new(h, VPos::Center))
}

/// Append an `<image>` element for the branding region before `</svg>`.
fn embed_branding(mut svg: String, region: PixelRect, asset: &BrandingAsset) -> String {
    let Some(close) = svg.rfind("</svg>") else {
        return svg;
    };
    let element = format!(
        r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMaxYMid meet" href="data:{};base64,{}"/>"#,
        region.x,
        region.y,
        region.width,
        region.height,
        asset.mime,
        BASE64.encode(&asset.bytes)
    );
    svg.insert_str(close, &element);
    svg
}
