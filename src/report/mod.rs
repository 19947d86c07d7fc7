//! Report layout: turn an evaluation outcome into a render-ready description.
//!
//! `build_report` does no drawing. It computes every coordinate, color and
//! string a renderer needs, so the SVG exporter, the TUI chart and the ASCII
//! plot all show the same picture.

use serde::Serialize;

use crate::domain::{
    BrandingAsset, ClassificationPolicy, DisplayMetadata, PREMIUM_THRESHOLD, PriceRange, Rgb, Theme,
    Tier, ValuationResult, WITHIN_THRESHOLD,
};
use crate::valuation::{ValuationError, classify};

pub mod filename;
pub mod format;

pub use filename::*;
pub use format::*;

/// Fixed y-coordinate of the transacted range row.
pub const ROW_TRANSACTED: f64 = 2.0;
/// Fixed y-coordinate of the asking range row.
pub const ROW_ASKING: f64 = 1.0;
/// Fixed y-coordinate of the marker annotations (FMV / MY ASK).
pub const ROW_ANNOTATION: f64 = 0.2;
/// The MY ASK annotation drops here when it would collide with the FMV one.
pub const ROW_ANNOTATION_STACKED: f64 = 0.0;
/// Guide lines drop from a marker down to this y.
pub const GUIDE_FLOOR: f64 = 0.4;
/// Generated-at footer line.
pub const ROW_FOOTER: f64 = -0.2;
/// Vertical extent of the plot.
pub const Y_RANGE: AxisRange = AxisRange { min: -0.4, max: 2.6 };

/// Share of the data span added as horizontal padding.
const PADDING_FRACTION: f64 = 0.25;

/// Average glyph advance as a fraction of the font size. Errs wide for
/// bold sans-serif so width checks stay conservative.
pub const GLYPH_WIDTH_EM: f64 = 0.6;
/// Header text shrinks down to this size before it is truncated.
const MIN_HEADER_FONT: u32 = 10;

/// Inputs to `build_report` besides the outcome and labels.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions<'a> {
    pub theme: &'a Theme,
    pub branding: Option<&'a BrandingAsset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// Pixel rectangle, origin at the canvas top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// The three constant-y rows. Alternate renderers group content by these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RowLayout {
    pub transacted: f64,
    pub asking: f64,
    pub annotation: f64,
}

/// A shaded reference band (x extent only; spans the full plot height).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Zone {
    pub low: f64,
    pub high: f64,
    pub tier: Tier,
    pub color: Rgb,
    pub opacity: f64,
}

/// A horizontal line between two PSF values on a fixed row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeMarker {
    pub label: String,
    pub range: PriceRange,
    pub y: f64,
    pub color: Rgb,
    pub line_width: u32,
}

/// A single PSF value, with a guide line dropping to `guide_floor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointMarker {
    pub x: f64,
    pub y: f64,
    pub guide_floor: f64,
    pub color: Rgb,
    pub radius: u32,
    /// Draw a dark outline around the marker.
    pub outlined: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A text item. Coordinates are data units for plot labels and pixels
/// (relative to the header area) for header lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub align: TextAlign,
    pub color: Rgb,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
}

/// Placeholder shown until every required input is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwaitingSpec {
    pub canvas: Canvas,
    pub message: String,
    pub color: Rgb,
}

/// Full chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub canvas: Canvas,
    pub header_area: PixelRect,
    pub plot_area: PixelRect,
    pub branding_area: Option<PixelRect>,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
    pub rows: RowLayout,
    pub zones: [Zone; 3],
    pub transacted: RangeMarker,
    pub asking: RangeMarker,
    pub fmv: PointMarker,
    pub ask: PointMarker,
    pub plot_labels: Vec<Label>,
    pub header_lines: Vec<Label>,
    pub tier: Tier,
    pub variance_pct: f64,
    pub status_text: String,
    pub status_color: Rgb,
    pub export_filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReportSpec {
    Awaiting(AwaitingSpec),
    Chart(Box<ChartSpec>),
}

impl ReportSpec {
    pub fn as_chart(&self) -> Option<&ChartSpec> {
        match self {
            ReportSpec::Chart(chart) => Some(chart),
            ReportSpec::Awaiting(_) => None,
        }
    }

    pub fn canvas(&self) -> Canvas {
        match self {
            ReportSpec::Chart(chart) => chart.canvas,
            ReportSpec::Awaiting(awaiting) => awaiting.canvas,
        }
    }
}

/// Build the layout for one render cycle.
///
/// `InsufficientData` yields `ReportSpec::Awaiting` without touching any of the
/// (absent) numbers.
pub fn build_report(
    outcome: &Result<ValuationResult, ValuationError>,
    meta: &DisplayMetadata,
    options: &ReportOptions<'_>,
) -> ReportSpec {
    let theme = options.theme;
    let canvas = Canvas {
        width: theme.canvas_width,
        height: theme.canvas_height,
    };

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            return ReportSpec::Awaiting(AwaitingSpec {
                canvas,
                message: awaiting_message(err),
                color: theme.palette.awaiting,
            });
        }
    };

    let palette = &theme.palette;
    let fonts = &theme.fonts;
    let (header_area, plot_area, branding_area) = canvas_regions(canvas, theme, options.branding.is_some());

    let (data_min, _, padding) = data_extent(result);
    let x_range = x_axis_range(result);
    let status_color = palette.tier_color(result.tier);

    let zones = reference_zones(result, theme);

    let transacted = RangeMarker {
        label: "TRANSACTED".to_string(),
        range: result.transacted,
        y: ROW_TRANSACTED,
        color: palette.transacted,
        line_width: theme.range_line_width,
    };
    let asking = RangeMarker {
        label: "ASKING".to_string(),
        range: result.asking,
        y: ROW_ASKING,
        color: palette.asking,
        line_width: theme.range_line_width,
    };
    let fmv = PointMarker {
        x: result.fmv_psf,
        y: ROW_TRANSACTED,
        guide_floor: GUIDE_FLOOR,
        color: palette.fmv,
        radius: theme.marker_radius,
        outlined: false,
    };
    let ask = PointMarker {
        x: result.ask_psf,
        y: ROW_ASKING,
        guide_floor: GUIDE_FLOOR,
        color: status_color,
        radius: theme.ask_marker_radius,
        outlined: true,
    };

    let row_label_x = data_min - padding * 0.15;
    let plot_label = |text: String, x: f64, y: f64, align: TextAlign, color: Rgb| Label {
        text,
        x,
        y,
        align,
        color,
        size: fonts.label_size,
        bold: fonts.bold_labels,
        italic: false,
    };

    // Centered annotations collide when FMV and ask sit close together.
    let fmv_text = format!("FMV {}", fmt_psf(result.fmv_psf));
    let ask_text = format!("MY ASK {}", fmt_psf(result.ask_psf));
    let px_per_unit = plot_area.width as f64 / x_range.span();
    let gap = (result.ask_psf - result.fmv_psf).abs() * px_per_unit;
    let needed = (estimated_text_width(&fmv_text, fonts.label_size)
        + estimated_text_width(&ask_text, fonts.label_size))
        / 2.0
        + fonts.label_size as f64;
    let ask_row = if gap < needed { ROW_ANNOTATION_STACKED } else { ROW_ANNOTATION };

    let mut plot_labels = vec![
        plot_label(
            transacted.label.clone(),
            row_label_x,
            ROW_TRANSACTED,
            TextAlign::Right,
            palette.transacted,
        ),
        plot_label(asking.label.clone(), row_label_x, ROW_ASKING, TextAlign::Right, palette.asking),
        plot_label(fmv_text, result.fmv_psf, ROW_ANNOTATION, TextAlign::Center, palette.text),
        plot_label(ask_text, result.ask_psf, ask_row, TextAlign::Center, status_color),
    ];
    plot_labels.push(Label {
        text: format!("Report Generated: {}", generated_label(meta)),
        x: (x_range.min + x_range.max) / 2.0,
        y: ROW_FOOTER,
        align: TextAlign::Center,
        color: palette.muted,
        size: fonts.footer_size,
        bold: false,
        italic: true,
    });

    let header_mid = header_area.width as f64 / 2.0;
    let header_h = header_area.height as f64;
    // SVG text is not clipped, so each line must fit the (possibly narrowed) header.
    let header_w = header_area.width as f64;
    let (title, title_size) = fit_text(&title_line(result, meta), fonts.title_size, header_w);
    let (status, status_size) = fit_text(
        &format!("ANALYSIS: {}", result.tier.headline(result.variance_pct)),
        fonts.status_size,
        header_w,
    );
    let header_lines = vec![
        Label {
            text: title,
            x: header_mid,
            y: header_h * 0.3,
            align: TextAlign::Center,
            color: palette.text,
            size: title_size,
            bold: true,
            italic: false,
        },
        Label {
            text: status,
            x: header_mid,
            y: header_h * 0.75,
            align: TextAlign::Center,
            color: status_color,
            size: status_size,
            bold: true,
            italic: false,
        },
    ];

    ReportSpec::Chart(Box::new(ChartSpec {
        canvas,
        header_area,
        plot_area,
        branding_area,
        x_range,
        y_range: Y_RANGE,
        rows: RowLayout {
            transacted: ROW_TRANSACTED,
            asking: ROW_ASKING,
            annotation: ROW_ANNOTATION,
        },
        zones,
        transacted,
        asking,
        fmv,
        ask,
        plot_labels,
        header_lines,
        tier: result.tier,
        variance_pct: result.variance_pct,
        status_text: result.tier.headline(result.variance_pct).to_string(),
        status_color,
        export_filename: export_filename(meta),
    }))
}

/// X bounds covering every plotted value, padded on both sides.
///
/// `padding = span * 0.25`; the left side gets the full padding (room for the
/// row labels), the right side half of it.
pub fn x_axis_range(result: &ValuationResult) -> AxisRange {
    let (min, max, padding) = data_extent(result);
    AxisRange {
        min: min - padding,
        max: max + padding * 0.5,
    }
}

/// `(min, max, padding)` over every plotted PSF value.
fn data_extent(result: &ValuationResult) -> (f64, f64, f64) {
    let values = [
        result.transacted.low,
        result.transacted.high,
        result.asking.low,
        result.asking.high,
        result.fmv_psf,
        result.ask_psf,
        result.bands.lower_10,
        result.bands.upper_10,
    ];
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // The ±10% bands keep the span positive for any positive FMV.
    let mut padding = (max - min) * PADDING_FRACTION;
    if !(padding.is_finite() && padding > 0.0) {
        padding = (result.fmv_psf.abs() * WITHIN_THRESHOLD).max(1.0);
    }

    (min, max, padding)
}

/// Symmetric ±5% / ±10% bands, tinted by the tier at each band's outer edge
/// measured as distance from FMV.
fn reference_zones(result: &ValuationResult, theme: &Theme) -> [Zone; 3] {
    let b = &result.bands;
    let zone = |low: f64, high: f64, edge: f64| {
        let tier = classify(edge, ClassificationPolicy::Absolute);
        Zone {
            low,
            high,
            tier,
            color: theme.palette.tier_color(tier),
            opacity: theme.zone_opacity,
        }
    };

    [
        zone(b.lower_10, b.lower_5, PREMIUM_THRESHOLD),
        zone(b.lower_5, b.upper_5, WITHIN_THRESHOLD),
        zone(b.upper_5, b.upper_10, PREMIUM_THRESHOLD),
    ]
}

/// Split the canvas into header, plot and (optional) branding regions.
///
/// The branding region sits in the top-right corner of the header band; the
/// header text region is narrowed so the two never overlap.
fn canvas_regions(canvas: Canvas, theme: &Theme, with_branding: bool) -> (PixelRect, PixelRect, Option<PixelRect>) {
    let m = theme.margin.min(canvas.width / 8).min(canvas.height / 8);
    let inner_w = canvas.width.saturating_sub(2 * m);
    let header_h = ((canvas.height as f64 * theme.header_ratio.clamp(0.05, 0.5)).round() as u32).max(1);

    let branding_area = with_branding.then(|| {
        let bw = ((canvas.width as f64 * theme.branding_ratio.clamp(0.02, 0.4)).round() as u32).max(1);
        PixelRect {
            x: canvas.width.saturating_sub(m + bw),
            y: m,
            width: bw,
            height: header_h,
        }
    });

    let header_w = match &branding_area {
        Some(b) => inner_w.saturating_sub(b.width + m),
        None => inner_w,
    };
    let header_area = PixelRect {
        x: m,
        y: m,
        width: header_w,
        height: header_h,
    };

    let plot_y = m + header_h + m;
    let plot_area = PixelRect {
        x: m,
        y: plot_y,
        width: inner_w,
        height: canvas.height.saturating_sub(plot_y + m).max(1),
    };

    (header_area, plot_area, branding_area)
}

fn awaiting_message(err: &ValuationError) -> String {
    let labels: Vec<&str> = err.missing().iter().map(|f| f.label()).collect();
    if labels.is_empty() {
        "AWAITING INPUT".to_string()
    } else {
        format!("AWAITING INPUT: {}", labels.join(", "))
    }
}

/// Rough rendered width of `text` in pixels at `size`.
pub fn estimated_text_width(text: &str, size: u32) -> f64 {
    text.chars().count() as f64 * size as f64 * GLYPH_WIDTH_EM
}

/// Shrink `text` to fit `max_width`; below `MIN_HEADER_FONT` it is truncated
/// with an ellipsis instead.
fn fit_text(text: &str, size: u32, max_width: f64) -> (String, u32) {
    if estimated_text_width(text, size) <= max_width {
        return (text.to_string(), size);
    }

    let chars = text.chars().count() as f64;
    let shrunk = (max_width / (chars * GLYPH_WIDTH_EM)).floor() as u32;
    if shrunk >= MIN_HEADER_FONT {
        return (text.to_string(), shrunk);
    }

    let size = MIN_HEADER_FONT.min(size);
    let max_chars = (max_width / (size as f64 * GLYPH_WIDTH_EM)).floor() as usize;
    if max_chars == 0 {
        return (String::new(), size);
    }
    let kept: String = text.chars().take(max_chars - 1).collect();
    (format!("{}…", kept.trim_end()), size)
}

fn title_line(result: &ValuationResult, meta: &DisplayMetadata) -> String {
    let mut line = format!(
        "Dev: {}  |  Unit: {}  |  Size: {} sqft  |  Type: {}",
        meta.dev_name,
        meta.unit_no,
        fmt_size(result.size_sqft),
        meta.unit_type
    );
    if !meta.prepared_by.trim().is_empty() {
        line.push_str(&format!("  |  Prepared by: {}", meta.prepared_by.trim()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BandBounds, PropertyInputs, RequiredField};
    use crate::valuation::evaluate;
    use chrono::{FixedOffset, TimeZone};
    use std::path::PathBuf;

    fn meta() -> DisplayMetadata {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        DisplayMetadata {
            dev_name: "KRHR".to_string(),
            unit_no: "02-57".to_string(),
            unit_type: "3 Room".to_string(),
            prepared_by: "Jane Tan".to_string(),
            generated_at: tz.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap(),
        }
    }

    fn sample_result() -> ValuationResult {
        evaluate(&PropertyInputs {
            size_sqft: Some(1079.0),
            transacted_low: Some(1000.0),
            transacted_high: Some(1200.0),
            asking_low: Some(1050.0),
            asking_high: Some(1300.0),
            fmv_psf: Some(1150.0),
            ask_psf: Some(1250.0),
        })
        .unwrap()
    }

    fn chart(outcome: &Result<ValuationResult, ValuationError>, branding: Option<&BrandingAsset>) -> ChartSpec {
        let theme = Theme::default();
        let options = ReportOptions { theme: &theme, branding };
        match build_report(outcome, &meta(), &options) {
            ReportSpec::Chart(c) => *c,
            ReportSpec::Awaiting(a) => panic!("expected chart, got {a:?}"),
        }
    }

    #[test]
    fn axis_range_pads_min_and_max() {
        let r = sample_result();
        // values span 1000 (transacted low) .. 1300 (asking high); fmv*1.1 = 1265.
        let range = x_axis_range(&r);
        assert!((range.min - (1000.0 - 75.0)).abs() < 1e-9);
        assert!((range.max - (1300.0 + 37.5)).abs() < 1e-9);
    }

    #[test]
    fn axis_range_includes_ten_percent_bands() {
        let mut r = sample_result();
        r.fmv_psf = 2000.0;
        r.bands = BandBounds::around(2000.0);
        let range = x_axis_range(&r);
        assert!(range.contains(1800.0));
        assert!(range.contains(2200.0));
    }

    #[test]
    fn every_marker_is_inside_the_axis() {
        let c = chart(&Ok(sample_result()), None);
        for x in [
            c.transacted.range.low,
            c.transacted.range.high,
            c.asking.range.low,
            c.asking.range.high,
            c.fmv.x,
            c.ask.x,
        ] {
            assert!(c.x_range.contains(x), "{x} outside {:?}", c.x_range);
        }
        for label in &c.plot_labels {
            assert!(c.x_range.contains(label.x), "{} outside axis", label.text);
            assert!(c.y_range.contains(label.y), "{} outside axis", label.text);
        }
    }

    #[test]
    fn rows_are_fixed() {
        let c = chart(&Ok(sample_result()), None);
        assert_eq!(c.transacted.y, ROW_TRANSACTED);
        assert_eq!(c.asking.y, ROW_ASKING);
        assert_eq!(c.fmv.y, ROW_TRANSACTED);
        assert_eq!(c.ask.y, ROW_ASKING);
        assert_eq!(c.rows.annotation, ROW_ANNOTATION);
    }

    #[test]
    fn status_color_follows_tier() {
        let palette = Theme::default().palette;
        let c = chart(&Ok(sample_result()), None);
        // 1250 vs 1150 is ~8.7% over.
        assert_eq!(c.tier, Tier::Premium);
        assert_eq!(c.status_color, palette.premium);
        assert_eq!(c.ask.color, palette.premium);
        assert_eq!(c.header_lines[1].text, "ANALYSIS: 5% - 10% ABOVE FMV (PREMIUM)");
    }

    #[test]
    fn zones_are_symmetric_bands_around_fmv() {
        let palette = Theme::default().palette;
        let c = chart(&Ok(sample_result()), None);
        let b = BandBounds::around(1150.0);
        assert_eq!((c.zones[0].low, c.zones[0].high), (b.lower_10, b.lower_5));
        assert_eq!((c.zones[1].low, c.zones[1].high), (b.lower_5, b.upper_5));
        assert_eq!((c.zones[2].low, c.zones[2].high), (b.upper_5, b.upper_10));
        assert_eq!(c.zones[0].color, palette.premium);
        assert_eq!(c.zones[1].color, palette.within);
        assert_eq!(c.zones[2].color, palette.premium);
        assert!(c.zones.iter().all(|z| (z.opacity - 0.15).abs() < 1e-12));
    }

    #[test]
    fn labels_carry_prices_and_timestamp() {
        let c = chart(&Ok(sample_result()), None);
        let texts: Vec<&str> = c.plot_labels.iter().map(|l| l.text.as_str()).collect();
        assert!(texts.contains(&"FMV $1,150"));
        assert!(texts.contains(&"MY ASK $1,250"));
        assert!(texts.contains(&"Report Generated: 19 Oct 2026, 14:05 (GMT+8)"));
        assert_eq!(
            c.header_lines[0].text,
            "Dev: KRHR  |  Unit: 02-57  |  Size: 1,079 sqft  |  Type: 3 Room  |  Prepared by: Jane Tan"
        );
        assert_eq!(c.export_filename, "KRHR_02-57_Jane-Tan_20261019");
    }

    #[test]
    fn branding_region_does_not_overlap_text_regions() {
        let asset = BrandingAsset {
            source: PathBuf::from("logo.png"),
            mime: "image/png",
            bytes: vec![1, 2, 3],
        };
        let c = chart(&Ok(sample_result()), Some(&asset));
        let branding = c.branding_area.expect("branding region reserved");
        assert!(!branding.intersects(&c.header_area));
        assert!(!branding.intersects(&c.plot_area));
        assert!(branding.right() <= c.canvas.width);
        let theme = Theme::default();
        assert_eq!(branding.width, (theme.canvas_width as f64 * theme.branding_ratio).round() as u32);

        let plain = chart(&Ok(sample_result()), None);
        assert!(plain.branding_area.is_none());
        assert!(plain.header_area.width > c.header_area.width);
    }

    fn logo() -> BrandingAsset {
        BrandingAsset {
            source: PathBuf::from("logo.png"),
            mime: "image/png",
            bytes: vec![1, 2, 3],
        }
    }

    fn header_with(dev: &str) -> ChartSpec {
        let theme = Theme::default();
        let asset = logo();
        let mut m = meta();
        m.dev_name = dev.to_string();
        let options = ReportOptions { theme: &theme, branding: Some(&asset) };
        match build_report(&Ok(sample_result()), &m, &options) {
            ReportSpec::Chart(c) => *c,
            ReportSpec::Awaiting(a) => panic!("expected chart, got {a:?}"),
        }
    }

    fn assert_header_clears_logo(c: &ChartSpec) {
        let branding = c.branding_area.expect("branding region reserved");
        for line in &c.header_lines {
            let half = estimated_text_width(&line.text, line.size) / 2.0;
            let left = c.header_area.x as f64 + line.x - half;
            let right = c.header_area.x as f64 + line.x + half;
            assert!(left >= c.header_area.x as f64, "{} starts left of header", line.text);
            assert!(right <= c.header_area.right() as f64, "{} overruns header", line.text);
            assert!(right <= branding.x as f64, "{} runs into the logo", line.text);
        }
    }

    #[test]
    fn long_title_shrinks_to_clear_branding() {
        let c = header_with("The Kallang River Residences at Bendemeer");
        assert_header_clears_logo(&c);
        let title = &c.header_lines[0];
        assert!(title.text.starts_with("Dev: The Kallang River Residences at Bendemeer  |"));
        assert!(title.text.ends_with("Prepared by: Jane Tan"));
        assert!(title.size < Theme::default().fonts.title_size);
    }

    #[test]
    fn absurd_title_is_truncated() {
        let c = header_with(&"Residences ".repeat(40));
        assert_header_clears_logo(&c);
        let title = &c.header_lines[0];
        assert!(title.text.ends_with('…'));
        assert_eq!(title.size, MIN_HEADER_FONT);
    }

    #[test]
    fn annotations_stack_when_ask_meets_fmv() {
        let mut r = sample_result();
        r.ask_psf = r.fmv_psf;
        let c = chart(&Ok(r), None);
        let y_of = |prefix: &str| {
            c.plot_labels
                .iter()
                .find(|l| l.text.starts_with(prefix))
                .map(|l| l.y)
                .unwrap()
        };
        assert_eq!(y_of("FMV "), ROW_ANNOTATION);
        assert_eq!(y_of("MY ASK "), ROW_ANNOTATION_STACKED);

        // Far apart: both on the annotation row.
        let c = chart(&Ok(sample_result()), None);
        assert!(c.plot_labels.iter().filter(|l| l.y == ROW_ANNOTATION).count() == 2);
    }

    #[test]
    fn insufficient_data_yields_awaiting_only() {
        let theme = Theme::default();
        let options = ReportOptions { theme: &theme, branding: None };
        let outcome = Err(ValuationError::InsufficientData {
            missing: vec![RequiredField::Fmv],
        });
        let spec = build_report(&outcome, &meta(), &options);
        match spec {
            ReportSpec::Awaiting(a) => {
                assert_eq!(a.message, "AWAITING INPUT: FMV PSF");
                assert_eq!(a.color, theme.palette.awaiting);
            }
            ReportSpec::Chart(_) => panic!("expected awaiting state"),
        }
    }

    #[test]
    fn spec_serializes_with_state_tag() {
        let theme = Theme::default();
        let options = ReportOptions { theme: &theme, branding: None };
        let spec = build_report(&Ok(sample_result()), &meta(), &options);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["state"], "chart");
        assert_eq!(json["tier"], "premium");
        assert_eq!(json["status_color"], "#f1c40f");
    }
}
