//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - reference zones: `:` (within ±5%), `.` (5–10% bands)
//! - market ranges: `o---o`
//! - FMV marker: `F`, asking price marker: `A`, guide lines: `|`

use crate::domain::Tier;
use crate::report::{AxisRange, ChartSpec, ReportSpec};

/// Width of the row-label gutter on the left.
const GUTTER: usize = 11;
/// Minimum column distance between the FMV and ASK captions on one row.
const CAPTION_SPACING: usize = 4;

/// Render a report as a character grid.
pub fn render_ascii_plot(spec: &ReportSpec, width: usize, height: usize) -> String {
    match spec {
        ReportSpec::Awaiting(awaiting) => format!("Plot: awaiting input\n{}\n", awaiting.message),
        ReportSpec::Chart(chart) => render_chart(chart, width, height),
    }
}

fn render_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(20);
    let height = height.max(8);
    let xr = spec.x_range;
    let yr = spec.y_range;

    let mut grid = vec![vec![' '; width]; height];

    // Zones first so everything else overlays them.
    for zone in &spec.zones {
        let ch = match zone.tier {
            Tier::Within => ':',
            Tier::Premium | Tier::HighPremium => '.',
        };
        let x0 = map_x(zone.low, xr, width);
        let x1 = map_x(zone.high, xr, width);
        for row in grid.iter_mut() {
            for cell in row.iter_mut().take(x1 + 1).skip(x0) {
                *cell = ch;
            }
        }
    }

    // Guides drop from the marker row to the floor row.
    for marker in [&spec.fmv, &spec.ask] {
        let x = map_x(marker.x, xr, width);
        let top = map_y(marker.y, yr, height);
        let bottom = map_y(marker.guide_floor, yr, height);
        for row in grid.iter_mut().take(bottom + 1).skip(top) {
            row[x] = '|';
        }
    }

    for range in [&spec.transacted, &spec.asking] {
        let y = map_y(range.y, yr, height);
        let x0 = map_x(range.range.low, xr, width);
        let x1 = map_x(range.range.high, xr, width);
        for cell in grid[y].iter_mut().take(x1 + 1).skip(x0) {
            *cell = '-';
        }
        grid[y][x0] = 'o';
        grid[y][x1] = 'o';
    }

    let fmv_row = map_y(spec.fmv.y, yr, height);
    grid[fmv_row][map_x(spec.fmv.x, xr, width)] = 'F';
    let ask_row = map_y(spec.ask.y, yr, height);
    grid[ask_row][map_x(spec.ask.x, xr, width)] = 'A';

    // Centered marker captions on the annotation row; ASK drops a row when
    // the two would touch.
    let note_row = map_y(spec.rows.annotation, yr, height);
    let fmv_col = map_x(spec.fmv.x, xr, width);
    let ask_col = map_x(spec.ask.x, xr, width);
    let ask_note_row = if fmv_col.abs_diff(ask_col) < CAPTION_SPACING {
        if note_row + 1 < height { note_row + 1 } else { note_row - 1 }
    } else {
        note_row
    };
    put_centered(&mut grid[note_row], fmv_col, "FMV");
    put_centered(&mut grid[ask_note_row], ask_col, "ASK");

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: psf=[{:.0}, {:.0}] | ANALYSIS: {} ({:+.2}%)\n",
        xr.min,
        xr.max,
        spec.status_text,
        spec.variance_pct * 100.0
    ));

    for (i, row) in grid.into_iter().enumerate() {
        let gutter = if i == fmv_row {
            "TRANSACTED"
        } else if i == ask_row {
            "ASKING"
        } else {
            ""
        };
        let line = format!("{gutter:<GUTTER$}{}", row.into_iter().collect::<String>());
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str("Legend: o range ends | F fmv | A ask | : within 5% | . 5-10% band\n");
    out
}

fn put_centered(row: &mut [char], center: usize, text: &str) {
    let len = text.chars().count();
    let start = center.saturating_sub(len / 2);
    for (i, ch) in text.chars().enumerate() {
        if let Some(cell) = row.get_mut(start + i) {
            *cell = ch;
        }
    }
}

fn map_x(v: f64, range: AxisRange, width: usize) -> usize {
    let width = width.max(2);
    let u = ((v - range.min) / range.span()).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(v: f64, range: AxisRange, height: usize) -> usize {
    let height = height.max(2);
    let u = ((v - range.min) / range.span()).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayMetadata, PropertyInputs, RequiredField, Theme};
    use crate::report::{ReportOptions, build_report};
    use crate::valuation::{ValuationError, evaluate};
    use chrono::{FixedOffset, TimeZone};

    fn meta() -> DisplayMetadata {
        DisplayMetadata {
            dev_name: "KRHR".to_string(),
            unit_no: "02-57".to_string(),
            unit_type: "3 Room".to_string(),
            prepared_by: String::new(),
            generated_at: FixedOffset::east_opt(8 * 3600)
                .unwrap()
                .with_ymd_and_hms(2026, 10, 19, 14, 5, 0)
                .unwrap(),
        }
    }

    fn spec() -> ReportSpec {
        spec_with_ask(1250.0)
    }

    fn spec_with_ask(ask: f64) -> ReportSpec {
        let theme = Theme::default();
        let outcome = evaluate(&PropertyInputs {
            size_sqft: Some(1079.0),
            transacted_low: Some(1000.0),
            transacted_high: Some(1200.0),
            asking_low: Some(1050.0),
            asking_high: Some(1300.0),
            fmv_psf: Some(1150.0),
            ask_psf: Some(ask),
        });
        build_report(&outcome, &meta(), &ReportOptions { theme: &theme, branding: None })
    }

    #[test]
    fn grid_has_header_rows_and_legend() {
        let txt = render_ascii_plot(&spec(), 60, 12);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 1 + 12 + 1);
        assert!(lines[0].starts_with("Plot: psf=[925, 1338] | ANALYSIS: 5% - 10% ABOVE FMV (PREMIUM) (+8.70%)"));
        assert!(lines[13].starts_with("Legend:"));
    }

    #[test]
    fn markers_land_on_their_rows_and_columns() {
        let s = spec();
        let chart = s.as_chart().unwrap();
        let txt = render_ascii_plot(&s, 60, 12);
        let lines: Vec<&str> = txt.lines().collect();

        let transacted = lines.iter().find(|l| l.starts_with("TRANSACTED")).unwrap();
        let asking = lines.iter().find(|l| l.starts_with("ASKING")).unwrap();

        let fmv_col = GUTTER + map_x(chart.fmv.x, chart.x_range, 60);
        let ask_col = GUTTER + map_x(chart.ask.x, chart.x_range, 60);
        assert_eq!(transacted.chars().nth(fmv_col), Some('F'));
        assert_eq!(asking.chars().nth(ask_col), Some('A'));

        let lo_col = GUTTER + map_x(1000.0, chart.x_range, 60);
        assert_eq!(transacted.chars().nth(lo_col), Some('o'));
    }

    fn plot_area(line: &str) -> String {
        line.chars().skip(GUTTER).collect()
    }

    #[test]
    fn captions_split_rows_when_ask_meets_fmv() {
        let txt = render_ascii_plot(&spec_with_ask(1150.0), 60, 12);
        let grid: Vec<String> = txt.lines().skip(1).take(12).map(plot_area).collect();

        let fmv_row = grid.iter().position(|l| l.contains("FMV")).unwrap();
        assert!(!grid[fmv_row].contains("ASK"));
        assert!(grid[fmv_row + 1].contains("ASK"));
    }

    #[test]
    fn captions_share_a_row_when_apart() {
        let txt = render_ascii_plot(&spec(), 60, 12);
        let grid: Vec<String> = txt.lines().skip(1).take(12).map(plot_area).collect();
        let row = grid.iter().find(|l| l.contains("FMV")).unwrap();
        assert!(row.contains("ASK"));
    }

    #[test]
    fn awaiting_plot_is_message_only() {
        let theme = Theme::default();
        let outcome = Err(ValuationError::InsufficientData {
            missing: vec![RequiredField::Size],
        });
        let spec = build_report(&outcome, &meta(), &ReportOptions { theme: &theme, branding: None });
        assert_eq!(
            render_ascii_plot(&spec, 60, 12),
            "Plot: awaiting input\nAWAITING INPUT: size (sqft)\n"
        );
    }

    #[test]
    fn mapping_clamps_to_grid() {
        let r = AxisRange { min: 0.0, max: 10.0 };
        assert_eq!(map_x(-5.0, r, 11), 0);
        assert_eq!(map_x(15.0, r, 11), 10);
        assert_eq!(map_x(5.0, r, 11), 5);
        assert_eq!(map_y(10.0, r, 5), 0);
        assert_eq!(map_y(0.0, r, 5), 4);
    }
}
