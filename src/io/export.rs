//! Write rendered reports to disk.
//!
//! The file stem always comes from `report::export_filename`, which is already
//! path-safe; this module only appends the extension and writes bytes.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::domain::ValuationResult;
use crate::error::AppError;
use crate::report::ReportSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Json => "json",
        }
    }
}

/// A saved report (JSON): the engine output plus the layout built from it.
#[derive(Debug, Clone, Serialize)]
pub struct ReportFile<'a> {
    pub tool: &'static str,
    pub generated_at: DateTime<FixedOffset>,
    pub valuation: Option<&'a ValuationResult>,
    pub report: &'a ReportSpec,
}

/// `{out_dir}/{stem}.{ext}`.
pub fn export_path(out_dir: &Path, stem: &str, format: ExportFormat) -> PathBuf {
    out_dir.join(format!("{stem}.{}", format.extension()))
}

/// Write an SVG document.
pub fn write_svg(path: &Path, svg: &str) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create SVG '{}': {e}", path.display())))?;
    file.write_all(svg.as_bytes())
        .map_err(|e| AppError::new(2, format!("Failed to write SVG '{}': {e}", path.display())))?;

    tracing::info!(path = %path.display(), bytes = svg.len(), "wrote svg export");
    Ok(())
}

/// Write the report JSON file.
pub fn write_report_json(path: &Path, file: &ReportFile<'_>) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    tracing::info!(path = %path.display(), "wrote json export");
    Ok(())
}
