//! Shared "report pipeline" logic used by both CLI and TUI front-ends.
//!
//! inputs -> evaluate -> layout
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::PathBuf;

use crate::domain::{BrandingAsset, DisplayMetadata, PropertyInputs, RunConfig, ValuationResult};
use crate::error::AppError;
use crate::io::{ExportFormat, ReportFile, export_path, write_report_json, write_svg};
use crate::report::{ReportOptions, ReportSpec, build_report, export_filename};
use crate::valuation::{ValuationError, evaluate_with_policy};

/// All computed outputs of a single evaluation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub outcome: Result<ValuationResult, ValuationError>,
    pub spec: ReportSpec,
}

impl RunOutput {
    pub fn valuation(&self) -> Option<&ValuationResult> {
        self.outcome.as_ref().ok()
    }
}

/// Evaluate the inputs and build the report layout.
pub fn run_report(
    inputs: &PropertyInputs,
    meta: &DisplayMetadata,
    config: &RunConfig,
    branding: Option<&BrandingAsset>,
) -> RunOutput {
    let outcome = evaluate_with_policy(inputs, config.policy);
    match &outcome {
        Ok(r) => tracing::debug!(
            variance_pct = r.variance_pct,
            tier = r.tier.display_name(),
            policy = r.policy.display_name(),
            "evaluated"
        ),
        Err(e) => tracing::debug!(missing = e.missing().len(), "awaiting input"),
    }

    let spec = build_report(
        &outcome,
        meta,
        &ReportOptions {
            theme: &config.theme,
            branding,
        },
    );

    RunOutput { outcome, spec }
}

/// Write the requested export formats into `config.out_dir`.
///
/// Returns the written paths in the order given.
pub fn write_exports(
    run: &RunOutput,
    meta: &DisplayMetadata,
    config: &RunConfig,
    branding: Option<&BrandingAsset>,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>, AppError> {
    let stem = export_filename(meta);
    let mut written = Vec::with_capacity(formats.len());

    for &format in formats {
        let path = export_path(&config.out_dir, &stem, format);
        match format {
            ExportFormat::Svg => {
                let svg = crate::render::render_svg(&run.spec, &config.theme, branding)?;
                write_svg(&path, &svg)?;
            }
            ExportFormat::Json => write_report_json(
                &path,
                &ReportFile {
                    tool: env!("CARGO_PKG_NAME"),
                    generated_at: meta.generated_at,
                    valuation: run.valuation(),
                    report: &run.spec,
                },
            )?,
        }
        written.push(path);
    }

    Ok(written)
}
