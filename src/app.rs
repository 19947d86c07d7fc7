//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - evaluates the property and builds the report layout
//! - prints the summary/plot
//! - writes optional exports

use std::path::Path;

use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ConvertArgs, InputArgs, ReportArgs};
use crate::domain::{DisplayMetadata, EditedField, PsfQuantum, RunConfig, Theme};
use crate::error::AppError;
use crate::io::ExportFormat;
use crate::report::{fmt_money, fmt_psf, fmt_size};

pub mod pipeline;

/// Environment variable holding the log filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "PSF_LOG";

/// Entry point for the `psf` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `psf` and `psf -s 1079` to behave like `psf tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => {
            init_logging("warn");
            handle_report(args)
        }
        Command::Convert(args) => {
            init_logging("warn");
            handle_convert(args)
        }
        Command::Tui(args) => {
            // Log lines would tear the alternate screen unless asked for.
            init_logging("off");
            crate::tui::run(args)
        }
    }
}

fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));
    // A subscriber may already be installed (tests); that is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let meta = display_metadata(&args.inputs, now_in(config.tz_offset));
    let branding = crate::io::resolve_branding(config.logo.as_deref());

    let run = pipeline::run_report(&args.inputs.property_inputs(), &meta, &config, branding.as_ref());

    println!("{}", crate::report::format_valuation_summary(&run.outcome, &meta));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(&run.spec, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    let mut formats = Vec::new();
    if config.export_svg {
        formats.push(ExportFormat::Svg);
    }
    if config.export_json {
        formats.push(ExportFormat::Json);
    }
    for path in pipeline::write_exports(&run, &meta, &config, branding.as_ref(), &formats)? {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_convert(args: ConvertArgs) -> Result<(), AppError> {
    let (pair, edited) = match (args.psf, args.quantum) {
        (Some(psf), _) => (PsfQuantum { psf: Some(psf), quantum: None }, EditedField::Psf),
        (None, quantum) => (PsfQuantum { psf: None, quantum }, EditedField::Quantum),
    };

    let synced = crate::valuation::sync_pair(pair, Some(args.size), edited);
    let (Some(psf), Some(quantum)) = (synced.psf, synced.quantum) else {
        return Err(AppError::new(
            2,
            "Conversion needs a positive size and a finite value to convert",
        ));
    };

    println!("Size:    {} sqft", fmt_size(args.size));
    println!("PSF:     {} ({psf:.2})", fmt_psf(psf));
    println!("Quantum: {}", fmt_money(quantum));
    Ok(())
}

/// Build the run configuration from parsed flags (theme file included).
pub fn run_config_from_args(args: &ReportArgs) -> Result<RunConfig, AppError> {
    let theme = match &args.theme {
        Some(path) => load_theme(path)?,
        None => Theme::default(),
    };

    Ok(RunConfig {
        policy: args.policy,
        theme,
        tz_offset: args.tz_offset,
        logo: args.logo.clone(),
        out_dir: args.out_dir.clone(),
        export_svg: args.svg,
        export_json: args.json,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
    })
}

/// Read a theme JSON file. Missing keys fall back to the defaults.
pub fn load_theme(path: &Path) -> Result<Theme, AppError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read theme '{}': {e}", path.display())))?;
    let theme: Theme = serde_json::from_str(&text)
        .map_err(|e| AppError::new(2, format!("Invalid theme '{}': {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "loaded theme");
    Ok(theme)
}

/// The current time in the configured reporting offset.
pub fn now_in(offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset)
}

pub fn display_metadata(inputs: &InputArgs, generated_at: DateTime<FixedOffset>) -> DisplayMetadata {
    DisplayMetadata {
        dev_name: inputs.dev.clone(),
        unit_no: inputs.unit.clone(),
        unit_type: inputs.unit_type.clone(),
        prepared_by: inputs.prepared_by.clone(),
        generated_at,
    }
}

/// Rewrite argv so `psf` defaults to `psf tui`.
///
/// Rules:
/// - `psf`                      -> `psf tui`
/// - `psf -s 1079 ...`          -> `psf tui -s 1079 ...`
/// - `psf --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "convert" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
