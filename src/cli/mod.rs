//! Command-line parsing for the property PSF analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the valuation/report code.

use std::path::PathBuf;

use chrono::FixedOffset;
use clap::{Args, Parser, Subcommand};

use crate::domain::{ClassificationPolicy, PropertyInputs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "psf", version, about = "Property PSF valuation report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a property, print the verdict and plot, and optionally export.
    Report(ReportArgs),
    /// Convert between PSF and quantum for a given size.
    Convert(ConvertArgs),
    /// Launch the interactive form.
    ///
    /// Without any input flags the form starts with a sample property so the
    /// chart is visible immediately.
    Tui(ReportArgs),
}

/// Property figures. Every value is optional; missing ones are reported as
/// "awaiting input" rather than rejected.
#[derive(Debug, Args, Clone, Default)]
pub struct InputArgs {
    /// Floor area in square feet.
    #[arg(short = 's', long = "size")]
    pub size: Option<f64>,

    /// Lowest transacted PSF in the area.
    #[arg(long)]
    pub transacted_low: Option<f64>,

    /// Highest transacted PSF in the area.
    #[arg(long)]
    pub transacted_high: Option<f64>,

    /// Lowest current asking PSF.
    #[arg(long)]
    pub asking_low: Option<f64>,

    /// Highest current asking PSF.
    #[arg(long)]
    pub asking_high: Option<f64>,

    /// Fair market value PSF.
    #[arg(long)]
    pub fmv: Option<f64>,

    /// Your asking PSF.
    #[arg(short = 'a', long)]
    pub ask: Option<f64>,

    /// Development name.
    #[arg(long, default_value = "")]
    pub dev: String,

    /// Unit number.
    #[arg(long, default_value = "")]
    pub unit: String,

    /// Unit type, e.g. "3 Room".
    #[arg(long, default_value = "")]
    pub unit_type: String,

    /// Name shown as "Prepared by" (omitted when empty).
    #[arg(long, default_value = "")]
    pub prepared_by: String,
}

impl InputArgs {
    pub fn property_inputs(&self) -> PropertyInputs {
        PropertyInputs {
            size_sqft: self.size,
            transacted_low: self.transacted_low,
            transacted_high: self.transacted_high,
            asking_low: self.asking_low,
            asking_high: self.asking_high,
            fmv_psf: self.fmv,
            ask_psf: self.ask,
        }
    }
}

/// Options for `psf report` and `psf tui`.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// How the variance is compared against the 5% / 10% thresholds.
    #[arg(long, value_enum, default_value_t = ClassificationPolicy::Signed)]
    pub policy: ClassificationPolicy,

    /// UTC offset used for the report timestamp (`+8`, `+08:00`, `-05:30`, `Z`).
    #[arg(
        long,
        env = "PSF_TZ_OFFSET",
        default_value = "+08:00",
        allow_hyphen_values = true,
        value_parser = parse_utc_offset
    )]
    pub tz_offset: FixedOffset,

    /// Theme JSON (palette, fonts, canvas size). Unset keys keep their defaults.
    #[arg(long, env = "PSF_THEME", value_name = "JSON")]
    pub theme: Option<PathBuf>,

    /// Branding image for the report header. Defaults to `logo.png` if present.
    #[arg(long, env = "PSF_LOGO", value_name = "FILE")]
    pub logo: Option<PathBuf>,

    /// Directory for exported files.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Export the chart as SVG.
    #[arg(long)]
    pub svg: bool,

    /// Export the valuation and chart layout as JSON.
    #[arg(long)]
    pub json: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 14)]
    pub height: usize,
}

/// Options for `psf convert`.
#[derive(Debug, Args, Clone)]
pub struct ConvertArgs {
    /// Floor area in square feet.
    #[arg(short = 's', long = "size")]
    pub size: f64,

    /// PSF to convert into a quantum.
    #[arg(long, conflicts_with = "quantum", required_unless_present = "quantum")]
    pub psf: Option<f64>,

    /// Quantum to convert into a PSF.
    #[arg(long)]
    pub quantum: Option<f64>,
}

/// Parse a UTC offset such as `+8`, `+08`, `+08:00`, `-05:30`, `+0530` or `Z`.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| "invalid offset".to_string());
    }

    let (sign, rest) = match s.chars().next() {
        Some('+') => (1, &s[1..]),
        Some('-') => (-1, &s[1..]),
        _ => return Err(format!("offset '{s}' must start with '+' or '-'")),
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        // `+0530`; `get` keeps a non-ASCII typo from splitting inside a char.
        None if rest.len() == 4 => match (rest.get(..2), rest.get(2..)) {
            (Some(h), Some(m)) => (h, m),
            _ => return Err(format!("invalid offset '{s}'")),
        },
        None => (rest, "0"),
    };

    let hours: i32 = hours
        .parse()
        .map_err(|_| format!("invalid hours in offset '{s}'"))?;
    let minutes: i32 = minutes
        .parse()
        .map_err(|_| format!("invalid minutes in offset '{s}'"))?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(format!("offset '{s}' is out of range"));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("offset '{s}' is out of range"))
}
