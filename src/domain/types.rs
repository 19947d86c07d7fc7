//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built by any input front-end (CLI flags, the TUI form)
//! - exported to JSON alongside the rendered chart
//! - reused by alternate renderers (terminal plot, SVG, tables)

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Variance at or below which an asking price is considered within FMV.
pub const WITHIN_THRESHOLD: f64 = 0.05;

/// Variance at or below which an asking price is a (moderate) premium.
pub const PREMIUM_THRESHOLD: f64 = 0.10;

/// How the signed variance is turned into a tier.
///
/// The two policies diverge only for asks *below* FMV: `Signed` always treats
/// them as within, `Absolute` penalizes under-pricing symmetrically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationPolicy {
    /// Compare the signed variance (one-sided).
    #[default]
    Signed,
    /// Compare `|variance|` (symmetric).
    Absolute,
}

impl ClassificationPolicy {
    pub fn display_name(self) -> &'static str {
        match self {
            ClassificationPolicy::Signed => "signed",
            ClassificationPolicy::Absolute => "absolute",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ClassificationPolicy::Signed => ClassificationPolicy::Absolute,
            ClassificationPolicy::Absolute => ClassificationPolicy::Signed,
        }
    }
}

/// Three-bucket pricing verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Within,
    Premium,
    HighPremium,
}

impl Tier {
    /// Headline used on the chart and in terminal summaries.
    ///
    /// A negative variance only reaches the outer tiers under the absolute
    /// policy; the wording then follows the sign.
    pub fn headline(self, variance_pct: f64) -> &'static str {
        let below = variance_pct < 0.0;
        match (self, below) {
            (Tier::Within, _) => "WITHIN 5% OF FMV (GOOD VALUE)",
            (Tier::Premium, false) => "5% - 10% ABOVE FMV (PREMIUM)",
            (Tier::Premium, true) => "5% - 10% BELOW FMV (DISCOUNT)",
            (Tier::HighPremium, false) => "OVER 10% ABOVE FMV (HIGH PREMIUM)",
            (Tier::HighPremium, true) => "OVER 10% BELOW FMV (DEEP DISCOUNT)",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Tier::Within => "within",
            Tier::Premium => "premium",
            Tier::HighPremium => "high premium",
        }
    }
}

/// A numeric input the engine cannot work without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Size,
    TransactedLow,
    TransactedHigh,
    AskingLow,
    AskingHigh,
    Fmv,
    Ask,
}

impl RequiredField {
    /// Form order.
    pub const ALL: [RequiredField; 7] = [
        RequiredField::Size,
        RequiredField::TransactedLow,
        RequiredField::TransactedHigh,
        RequiredField::AskingLow,
        RequiredField::AskingHigh,
        RequiredField::Fmv,
        RequiredField::Ask,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RequiredField::Size => "size (sqft)",
            RequiredField::TransactedLow => "lowest transacted PSF",
            RequiredField::TransactedHigh => "highest transacted PSF",
            RequiredField::AskingLow => "lowest asking PSF",
            RequiredField::AskingHigh => "highest asking PSF",
            RequiredField::Fmv => "FMV PSF",
            RequiredField::Ask => "your asking PSF",
        }
    }
}

/// Raw numeric inputs as supplied by an input front-end.
///
/// `None` means "not provided yet". Front-ends never substitute sentinels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyInputs {
    pub size_sqft: Option<f64>,
    pub transacted_low: Option<f64>,
    pub transacted_high: Option<f64>,
    pub asking_low: Option<f64>,
    pub asking_high: Option<f64>,
    pub fmv_psf: Option<f64>,
    pub ask_psf: Option<f64>,
}

impl PropertyInputs {
    pub fn get(&self, field: RequiredField) -> Option<f64> {
        match field {
            RequiredField::Size => self.size_sqft,
            RequiredField::TransactedLow => self.transacted_low,
            RequiredField::TransactedHigh => self.transacted_high,
            RequiredField::AskingLow => self.asking_low,
            RequiredField::AskingHigh => self.asking_high,
            RequiredField::Fmv => self.fmv_psf,
            RequiredField::Ask => self.ask_psf,
        }
    }
}

/// A market PSF range with `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

/// Reference PSF values at ±5% and ±10% of FMV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandBounds {
    pub lower_10: f64,
    pub lower_5: f64,
    pub upper_5: f64,
    pub upper_10: f64,
}

impl BandBounds {
    pub fn around(fmv_psf: f64) -> Self {
        Self {
            lower_10: fmv_psf * 0.90,
            lower_5: fmv_psf * 0.95,
            upper_5: fmv_psf * 1.05,
            upper_10: fmv_psf * 1.10,
        }
    }
}

/// Everything derived from a complete set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub size_sqft: f64,
    pub transacted: PriceRange,
    pub asking: PriceRange,
    pub fmv_psf: f64,
    pub ask_psf: f64,
    /// `(ask - fmv) / fmv`, signed.
    pub variance_pct: f64,
    pub policy: ClassificationPolicy,
    pub tier: Tier,
    pub bands: BandBounds,
    pub fmv_quantum: f64,
    pub ask_quantum: f64,
}

/// Which side of a PSF/quantum pair the user touched last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditedField {
    Psf,
    Quantum,
}

/// A per-sqft price and its total ("quantum") for the same property.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PsfQuantum {
    pub psf: Option<f64>,
    pub quantum: Option<f64>,
}

/// Free-text labels and the generation timestamp shown on the report.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMetadata {
    pub dev_name: String,
    pub unit_no: String,
    pub unit_type: String,
    pub prepared_by: String,
    pub generated_at: DateTime<FixedOffset>,
}

/// A loaded branding image, ready to embed.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandingAsset {
    pub source: PathBuf,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// 8-bit sRGB color, (de)serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse_hex(&value).ok_or_else(|| format!("invalid color '{value}' (expected #rrggbb)"))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

/// Colors used by every renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub within: Rgb,
    pub premium: Rgb,
    pub high_premium: Rgb,
    /// Neutral color of the "awaiting input" state.
    pub awaiting: Rgb,
    pub transacted: Rgb,
    pub asking: Rgb,
    pub fmv: Rgb,
    pub guide: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub background: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            within: Rgb(0x2e, 0xcc, 0x71),
            premium: Rgb(0xf1, 0xc4, 0x0f),
            high_premium: Rgb(0xe7, 0x4c, 0x3c),
            awaiting: Rgb(0x95, 0xa5, 0xa6),
            transacted: Rgb(0x1f, 0x77, 0xb4),
            asking: Rgb(0x34, 0x49, 0x5e),
            fmv: Rgb(0x00, 0x00, 0x00),
            guide: Rgb(0x80, 0x80, 0x80),
            text: Rgb(0x00, 0x00, 0x00),
            muted: Rgb(0x80, 0x80, 0x80),
            background: Rgb(0xff, 0xff, 0xff),
        }
    }
}

impl Palette {
    pub fn tier_color(&self, tier: Tier) -> Rgb {
        match tier {
            Tier::Within => self.within,
            Tier::Premium => self.premium,
            Tier::HighPremium => self.high_premium,
        }
    }
}

/// Font sizes (in output pixels) and weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontTheme {
    pub family: String,
    pub title_size: u32,
    pub status_size: u32,
    pub label_size: u32,
    pub footer_size: u32,
    pub bold_labels: bool,
}

impl Default for FontTheme {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            title_size: 22,
            status_size: 28,
            label_size: 18,
            footer_size: 14,
            bold_labels: true,
        }
    }
}

/// Visual theme: a single record instead of per-variant styling code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub palette: Palette,
    pub fonts: FontTheme,
    /// Opacity of the reference zone tints (0..=1).
    pub zone_opacity: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Share of the canvas height used by the header (title + status).
    pub header_ratio: f64,
    /// Share of the canvas width / header height reserved for branding.
    pub branding_ratio: f64,
    pub margin: u32,
    pub range_line_width: u32,
    pub marker_radius: u32,
    pub ask_marker_radius: u32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            fonts: FontTheme::default(),
            zone_opacity: 0.15,
            canvas_width: 1500,
            canvas_height: 800,
            header_ratio: 0.16,
            branding_ratio: 0.14,
            margin: 16,
            range_line_width: 5,
            marker_radius: 8,
            ask_marker_radius: 10,
        }
    }
}

/// A full run's configuration as understood by the front-ends.
///
/// This is derived from CLI flags, environment and defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub policy: ClassificationPolicy,
    pub theme: Theme,
    pub tz_offset: FixedOffset,
    /// Explicit logo path; `None` falls back to the conventional file name.
    pub logo: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub export_svg: bool,
    pub export_json: bool,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headline_follows_variance_sign() {
        assert_eq!(Tier::Within.headline(-0.03), "WITHIN 5% OF FMV (GOOD VALUE)");
        assert_eq!(Tier::Premium.headline(0.08), "5% - 10% ABOVE FMV (PREMIUM)");
        assert_eq!(Tier::Premium.headline(-0.08), "5% - 10% BELOW FMV (DISCOUNT)");
        assert_eq!(Tier::HighPremium.headline(0.2), "OVER 10% ABOVE FMV (HIGH PREMIUM)");
        assert_eq!(Tier::HighPremium.headline(-0.2), "OVER 10% BELOW FMV (DEEP DISCOUNT)");
    }

    #[test]
    fn rgb_hex_parse_and_format() {
        let c = Rgb::parse_hex("#2ecc71").unwrap();
        assert_eq!(c, Rgb(0x2e, 0xcc, 0x71));
        assert_eq!(c.to_hex(), "#2ecc71");
        assert_eq!(Rgb::parse_hex("#2ECC71"), Some(c));
        assert!(Rgb::parse_hex("2ecc71").is_none());
        assert!(Rgb::parse_hex("#2ecc7").is_none());
        assert!(Rgb::parse_hex("#zzzzzz").is_none());
    }

    #[test]
    fn theme_json_partial_override_keeps_defaults() {
        let json = r##"{ "palette": { "within": "#00ff00" }, "zone_opacity": 0.3 }"##;
        let theme: Theme = serde_json::from_str(json).unwrap();
        assert_eq!(theme.palette.within, Rgb(0, 255, 0));
        assert_eq!(theme.palette.premium, Palette::default().premium);
        assert!((theme.zone_opacity - 0.3).abs() < 1e-12);
        assert_eq!(theme.canvas_width, Theme::default().canvas_width);
    }

    #[test]
    fn theme_rejects_bad_color() {
        let json = r##"{ "palette": { "within": "green" } }"##;
        assert!(serde_json::from_str::<Theme>(json).is_err());
    }

    #[test]
    fn band_bounds_are_symmetric_multiples() {
        let b = BandBounds::around(1000.0);
        assert!((b.lower_10 - 900.0).abs() < 1e-9);
        assert!((b.lower_5 - 950.0).abs() < 1e-9);
        assert!((b.upper_5 - 1050.0).abs() < 1e-9);
        assert!((b.upper_10 - 1100.0).abs() < 1e-9);
    }
}
