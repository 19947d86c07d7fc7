//! Turn raw inputs into a `ValuationResult`.
//!
//! Validation is all-or-nothing: a single missing or non-positive required
//! field yields `InsufficientData`, and the caller renders the "awaiting input"
//! state instead of a chart.

use crate::domain::{
    BandBounds, ClassificationPolicy, PREMIUM_THRESHOLD, PriceRange, PropertyInputs, RequiredField,
    Tier, ValuationResult, WITHIN_THRESHOLD,
};

/// The only domain failure: required numbers are absent or unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuationError {
    InsufficientData { missing: Vec<RequiredField> },
}

impl ValuationError {
    pub fn missing(&self) -> &[RequiredField] {
        match self {
            ValuationError::InsufficientData { missing } => missing,
        }
    }
}

impl std::fmt::Display for ValuationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValuationError::InsufficientData { missing } => {
                let labels: Vec<&str> = missing.iter().map(|m| m.label()).collect();
                write!(f, "waiting for input: {}", labels.join(", "))
            }
        }
    }
}

impl std::error::Error for ValuationError {}

/// Evaluate with the default (signed) classification policy.
pub fn evaluate(inputs: &PropertyInputs) -> Result<ValuationResult, ValuationError> {
    evaluate_with_policy(inputs, ClassificationPolicy::default())
}

/// Validate inputs and derive variance, tier, bands and quanta.
pub fn evaluate_with_policy(
    inputs: &PropertyInputs,
    policy: ClassificationPolicy,
) -> Result<ValuationResult, ValuationError> {
    let missing: Vec<RequiredField> = RequiredField::ALL
        .into_iter()
        .filter(|&field| !is_usable(inputs.get(field)))
        .collect();

    let (
        Some(size_sqft),
        Some(t_low),
        Some(t_high),
        Some(a_low),
        Some(a_high),
        Some(fmv_psf),
        Some(ask_psf),
    ) = (
        inputs.size_sqft,
        inputs.transacted_low,
        inputs.transacted_high,
        inputs.asking_low,
        inputs.asking_high,
        inputs.fmv_psf,
        inputs.ask_psf,
    )
    else {
        return Err(ValuationError::InsufficientData { missing });
    };
    if !missing.is_empty() {
        return Err(ValuationError::InsufficientData { missing });
    }

    let variance = variance_pct(ask_psf, fmv_psf);

    Ok(ValuationResult {
        size_sqft,
        transacted: normalize_range(t_low, t_high),
        asking: normalize_range(a_low, a_high),
        fmv_psf,
        ask_psf,
        variance_pct: variance,
        policy,
        tier: classify(variance, policy),
        bands: BandBounds::around(fmv_psf),
        fmv_quantum: quantum(fmv_psf, size_sqft),
        ask_quantum: quantum(ask_psf, size_sqft),
    })
}

fn is_usable(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v.is_finite() && v > 0.0)
}

/// Order two independently-entered bounds.
pub fn normalize_range(a: f64, b: f64) -> PriceRange {
    PriceRange {
        low: a.min(b),
        high: a.max(b),
    }
}

/// `(ask - fmv) / fmv`, signed.
pub fn variance_pct(ask_psf: f64, fmv_psf: f64) -> f64 {
    (ask_psf - fmv_psf) / fmv_psf
}

/// Bucket a variance into a tier.
///
/// Both thresholds are inclusive upper bounds.
pub fn classify(variance_pct: f64, policy: ClassificationPolicy) -> Tier {
    let v = match policy {
        ClassificationPolicy::Signed => variance_pct,
        ClassificationPolicy::Absolute => variance_pct.abs(),
    };
    if v <= WITHIN_THRESHOLD {
        Tier::Within
    } else if v <= PREMIUM_THRESHOLD {
        Tier::Premium
    } else {
        Tier::HighPremium
    }
}

/// Total price for a PSF value. No rounding.
pub fn quantum(psf: f64, size_sqft: f64) -> f64 {
    psf * size_sqft
}
