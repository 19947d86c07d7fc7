//! Formatted terminal output and number formatting.
//!
//! Rounding happens here and only here; the engine keeps full precision.

use crate::domain::{DisplayMetadata, ValuationResult};
use crate::report::filename::{export_filename, generated_label};
use crate::valuation::ValuationError;

/// Format the run summary printed by `psf report`.
pub fn format_valuation_summary(
    outcome: &Result<ValuationResult, ValuationError>,
    meta: &DisplayMetadata,
) -> String {
    let mut out = String::new();

    out.push_str("=== psf - Property PSF Analysis ===\n");
    out.push_str(&format!(
        "Dev: {} | Unit: {} | Type: {}\n",
        or_dash(&meta.dev_name),
        or_dash(&meta.unit_no),
        or_dash(&meta.unit_type)
    ));
    if !meta.prepared_by.trim().is_empty() {
        out.push_str(&format!("Prepared by: {}\n", meta.prepared_by.trim()));
    }

    let r = match outcome {
        Ok(r) => r,
        Err(err) => {
            out.push_str(&format!("\nWaiting for input ({} missing):\n", err.missing().len()));
            for field in err.missing() {
                out.push_str(&format!("- {}\n", field.label()));
            }
            return out;
        }
    };

    out.push_str(&format!("Size: {} sqft\n", fmt_size(r.size_sqft)));
    out.push_str(&format!(
        "Transacted: {} - {} psf\n",
        fmt_psf(r.transacted.low),
        fmt_psf(r.transacted.high)
    ));
    out.push_str(&format!(
        "Asking:     {} - {} psf\n",
        fmt_psf(r.asking.low),
        fmt_psf(r.asking.high)
    ));

    out.push_str("\nValuation:\n");
    out.push_str(&format!(
        "- FMV:      {} psf | quantum {}\n",
        fmt_psf(r.fmv_psf),
        fmt_money(r.fmv_quantum)
    ));
    out.push_str(&format!(
        "- My ask:   {} psf | quantum {}\n",
        fmt_psf(r.ask_psf),
        fmt_money(r.ask_quantum)
    ));
    out.push_str(&format!(
        "- Variance: {} (policy: {})\n",
        fmt_pct(r.variance_pct),
        r.policy.display_name()
    ));
    out.push_str(&format!(
        "- Bands:    -10% {} | -5% {} | +5% {} | +10% {}\n",
        fmt_psf(r.bands.lower_10),
        fmt_psf(r.bands.lower_5),
        fmt_psf(r.bands.upper_5),
        fmt_psf(r.bands.upper_10)
    ));
    out.push_str(&format!("- Verdict:  {}\n", r.tier.headline(r.variance_pct)));

    out.push_str(&format!("\nGenerated: {}\n", generated_label(meta)));
    out.push_str(&format!("Export name: {}\n", export_filename(meta)));

    out
}

/// `$1,150` (rounded to whole dollars).
pub fn fmt_psf(v: f64) -> String {
    fmt_money(v)
}

/// `$1,240,850` (rounded to whole dollars).
pub fn fmt_money(v: f64) -> String {
    let grouped = group_thousands(v.abs());
    if v.round() < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// `1,079` for whole sizes, `1,079.50` otherwise.
pub fn fmt_size(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        group_thousands(v)
    } else {
        let fixed = format!("{v:.2}");
        match fixed.split_once('.') {
            Some((whole, decimals)) => {
                let whole = whole.parse::<f64>().map(group_thousands).unwrap_or_default();
                format!("{whole}.{decimals}")
            }
            None => fixed,
        }
    }
}

/// `+8.70%` / `-10.00%`.
pub fn fmt_pct(v: f64) -> String {
    format!("{:+.2}%", v * 100.0)
}

/// Round to an integer and insert `,` every three digits.
pub fn group_thousands(v: f64) -> String {
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() { "-" } else { s.trim() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PropertyInputs, RequiredField};
    use crate::valuation::evaluate;
    use chrono::{FixedOffset, TimeZone};

    fn meta() -> DisplayMetadata {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        DisplayMetadata {
            dev_name: "KRHR".to_string(),
            unit_no: "02-57".to_string(),
            unit_type: "3 Room".to_string(),
            prepared_by: String::new(),
            generated_at: tz.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap(),
        }
    }

    #[test]
    fn number_formatting() {
        assert_eq!(group_thousands(1_240_850.0), "1,240,850");
        assert_eq!(group_thousands(999.4), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(-1234.0), "-1,234");
        assert_eq!(fmt_money(1_240_850.0), "$1,240,850");
        assert_eq!(fmt_money(-50.0), "-$50");
        assert_eq!(fmt_size(1079.0), "1,079");
        assert_eq!(fmt_size(1079.5), "1,079.50");
        assert_eq!(fmt_pct(0.08), "+8.00%");
        assert_eq!(fmt_pct(-0.1), "-10.00%");
    }

    #[test]
    fn summary_lists_valuation() {
        let outcome = evaluate(&PropertyInputs {
            size_sqft: Some(1079.0),
            transacted_low: Some(1200.0),
            transacted_high: Some(1000.0),
            asking_low: Some(1050.0),
            asking_high: Some(1300.0),
            fmv_psf: Some(1150.0),
            ask_psf: Some(1150.0),
        });
        let txt = format_valuation_summary(&outcome, &meta());
        assert!(txt.contains("Dev: KRHR | Unit: 02-57 | Type: 3 Room\n"));
        assert!(txt.contains("Transacted: $1,000 - $1,200 psf\n"));
        assert!(txt.contains("- FMV:      $1,150 psf | quantum $1,240,850\n"));
        assert!(txt.contains("- Variance: +0.00% (policy: signed)\n"));
        assert!(txt.contains("- Verdict:  WITHIN 5% OF FMV (GOOD VALUE)\n"));
        assert!(txt.contains("Export name: KRHR_02-57_20261019\n"));
        assert!(!txt.contains("Prepared by"));
    }

    #[test]
    fn absolute_policy_verdict_below_fmv() {
        let outcome = crate::valuation::evaluate_with_policy(
            &PropertyInputs {
                size_sqft: Some(1000.0),
                transacted_low: Some(900.0),
                transacted_high: Some(1100.0),
                asking_low: Some(950.0),
                asking_high: Some(1200.0),
                fmv_psf: Some(1000.0),
                ask_psf: Some(920.0),
            },
            crate::domain::ClassificationPolicy::Absolute,
        );
        let txt = format_valuation_summary(&outcome, &meta());
        assert!(txt.contains("- Variance: -8.00% (policy: absolute)\n"));
        assert!(txt.contains("- Verdict:  5% - 10% BELOW FMV (DISCOUNT)\n"));
    }

    #[test]
    fn summary_for_missing_inputs() {
        let outcome = Err(ValuationError::InsufficientData {
            missing: vec![RequiredField::Size, RequiredField::Ask],
        });
        let txt = format_valuation_summary(&outcome, &meta());
        assert!(txt.contains("Waiting for input (2 missing):\n- size (sqft)\n- your asking PSF\n"));
        assert!(!txt.contains("Verdict"));
    }
}
