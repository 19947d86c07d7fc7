//! Export filenames and timestamp labels.
//!
//! Free-text labels are accepted verbatim everywhere except here: anything
//! that ends up in a filename is reduced to alphanumerics separated by `-`.

use chrono::FixedOffset;

use crate::domain::DisplayMetadata;

/// Used when every label is empty.
const FALLBACK_STEM: &str = "psf-report";

/// Reduce a free-text label to a path-safe component.
///
/// Runs of anything that is not alphanumeric (`/`, `\`, whitespace, `:` ...)
/// collapse to a single `-`; leading/trailing separators are dropped.
pub fn sanitize_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// `{dev}_{unit}_{preparer}_{YYYYMMDD}` with empty parts skipped.
///
/// The date is taken in the offset carried by `generated_at`. No extension.
pub fn export_filename(meta: &DisplayMetadata) -> String {
    let parts: Vec<String> = [&meta.dev_name, &meta.unit_no, &meta.prepared_by]
        .into_iter()
        .map(|s| sanitize_component(s))
        .filter(|s| !s.is_empty())
        .collect();

    let stem = if parts.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        parts.join("_")
    };
    format!("{stem}_{}", meta.generated_at.format("%Y%m%d"))
}

/// `19 Oct 2026, 14:05 (GMT+8)`.
pub fn generated_label(meta: &DisplayMetadata) -> String {
    format!(
        "{} ({})",
        meta.generated_at.format("%d %b %Y, %H:%M"),
        offset_label(meta.generated_at.offset())
    )
}

/// `GMT+8`, `GMT-5:30`, `GMT+0`.
pub fn offset_label(offset: &FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let abs = secs.unsigned_abs();
    let hours = abs / 3600;
    let minutes = (abs % 3600) / 60;
    if minutes == 0 {
        format!("GMT{sign}{hours}")
    } else {
        format!("GMT{sign}{hours}:{minutes:02}")
    }
}
