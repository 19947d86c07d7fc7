//! Optional branding image lookup.
//!
//! The renderer only ever sees an `Option<BrandingAsset>`. Anything that goes
//! wrong here (no file, unreadable file, unknown format) degrades to `None`
//! with a warning; it never fails the render.

use std::path::Path;

use crate::domain::BrandingAsset;

/// Looked up in the working directory when no logo path is configured.
pub const DEFAULT_LOGO_FILE: &str = "logo.png";

/// Resolve the branding asset for a run.
///
/// An explicit path is loaded as-is (and warned about if unusable); otherwise
/// the conventional file is used when it exists.
pub fn resolve_branding(explicit: Option<&Path>) -> Option<BrandingAsset> {
    match explicit {
        Some(path) => load_branding(path),
        None => {
            let path = Path::new(DEFAULT_LOGO_FILE);
            if path.is_file() {
                load_branding(path)
            } else {
                tracing::debug!(file = DEFAULT_LOGO_FILE, "no branding image found");
                None
            }
        }
    }
}

/// Read an image file into a `BrandingAsset`.
pub fn load_branding(path: &Path) -> Option<BrandingAsset> {
    let Some(mime) = mime_for(path) else {
        tracing::warn!(path = %path.display(), "unsupported branding image type; skipping");
        return None;
    };

    match std::fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => Some(BrandingAsset {
            source: path.to_path_buf(),
            mime,
            bytes,
        }),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "branding image is empty; skipping");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read branding image; skipping");
            None
        }
    }
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
