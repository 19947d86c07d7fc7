//! PSF ↔ quantum synchronization.
//!
//! Input forms show each price twice (per sqft and total). Whichever side the
//! user edited last is the source of truth; the other side is recomputed here.

use crate::domain::{EditedField, PsfQuantum};
use crate::valuation::engine::quantum;

pub fn sync_quantum_from_psf(psf: f64, size_sqft: f64) -> f64 {
    quantum(psf, size_sqft)
}

/// Inverse of [`sync_quantum_from_psf`]; `None` when the size is unusable.
pub fn sync_psf_from_quantum(quantum: f64, size_sqft: f64) -> Option<f64> {
    if size_sqft.is_finite() && size_sqft > 0.0 {
        Some(quantum / size_sqft)
    } else {
        None
    }
}

/// Recompute the side of `pair` that was not edited.
///
/// Without a usable size (or an edited value) the pair is returned unchanged,
/// so a half-filled form never clears what the user typed.
pub fn sync_pair(pair: PsfQuantum, size_sqft: Option<f64>, edited: EditedField) -> PsfQuantum {
    let Some(size) = size_sqft.filter(|s| s.is_finite() && *s > 0.0) else {
        return pair;
    };

    match edited {
        EditedField::Psf => match pair.psf {
            Some(psf) => PsfQuantum {
                psf: Some(psf),
                quantum: Some(sync_quantum_from_psf(psf, size)),
            },
            None => PsfQuantum { psf: None, quantum: None },
        },
        EditedField::Quantum => match pair.quantum {
            Some(q) => PsfQuantum {
                psf: sync_psf_from_quantum(q, size),
                quantum: Some(q),
            },
            None => PsfQuantum { psf: None, quantum: None },
        },
    }
}
