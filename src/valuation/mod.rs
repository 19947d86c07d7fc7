//! Valuation engine.
//!
//! Pure functions only: no I/O, no clock, no shared state.
//!
//! - input validation + derived quantities (`engine`)
//! - PSF ↔ quantum synchronization for input forms (`sync`)

pub mod engine;
pub mod sync;

pub use engine::*;
pub use sync::*;
