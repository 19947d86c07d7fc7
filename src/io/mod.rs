//! Input/output helpers.
//!
//! - report exports (SVG/JSON) (`export`)
//! - optional branding image lookup (`branding`)

pub mod branding;
pub mod export;

pub use branding::*;
pub use export::*;
