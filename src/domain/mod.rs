//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw inputs (`PropertyInputs`) and display labels (`DisplayMetadata`)
//! - engine outputs (`ValuationResult`, `Tier`, `BandBounds`)
//! - the visual theme record (`Theme`) and run configuration (`RunConfig`)

pub mod types;

pub use types::*;
