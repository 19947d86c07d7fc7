//! `psf-analyzer` library crate.
//!
//! The binary (`psf`) is a thin wrapper around this library so that:
//!
//! - the valuation engine and report layout are testable without spawning processes
//! - the CLI, the TUI and the exporters share one pipeline
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod render;
pub mod report;
pub mod tui;
pub mod valuation;
