//! Seasonal solar energy calculator: synthetic daily data, summaries, and charts.

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "charts")]
pub mod charts;
/// TOML run configuration and presets.
pub mod config;
/// Synthetic daily dataset generation.
pub mod generator;
pub mod io;
/// Daily energy formula.
pub mod model;
/// Season catalogue and parameter ranges.
pub mod season;
pub mod stats;
#[cfg(feature = "tui")]
pub mod tui;
