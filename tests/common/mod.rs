//! Shared fixtures for integration tests.
#![allow(dead_code)]

use solar_calc::config::RunConfig;
use solar_calc::generator::SeasonRun;
use solar_calc::season::Season;

/// Seed used by every fixture run.
pub const SEED: u64 = 42;

/// Generates `season` in `year` with the season's default ranges.
pub fn default_run(season: Season, year: i32) -> SeasonRun {
    SeasonRun::generate(season, year, season.default_ranges(), SEED)
}

/// Generates a run from a TOML configuration, failing the test on invalid input.
pub fn run_from_toml(toml: &str) -> SeasonRun {
    let cfg = RunConfig::from_toml_str(toml).expect("fixture TOML should parse");
    let errors = cfg.validate();
    assert!(errors.is_empty(), "fixture config invalid: {errors:?}");
    let season = cfg.season().expect("validated season");
    SeasonRun::generate(season, cfg.run.year, cfg.effective_ranges(), cfg.run.seed)
}

/// Absolute path of a file under `scenarios/`.
pub fn scenario_path(name: &str) -> String {
    format!("{}/scenarios/{name}", env!("CARGO_MANIFEST_DIR"))
}
