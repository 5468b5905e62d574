//! TUI application state.

use tracing::debug;

use crate::config::{MAX_YEAR, MIN_YEAR, RunConfig};
use crate::generator::SeasonRun;
use crate::season::{Bound, Parameter, ParameterRanges, Season};
use crate::stats::{self, Metrics, MonthlyStats};

/// Advances a seed so each regeneration draws a fresh dataset.
fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407)
}

/// Season defaults with the configuration's valid overrides applied.
fn custom_ranges_for(config: &RunConfig, season: Season) -> ParameterRanges {
    let mut cfg = config.clone();
    cfg.run.season = season.as_str().to_string();
    cfg.effective_ranges()
}

/// TUI application state.
pub struct App {
    /// Loaded configuration; source of custom ranges.
    config: RunConfig,
    /// Selected season.
    pub season: Season,
    /// Selected year.
    pub year: i32,
    /// Seed for the next generation.
    pub seed: u64,
    /// Whether `custom` is applied instead of the season defaults.
    pub use_custom: bool,
    /// Editable ranges, seeded from the season defaults plus config overrides.
    pub custom: ParameterRanges,
    /// Parameter targeted by range adjustments.
    pub selected: Parameter,
    /// Latest generated dataset, if any.
    pub run: Option<SeasonRun>,
    /// Metrics for `run`.
    pub metrics: Option<Metrics>,
    /// Monthly breakdown for `run`.
    pub monthly: Vec<MonthlyStats>,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl App {
    /// Creates an app from a validated configuration. Nothing is generated yet.
    pub fn new(config: RunConfig) -> Self {
        let season = config.season().unwrap_or(Season::Winter);
        let year = config.run.year.clamp(MIN_YEAR, MAX_YEAR);
        let seed = config.run.seed;
        let use_custom = config.ranges.is_custom();
        let custom = custom_ranges_for(&config, season);
        Self {
            config,
            season,
            year,
            seed,
            use_custom,
            custom,
            selected: Parameter::Irradiance,
            run: None,
            metrics: None,
            monthly: Vec::new(),
            quit: false,
        }
    }

    /// Ranges the next generation will sample from.
    pub fn active_ranges(&self) -> ParameterRanges {
        if self.use_custom {
            self.custom
        } else {
            self.season.default_ranges()
        }
    }

    /// Generates a dataset for the current selection, then advances the seed.
    pub fn generate(&mut self) {
        let run = SeasonRun::generate(self.season, self.year, self.active_ranges(), self.seed);
        debug!(season = %self.season, year = self.year, seed = self.seed, "tui generate");
        self.metrics = Some(Metrics::from_records(&run.records));
        self.monthly = stats::monthly_breakdown(&run);
        self.run = Some(run);
        self.seed = next_seed(self.seed);
    }

    fn clear(&mut self) {
        self.run = None;
        self.metrics = None;
        self.monthly.clear();
    }

    /// Selects a season, resets the editable ranges to its defaults, and
    /// discards the previous dataset.
    pub fn select_season(&mut self, season: Season) {
        if self.season != season {
            self.season = season;
            self.custom = custom_ranges_for(&self.config, season);
            self.clear();
        }
    }

    /// Moves to the next year, up to the maximum.
    pub fn next_year(&mut self) {
        if self.year < MAX_YEAR {
            self.year += 1;
            self.clear();
        }
    }

    /// Moves to the previous year, down to the minimum.
    pub fn prev_year(&mut self) {
        if self.year > MIN_YEAR {
            self.year -= 1;
            self.clear();
        }
    }

    /// Toggles between custom and default ranges.
    pub fn toggle_custom(&mut self) {
        self.use_custom = !self.use_custom;
        self.clear();
    }

    /// Moves the range selection to the next parameter, wrapping around.
    pub fn select_next_parameter(&mut self) {
        let idx = Parameter::ALL
            .iter()
            .position(|&p| p == self.selected)
            .map_or(0, |i| (i + 1) % Parameter::ALL.len());
        self.selected = Parameter::ALL[idx];
    }

    /// Nudges one bound of the selected parameter's range and switches to
    /// custom ranges.
    pub fn adjust_range(&mut self, bound: Bound, steps: i32) {
        let p = self.selected;
        let updated = self.custom.get(p).nudged(p, bound, steps);
        if updated != self.custom.get(p) || !self.use_custom {
            self.custom.set(p, updated);
            self.use_custom = true;
            self.clear();
        }
    }

    /// Chart points `(day index, kWh)` for the current dataset.
    pub fn series(&self) -> Vec<(f64, f64)> {
        self.run.as_ref().map_or_else(Vec::new, |run| {
            run.records
                .iter()
                .enumerate()
                .map(|(i, r)| (i as f64, r.kwh))
                .collect()
        })
    }
}
