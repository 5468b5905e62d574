//! TOML-based run configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::season::{Parameter, ParameterRange, ParameterRanges, Season};

/// Earliest selectable year.
pub const MIN_YEAR: i32 = 2020;
/// Latest selectable year.
pub const MAX_YEAR: i32 = 2030;

/// Top-level run configuration parsed from TOML.
///
/// All sections have defaults, so an empty file is a valid winter 2024 run.
/// Load from TOML with [`RunConfig::from_toml_file`] or use
/// [`RunConfig::from_preset`] for one of the built-in seasons.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Season, year, and seed.
    #[serde(default)]
    pub run: RunSection,
    /// Custom parameter ranges replacing the season defaults.
    #[serde(default)]
    pub ranges: RangeOverrides,
    /// Output destinations.
    #[serde(default)]
    pub output: OutputSection,
}

/// Season, year, and seed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    /// Season to generate (`winter`, `spring`, `summer`, `autumn`).
    pub season: String,
    /// Calendar year (2020–2030).
    pub year: i32,
    /// Random seed for the generator.
    pub seed: u64,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            season: "winter".to_string(),
            year: 2024,
            seed: 42,
        }
    }
}

/// Optional `[low, high]` override per parameter.
///
/// Bounds are kept raw here so that [`RunConfig::validate`] can report
/// inverted ranges with their field path instead of failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangeOverrides {
    pub irradiance: Option<[f64; 2]>,
    pub humidity: Option<[f64; 2]>,
    pub wind_speed: Option<[f64; 2]>,
    pub ambient_temperature: Option<[f64; 2]>,
    pub tilt_angle: Option<[f64; 2]>,
}

impl RangeOverrides {
    pub fn get(&self, parameter: Parameter) -> Option<[f64; 2]> {
        match parameter {
            Parameter::Irradiance => self.irradiance,
            Parameter::Humidity => self.humidity,
            Parameter::WindSpeed => self.wind_speed,
            Parameter::AmbientTemperature => self.ambient_temperature,
            Parameter::TiltAngle => self.tilt_angle,
        }
    }

    /// Whether any parameter is overridden.
    pub fn is_custom(&self) -> bool {
        Parameter::ALL.iter().any(|&p| self.get(p).is_some())
    }
}

/// Output destinations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// CSV export path.
    pub csv: Option<PathBuf>,
    /// Directory for SVG charts.
    pub charts_dir: Option<PathBuf>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"ranges.humidity"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl RunConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["winter", "spring", "summer", "autumn"];

    /// Default configuration for `season`.
    pub fn for_season(season: Season) -> Self {
        Self {
            run: RunSection {
                season: season.as_str().to_string(),
                ..RunSection::default()
            },
            ..Self::default()
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        name.parse::<Season>()
            .map(Self::for_season)
            .map_err(|_| ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            })
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// The configured season, if the name is valid.
    pub fn season(&self) -> Option<Season> {
        self.run.season.parse().ok()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let r = &self.run;

        if let Err(e) = r.season.parse::<Season>() {
            errors.push(ConfigError {
                field: "run.season".into(),
                message: e.to_string(),
            });
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&r.year) {
            errors.push(ConfigError {
                field: "run.year".into(),
                message: format!("must be in [{MIN_YEAR}, {MAX_YEAR}], got {}", r.year),
            });
        }

        for p in Parameter::ALL {
            let Some([low, high]) = self.ranges.get(p) else {
                continue;
            };
            let field = format!("ranges.{}", p.column());
            if ParameterRange::new(low, high).is_err() {
                errors.push(ConfigError {
                    field,
                    message: format!("must be finite with low <= high, got [{low}, {high}]"),
                });
                continue;
            }
            let (lo, hi) = p.domain();
            if low < lo || high > hi {
                errors.push(ConfigError {
                    field,
                    message: format!(
                        "must lie within [{lo}, {hi}] {}, got [{low}, {high}]",
                        p.unit()
                    ),
                });
            }
        }

        errors
    }

    /// Season defaults with any valid overrides applied.
    ///
    /// Falls back to winter when the season name is invalid; call
    /// [`RunConfig::validate`] first to reject such configurations.
    pub fn effective_ranges(&self) -> ParameterRanges {
        let mut ranges = self.season().unwrap_or(Season::Winter).default_ranges();
        for p in Parameter::ALL {
            if let Some(range) = self
                .ranges
                .get(p)
                .and_then(|[low, high]| ParameterRange::new(low, high).ok())
            {
                ranges.set(p, range);
            }
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let cfg = RunConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
        assert_eq!(cfg.season(), Some(Season::Winter));
        assert_eq!(cfg.run.year, 2024);
    }

    #[test]
    fn from_preset_unknown() {
        let err = RunConfig::from_preset("monsoon");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in RunConfig::PRESETS {
            let cfg = RunConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[run]
season = "summer"
year = 2026
seed = 7

[ranges]
irradiance = [700.0, 900.0]
tilt_angle = [15.0, 25.0]

[output]
csv = "out/summer.csv"
charts_dir = "out/charts"
"#;
        let cfg = RunConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().and_then(RunConfig::season), Some(Season::Summer));
        assert_eq!(cfg.as_ref().map(|c| c.run.seed), Some(7));
        assert_eq!(
            cfg.as_ref().map(|c| c.ranges.is_custom()),
            Some(true)
        );
        let ranges = cfg.as_ref().map(RunConfig::effective_ranges);
        assert_eq!(ranges.map(|r| r.irradiance.low()), Some(700.0));
        // Non-overridden parameters keep the season default.
        assert_eq!(ranges.map(|r| r.humidity.high()), Some(90.0));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[run]
season = "winter"
bogus_field = true
"#;
        assert!(RunConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_year_out_of_range() {
        let mut cfg = RunConfig::default();
        cfg.run.year = 2031;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "run.year"));
    }

    #[test]
    fn validation_catches_bad_season() {
        let mut cfg = RunConfig::default();
        cfg.run.season = "monsoon".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "run.season"));
    }

    #[test]
    fn validation_catches_inverted_range() {
        let mut cfg = RunConfig::default();
        cfg.ranges.humidity = Some([80.0, 20.0]);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "ranges.humidity"));
        // Invalid overrides are ignored when merging.
        assert_eq!(cfg.effective_ranges().humidity.low(), 30.0);
    }

    #[test]
    fn validation_catches_out_of_domain_range() {
        let mut cfg = RunConfig::default();
        cfg.ranges.ambient_temperature = Some([-20.0, 10.0]);
        cfg.ranges.irradiance = Some([0.0, 1300.0]);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "ranges.ambient_temperature"));
        assert!(errors.iter().any(|e| e.field == "ranges.irradiance"));
    }

    #[test]
    fn validation_accumulates_errors() {
        let mut cfg = RunConfig::default();
        cfg.run.year = 1999;
        cfg.ranges.tilt_angle = Some([50.0, 10.0]);
        assert_eq!(cfg.validate().len(), 2);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[run]
seed = 99
"#;
        let cfg = RunConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.run.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.run.year), Some(2024));
        assert_eq!(cfg.as_ref().map(|c| c.ranges.is_custom()), Some(false));
    }
}
