//! Seasonal catalogue: months, default parameter ranges, and display traits.

use std::fmt;
use std::str::FromStr;

use chrono::{Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// A meteorological season as used by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// All seasons in catalogue order.
    pub const ALL: [Season; 4] = [Self::Winter, Self::Spring, Self::Summer, Self::Autumn];

    /// Lowercase identifier (`"winter"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
        }
    }

    /// Title-cased name for headings (`"Winter"`, ...).
    pub fn title(self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
        }
    }

    /// Months covered by the season, in listing order.
    ///
    /// Winter lists November and December before January and February; all
    /// months are generated within the same calendar year.
    pub fn months(self) -> &'static [Month] {
        match self {
            Self::Winter => &[
                Month::November,
                Month::December,
                Month::January,
                Month::February,
            ],
            Self::Spring => &[Month::March, Month::April, Month::May],
            Self::Summer => &[Month::June, Month::July, Month::August],
            Self::Autumn => &[Month::September, Month::October],
        }
    }

    /// Chart color as a `#rrggbb` hex string.
    pub fn color_hex(self) -> &'static str {
        match self {
            Self::Winter => "#3498db",
            Self::Spring => "#2ecc71",
            Self::Summer => "#f39c12",
            Self::Autumn => "#e67e22",
        }
    }

    /// Chart color as an RGB triple.
    pub fn color_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Winter => (0x34, 0x98, 0xdb),
            Self::Spring => (0x2e, 0xcc, 0x71),
            Self::Summer => (0xf3, 0x9c, 0x12),
            Self::Autumn => (0xe6, 0x7e, 0x22),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Winter => "❄️",
            Self::Spring => "🌸",
            Self::Summer => "☀️",
            Self::Autumn => "🍂",
        }
    }

    /// Default sampling ranges for the season.
    pub fn default_ranges(self) -> ParameterRanges {
        let (irr, hum, wind, temp, tilt) = match self {
            Self::Winter => ((300.0, 700.0), (30.0, 70.0), (1.0, 6.0), (5.0, 20.0), (10.0, 40.0)),
            Self::Spring => ((400.0, 800.0), (40.0, 80.0), (2.0, 8.0), (15.0, 25.0), (15.0, 35.0)),
            Self::Summer => ((600.0, 1000.0), (50.0, 90.0), (3.0, 10.0), (25.0, 40.0), (0.0, 30.0)),
            Self::Autumn => ((350.0, 750.0), (35.0, 75.0), (2.0, 7.0), (10.0, 25.0), (20.0, 45.0)),
        };
        ParameterRanges {
            irradiance: ParameterRange::from_const(irr),
            humidity: ParameterRange::from_const(hum),
            wind_speed: ParameterRange::from_const(wind),
            ambient_temperature: ParameterRange::from_const(temp),
            tilt_angle: ParameterRange::from_const(tilt),
        }
    }

    /// Full catalogue entry for the season.
    pub fn profile(self) -> SeasonProfile {
        SeasonProfile {
            season: self,
            months: self.months().iter().map(|m| m.name().to_string()).collect(),
            ranges: self.default_ranges(),
            color: self.color_hex().to_string(),
            icon: self.icon().to_string(),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a season name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeason(pub String);

impl fmt::Display for UnknownSeason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown season \"{}\", available: winter, spring, summer, autumn",
            self.0
        )
    }
}

impl std::error::Error for UnknownSeason {}

impl FromStr for Season {
    type Err = UnknownSeason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winter" => Ok(Self::Winter),
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "autumn" => Ok(Self::Autumn),
            _ => Err(UnknownSeason(s.to_string())),
        }
    }
}

/// One of the five environmental inputs to the energy formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Irradiance,
    Humidity,
    WindSpeed,
    AmbientTemperature,
    TiltAngle,
}

impl Parameter {
    pub const ALL: [Parameter; 5] = [
        Self::Irradiance,
        Self::Humidity,
        Self::WindSpeed,
        Self::AmbientTemperature,
        Self::TiltAngle,
    ];

    /// Column name used in CSV export and the API.
    pub fn column(self) -> &'static str {
        match self {
            Self::Irradiance => "irradiance",
            Self::Humidity => "humidity",
            Self::WindSpeed => "wind_speed",
            Self::AmbientTemperature => "ambient_temperature",
            Self::TiltAngle => "tilt_angle",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Irradiance => "Irradiance",
            Self::Humidity => "Humidity",
            Self::WindSpeed => "Wind Speed",
            Self::AmbientTemperature => "Ambient Temperature",
            Self::TiltAngle => "Tilt Angle",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Irradiance => "W/m²",
            Self::Humidity => "%",
            Self::WindSpeed => "m/s",
            Self::AmbientTemperature => "°C",
            Self::TiltAngle => "°",
        }
    }

    /// Inclusive domain a custom range must stay within.
    pub fn domain(self) -> (f64, f64) {
        match self {
            Self::Irradiance => (0.0, 1200.0),
            Self::Humidity => (0.0, 100.0),
            Self::WindSpeed => (0.0, 15.0),
            Self::AmbientTemperature => (-10.0, 50.0),
            Self::TiltAngle => (0.0, 60.0),
        }
    }

    /// Increment applied by [`ParameterRange::nudged`].
    pub fn step(self) -> f64 {
        match self {
            Self::Irradiance => 50.0,
            Self::Humidity | Self::AmbientTemperature | Self::TiltAngle => 5.0,
            Self::WindSpeed => 1.0,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Error returned for an ill-formed closed interval.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeError {
    pub low: f64,
    pub high: f64,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid range [{}, {}]: bounds must be finite and low <= high",
            self.low, self.high
        )
    }
}

impl std::error::Error for RangeError {}

/// End of a [`ParameterRange`] targeted by an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Low,
    High,
}

/// Closed sampling interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct ParameterRange {
    low: f64,
    high: f64,
}

impl ParameterRange {
    /// Creates a range, rejecting non-finite bounds or `low > high`.
    pub fn new(low: f64, high: f64) -> Result<Self, RangeError> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(RangeError { low, high });
        }
        Ok(Self { low, high })
    }

    // Only used for the catalogue constants above, which are ordered.
    fn from_const((low, high): (f64, f64)) -> Self {
        Self { low, high }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }

    /// Whether the range lies inside `[lo, hi]`.
    pub fn within(&self, (lo, hi): (f64, f64)) -> bool {
        self.low >= lo && self.high <= hi
    }

    /// Moves one bound by `steps` multiples of [`Parameter::step`].
    ///
    /// The moved bound stays inside the parameter's domain and never crosses
    /// the other bound.
    pub fn nudged(self, parameter: Parameter, bound: Bound, steps: i32) -> Self {
        let delta = parameter.step() * f64::from(steps);
        let (lo, hi) = parameter.domain();
        match bound {
            Bound::Low => Self {
                low: (self.low + delta).max(lo).min(self.high),
                high: self.high,
            },
            Bound::High => Self {
                low: self.low,
                high: (self.high + delta).min(hi).max(self.low),
            },
        }
    }
}

impl TryFrom<[f64; 2]> for ParameterRange {
    type Error = RangeError;

    fn try_from([low, high]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(low, high)
    }
}

impl From<ParameterRange> for [f64; 2] {
    fn from(r: ParameterRange) -> Self {
        [r.low, r.high]
    }
}

impl fmt::Display for ParameterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.low, self.high)
    }
}

/// One sampling range per [`Parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRanges {
    pub irradiance: ParameterRange,
    pub humidity: ParameterRange,
    pub wind_speed: ParameterRange,
    pub ambient_temperature: ParameterRange,
    pub tilt_angle: ParameterRange,
}

impl ParameterRanges {
    pub fn get(&self, parameter: Parameter) -> ParameterRange {
        match parameter {
            Parameter::Irradiance => self.irradiance,
            Parameter::Humidity => self.humidity,
            Parameter::WindSpeed => self.wind_speed,
            Parameter::AmbientTemperature => self.ambient_temperature,
            Parameter::TiltAngle => self.tilt_angle,
        }
    }

    pub fn set(&mut self, parameter: Parameter, range: ParameterRange) {
        match parameter {
            Parameter::Irradiance => self.irradiance = range,
            Parameter::Humidity => self.humidity = range,
            Parameter::WindSpeed => self.wind_speed = range,
            Parameter::AmbientTemperature => self.ambient_temperature = range,
            Parameter::TiltAngle => self.tilt_angle = range,
        }
    }
}

/// Catalogue entry describing a season.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonProfile {
    pub season: Season,
    /// English month names in listing order.
    pub months: Vec<String>,
    pub ranges: ParameterRanges,
    pub color: String,
    pub icon: String,
}

/// Number of days in `month` of `year`, honoring leap years.
pub fn days_in_month(month: Month, year: i32) -> u32 {
    let m = month.number_from_month();
    let first = NaiveDate::from_ymd_opt(year, m, 1);
    let next = if m == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, m + 1, 1)
    };
    match (first, next) {
        (Some(a), Some(b)) => b.signed_duration_since(a).num_days() as u32,
        // Out of chrono's representable range; fall back to the last valid day.
        _ => (28..=31)
            .rev()
            .find(|&d| NaiveDate::from_ymd_opt(year, m, d).is_some())
            .unwrap_or(28),
    }
}

/// Parses an English month name (case-insensitive).
pub fn month_from_name(name: &str) -> Option<Month> {
    name.trim().parse::<Month>().ok()
}
