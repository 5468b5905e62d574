//! Synthetic daily dataset generation.

use chrono::Month;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::debug;

use crate::model::{WeatherSample, energy_kwh};
use crate::season::{ParameterRange, ParameterRanges, Season, days_in_month};

/// One generated calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub irradiance: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub ambient_temperature: f64,
    pub tilt_angle: f64,
    /// Daily energy yield (kWh).
    pub kwh: f64,
    pub season: Season,
    /// English month name.
    pub month: String,
    /// Day of month, 1-based.
    pub day: u32,
}

/// Draws daily samples for one season and year from a seeded RNG.
#[derive(Debug, Clone)]
pub struct SeasonGenerator {
    season: Season,
    year: i32,
    ranges: ParameterRanges,
    rng: StdRng,
}

impl SeasonGenerator {
    /// Creates a generator; identical arguments always yield identical data.
    pub fn new(season: Season, year: i32, ranges: ParameterRanges, seed: u64) -> Self {
        Self {
            season,
            year,
            ranges,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn draw(&mut self, range: ParameterRange) -> f64 {
        if range.low() == range.high() {
            return range.low();
        }
        self.rng.random_range(range.low()..=range.high())
    }

    /// Samples one day's weather.
    pub fn sample(&mut self) -> WeatherSample {
        let r = self.ranges;
        WeatherSample {
            irradiance: self.draw(r.irradiance),
            humidity: self.draw(r.humidity),
            wind_speed: self.draw(r.wind_speed),
            ambient_temperature: self.draw(r.ambient_temperature),
            tilt_angle: self.draw(r.tilt_angle),
        }
    }

    fn generate_month(&mut self, month: Month, out: &mut Vec<DailyRecord>) {
        let m = month.number_from_month();
        for day in 1..=days_in_month(month, self.year) {
            let s = self.sample();
            // Energy is computed before rounding the inputs.
            let kwh = energy_kwh(&s, self.season);
            out.push(DailyRecord {
                date: format!("{:04}-{m:02}-{day:02}", self.year),
                irradiance: round2(s.irradiance),
                humidity: round2(s.humidity),
                wind_speed: round2(s.wind_speed),
                ambient_temperature: round2(s.ambient_temperature),
                tilt_angle: round2(s.tilt_angle),
                kwh: round2(kwh),
                season: self.season,
                month: month.name().to_string(),
                day,
            });
        }
    }

    /// Generates one record per day of every month in the season.
    pub fn generate(&mut self) -> Vec<DailyRecord> {
        let months = self.season.months();
        let capacity = months
            .iter()
            .map(|&m| days_in_month(m, self.year) as usize)
            .sum();
        let mut records = Vec::with_capacity(capacity);
        for &month in months {
            self.generate_month(month, &mut records);
        }
        debug!(
            season = %self.season,
            year = self.year,
            records = records.len(),
            "generated seasonal dataset"
        );
        records
    }
}

/// A generated dataset together with the inputs that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonRun {
    pub season: Season,
    pub year: i32,
    pub seed: u64,
    pub ranges: ParameterRanges,
    pub records: Vec<DailyRecord>,
}

impl SeasonRun {
    /// Generates a run for `season`/`year` using `ranges` and `seed`.
    pub fn generate(season: Season, year: i32, ranges: ParameterRanges, seed: u64) -> Self {
        let records = SeasonGenerator::new(season, year, ranges, seed).generate();
        Self {
            season,
            year,
            seed,
            ranges,
            records,
        }
    }

    /// Suggested CSV file name, e.g. `solar_energy_winter_2024.csv`.
    pub fn csv_file_name(&self) -> String {
        format!("solar_energy_{}_{}.csv", self.season, self.year)
    }

    /// Daily kWh values in record order.
    pub fn kwh_series(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.kwh).collect()
    }
}

/// Rounds half away from zero to two decimals.
///
/// Python's `round(x, 2)` rounds exact halves to even instead; sampled values
/// essentially never land on a half, so the two agree in practice.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
