//! Post-hoc summaries computed from a generated dataset.

use std::fmt;

use serde::Serialize;

use crate::generator::{DailyRecord, SeasonRun, round2};
use crate::season::Parameter;

/// Headline figures for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    /// Sum of daily kWh.
    pub total_kwh: f64,
    /// Mean daily kWh.
    pub mean_kwh: f64,
    /// Highest daily kWh.
    pub peak_kwh: f64,
    /// Number of generated days.
    pub days: usize,
}

impl Metrics {
    /// Computes metrics; all fields are zero for an empty dataset.
    pub fn from_records(records: &[DailyRecord]) -> Self {
        if records.is_empty() {
            return Self {
                total_kwh: 0.0,
                mean_kwh: 0.0,
                peak_kwh: 0.0,
                days: 0,
            };
        }
        let total: f64 = records.iter().map(|r| r.kwh).sum();
        let peak = records
            .iter()
            .map(|r| r.kwh)
            .fold(f64::NEG_INFINITY, f64::max);
        Self {
            total_kwh: total,
            mean_kwh: total / records.len() as f64,
            peak_kwh: peak,
            days: records.len(),
        }
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Key Metrics ---")?;
        writeln!(f, "Total Energy:    {:.1} kWh", self.total_kwh)?;
        writeln!(f, "Average Daily:   {:.1} kWh", self.mean_kwh)?;
        writeln!(f, "Peak Day:        {:.1} kWh", self.peak_kwh)?;
        write!(f, "Total Days:      {}", self.days)
    }
}

/// Aggregates for one month of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub month: String,
    pub total_kwh: f64,
    pub mean_kwh: f64,
    pub max_kwh: f64,
    pub min_kwh: f64,
    pub days: usize,
}

/// Per-month aggregates in the season's listing order, rounded to 2 decimals.
pub fn monthly_breakdown(run: &SeasonRun) -> Vec<MonthlyStats> {
    run.season
        .months()
        .iter()
        .filter_map(|m| {
            let values: Vec<f64> = run
                .records
                .iter()
                .filter(|r| r.month == m.name())
                .map(|r| r.kwh)
                .collect();
            if values.is_empty() {
                return None;
            }
            let total: f64 = values.iter().sum();
            Some(MonthlyStats {
                month: m.name().to_string(),
                total_kwh: round2(total),
                mean_kwh: round2(total / values.len() as f64),
                max_kwh: round2(values.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
                min_kwh: round2(values.iter().copied().fold(f64::INFINITY, f64::min)),
                days: values.len(),
            })
        })
        .collect()
}

/// Wrapper giving the monthly table a `Display` impl.
pub struct MonthlyTable<'a>(pub &'a [MonthlyStats]);

impl fmt::Display for MonthlyTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Monthly Breakdown ---")?;
        write!(
            f,
            "{:<10} {:>10} {:>8} {:>8} {:>8} {:>5}",
            "Month", "Total kWh", "Avg kWh", "Max kWh", "Min kWh", "Days"
        )?;
        for m in self.0 {
            write!(
                f,
                "\n{:<10} {:>10.2} {:>8.2} {:>8.2} {:>8.2} {:>5}",
                m.month, m.total_kwh, m.mean_kwh, m.max_kwh, m.min_kwh, m.days
            )?;
        }
        Ok(())
    }
}

/// Column labels of the correlation matrix: the five parameters then `kwh`.
pub const CORRELATION_COLUMNS: [&str; 6] = [
    "irradiance",
    "humidity",
    "wind_speed",
    "ambient_temperature",
    "tilt_angle",
    "kwh",
];

fn column(records: &[DailyRecord], idx: usize) -> Vec<f64> {
    records
        .iter()
        .map(|r| match idx {
            0 => r.irradiance,
            1 => r.humidity,
            2 => r.wind_speed,
            3 => r.ambient_temperature,
            4 => r.tilt_angle,
            _ => r.kwh,
        })
        .collect()
}

/// Values of one parameter column in record order.
pub fn parameter_values(records: &[DailyRecord], parameter: Parameter) -> Vec<f64> {
    let idx = Parameter::ALL
        .iter()
        .position(|&p| p == parameter)
        .unwrap_or(0);
    column(records, idx)
}

/// Pearson correlation of two equal-length series.
///
/// `None` when fewer than two points are given or either series is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    // Exact constancy check; a summed mean leaves residue on constant data.
    if x.iter().all(|v| *v == x[0]) || y.iter().all(|v| *v == y[0]) {
        return None;
    }
    let nf = n as f64;
    let mx = x.iter().sum::<f64>() / nf;
    let my = y.iter().sum::<f64>() / nf;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Symmetric correlation matrix over [`CORRELATION_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major cells; `None` where a column has zero variance.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }
}

/// Computes the correlation matrix of the numeric columns.
pub fn correlation_matrix(records: &[DailyRecord]) -> CorrelationMatrix {
    let n = CORRELATION_COLUMNS.len();
    let columns: Vec<Vec<f64>> = (0..n).map(|i| column(records, i)).collect();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let c = if i == j {
                pearson(&columns[i], &columns[i]).map(|_| 1.0)
            } else {
                pearson(&columns[i], &columns[j])
            };
            values[i][j] = c;
            values[j][i] = c;
        }
    }
    CorrelationMatrix {
        labels: CORRELATION_COLUMNS.iter().map(|s| s.to_string()).collect(),
        values,
    }
}

/// One histogram bin covering `[lower, upper)` (the last bin is closed).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over `[min, max]` of `values`.
///
/// Returns no bins for empty input and a single bin when all values are equal.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= min {
        return vec![Bin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }
    let width = (max - min) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Quartile summary used for box plots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Linear-interpolated quantile of already sorted data.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

impl FiveNumberSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            min: sorted[0],
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Box-plot summary for each month in listing order.
pub fn monthly_distribution(run: &SeasonRun) -> Vec<(String, FiveNumberSummary)> {
    run.season
        .months()
        .iter()
        .filter_map(|m| {
            let values: Vec<f64> = run
                .records
                .iter()
                .filter(|r| r.month == m.name())
                .map(|r| r.kwh)
                .collect();
            FiveNumberSummary::from_values(&values).map(|s| (m.name().to_string(), s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::{ParameterRange, Season};

    fn record(month: &str, day: u32, irr: f64, kwh: f64) -> DailyRecord {
        DailyRecord {
            date: format!("2024-01-{day:02}"),
            irradiance: irr,
            humidity: 50.0,
            wind_speed: 3.0,
            ambient_temperature: 10.0,
            tilt_angle: 20.0,
            kwh,
            season: Season::Winter,
            month: month.to_string(),
            day,
        }
    }

    #[test]
    fn metrics_basic() {
        let recs = vec![
            record("January", 1, 1.0, 10.0),
            record("January", 2, 2.0, 30.0),
            record("January", 3, 3.0, 20.0),
        ];
        let m = Metrics::from_records(&recs);
        assert_eq!(m.total_kwh, 60.0);
        assert_eq!(m.mean_kwh, 20.0);
        assert_eq!(m.peak_kwh, 30.0);
        assert_eq!(m.days, 3);
    }

    #[test]
    fn metrics_empty() {
        let m = Metrics::from_records(&[]);
        assert_eq!(m.total_kwh, 0.0);
        assert_eq!(m.days, 0);
    }

    #[test]
    fn pearson_perfect_and_constant() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let z = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &z).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&x, &[5.0; 4]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
    }

    #[test]
    fn pearson_constant_with_inexact_mean() {
        // 61 × 94.37 does not sum to an exact multiple in f64.
        let flat = [94.37; 61];
        let ramp: Vec<f64> = (0..61).map(f64::from).collect();
        assert_eq!(pearson(&flat, &ramp), None);
        assert_eq!(pearson(&ramp, &flat), None);
        assert_eq!(pearson(&flat, &flat), None);
    }

    #[test]
    fn correlation_matrix_constant_kwh_is_undefined() {
        let records: Vec<DailyRecord> = (1..=61)
            .map(|d| record("September", (d - 1) % 30 + 1, 300.0 + f64::from(d), 94.37))
            .collect();
        let m = correlation_matrix(&records);
        let kwh = m.size() - 1;
        assert_eq!(m.get(kwh, kwh), None);
        assert_eq!(m.get(0, kwh), None);
        assert_eq!(m.get(0, 0), Some(1.0));
    }

    #[test]
    fn correlation_matrix_symmetric_with_unit_diagonal() {
        let run = SeasonRun::generate(Season::Spring, 2024, Season::Spring.default_ranges(), 3);
        let m = correlation_matrix(&run.records);
        assert_eq!(m.size(), 6);
        for i in 0..6 {
            assert_eq!(m.get(i, i), Some(1.0));
            for j in 0..6 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        // Irradiance dominates the formula.
        assert!(m.get(0, 5).unwrap() > 0.9);
    }

    #[test]
    fn constant_column_has_undefined_correlation() {
        let mut ranges = Season::Winter.default_ranges();
        ranges.humidity = ParameterRange::new(40.0, 40.0).unwrap();
        let run = SeasonRun::generate(Season::Winter, 2024, ranges, 3);
        let m = correlation_matrix(&run.records);
        assert_eq!(m.get(1, 1), None);
        assert_eq!(m.get(1, 5), None);
        assert!(m.get(0, 5).is_some());
    }

    #[test]
    fn histogram_counts_everything() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let bins = histogram(&values, 30);
        assert_eq!(bins.len(), 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins[29].upper, 99.0);
    }

    #[test]
    fn histogram_degenerate() {
        let bins = histogram(&[4.0, 4.0, 4.0], 30);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert!(histogram(&[], 30).is_empty());
    }

    #[test]
    fn five_number_summary_interpolates() {
        let s = FiveNumberSummary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.min, 1.0);
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q3, 3.25);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn monthly_breakdown_follows_listing_order() {
        let run = SeasonRun::generate(Season::Winter, 2024, Season::Winter.default_ranges(), 8);
        let months = monthly_breakdown(&run);
        let names: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(names, ["November", "December", "January", "February"]);
        assert_eq!(months[3].days, 29);
        for m in &months {
            assert!(m.min_kwh <= m.mean_kwh && m.mean_kwh <= m.max_kwh);
        }
        assert_eq!(monthly_distribution(&run).len(), 4);
    }

    #[test]
    fn monthly_table_renders_rows() {
        let run = SeasonRun::generate(Season::Autumn, 2024, Season::Autumn.default_ranges(), 8);
        let text = MonthlyTable(&monthly_breakdown(&run)).to_string();
        assert!(text.contains("September"));
        assert!(text.contains("October"));
        assert_eq!(text.lines().count(), 4);
    }
}
