//! Empirical daily energy model with season-specific coefficients.

use serde::Serialize;

use crate::season::Season;

/// Environmental inputs for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherSample {
    /// Solar irradiance (W/m²).
    pub irradiance: f64,
    /// Relative humidity (%).
    pub humidity: f64,
    /// Wind speed (m/s).
    pub wind_speed: f64,
    /// Ambient temperature (°C).
    pub ambient_temperature: f64,
    /// Panel tilt (degrees from horizontal).
    pub tilt_angle: f64,
}

/// Linear weights applied to each input.
///
/// The tilt term is applied to the absolute deviation from
/// [`Coefficients::optimal_tilt`], so a negative weight penalizes deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coefficients {
    pub irradiance: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub ambient_temperature: f64,
    pub tilt: f64,
    /// Reference tilt angle (degrees).
    pub optimal_tilt: f64,
}

impl Coefficients {
    pub fn for_season(season: Season) -> Self {
        match season {
            Season::Winter => Self {
                irradiance: 0.18,
                humidity: -0.03,
                wind_speed: 0.015,
                ambient_temperature: 0.08,
                tilt: -0.02,
                optimal_tilt: 30.0,
            },
            Season::Spring => Self {
                irradiance: 0.20,
                humidity: -0.025,
                wind_speed: 0.02,
                ambient_temperature: 0.06,
                tilt: -0.015,
                optimal_tilt: 30.0,
            },
            Season::Summer => Self {
                irradiance: 0.22,
                humidity: -0.035,
                wind_speed: 0.025,
                ambient_temperature: 0.04,
                tilt: -0.01,
                optimal_tilt: 20.0,
            },
            Season::Autumn => Self {
                irradiance: 0.19,
                humidity: -0.028,
                wind_speed: 0.018,
                ambient_temperature: 0.07,
                tilt: -0.018,
                optimal_tilt: 20.0,
            },
        }
    }

    /// Evaluates the model for one sample.
    pub fn apply(&self, s: &WeatherSample) -> f64 {
        self.irradiance * s.irradiance
            + self.humidity * s.humidity
            + self.wind_speed * s.wind_speed
            + self.ambient_temperature * s.ambient_temperature
            + self.tilt * (s.tilt_angle - self.optimal_tilt).abs()
    }
}

/// Daily energy yield (kWh) for `sample` under `season`'s coefficients.
///
/// Not clamped: custom inputs far outside the seasonal ranges may yield
/// negative values.
pub fn energy_kwh(sample: &WeatherSample, season: Season) -> f64 {
    Coefficients::for_season(season).apply(sample)
}

/// Human-readable formula with the season's coefficients substituted.
pub fn formula_description(season: Season) -> String {
    let c = Coefficients::for_season(season);
    format!(
        "Energy Calculation Formula for {} Season:\n\
         \x20 kWh =   {} × Irradiance\n\
         \x20       + ({}) × Humidity\n\
         \x20       + {} × Wind Speed\n\
         \x20       + {} × Temperature\n\
         \x20       + ({}) × |Tilt - {}|",
        season.title(),
        c.irradiance,
        c.humidity,
        c.wind_speed,
        c.ambient_temperature,
        c.tilt,
        c.optimal_tilt,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(irr: f64, hum: f64, wind: f64, temp: f64, tilt: f64) -> WeatherSample {
        WeatherSample {
            irradiance: irr,
            humidity: hum,
            wind_speed: wind,
            ambient_temperature: temp,
            tilt_angle: tilt,
        }
    }

    #[test]
    fn winter_reference_value() {
        // 0.18*500 - 0.03*50 + 0.015*4 + 0.08*10 - 0.02*|20-30|
        // = 90 - 1.5 + 0.06 + 0.8 - 0.2 = 89.16
        let kwh = energy_kwh(&sample(500.0, 50.0, 4.0, 10.0, 20.0), Season::Winter);
        assert!((kwh - 89.16).abs() < 1e-9);
    }

    #[test]
    fn summer_uses_lower_optimal_tilt() {
        let at_opt = energy_kwh(&sample(800.0, 70.0, 5.0, 30.0, 20.0), Season::Summer);
        let off_opt = energy_kwh(&sample(800.0, 70.0, 5.0, 30.0, 30.0), Season::Summer);
        assert!((at_opt - off_opt - 0.1).abs() < 1e-9);
    }

    #[test]
    fn tilt_penalty_is_symmetric() {
        let above = energy_kwh(&sample(400.0, 40.0, 2.0, 15.0, 40.0), Season::Spring);
        let below = energy_kwh(&sample(400.0, 40.0, 2.0, 15.0, 20.0), Season::Spring);
        assert!((above - below).abs() < 1e-12);
    }

    #[test]
    fn not_clamped_for_extreme_inputs() {
        let kwh = energy_kwh(&sample(0.0, 100.0, 0.0, -10.0, 60.0), Season::Autumn);
        assert!(kwh < 0.0);
    }

    #[test]
    fn description_mentions_coefficients() {
        let text = formula_description(Season::Autumn);
        assert!(text.contains("Autumn Season"));
        assert!(text.contains("0.19"));
        assert!(text.contains("|Tilt - 20|"));
    }
}
