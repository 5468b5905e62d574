//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

use crate::season::Season;

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Metric card value color.
pub const METRIC_FG: Color = Color::LightGreen;
/// Custom-range indicator color.
pub const CUSTOM_ACTIVE: Color = Color::Magenta;

/// Line color for a season, matching the chart palette.
pub fn season_color(season: Season) -> Color {
    let (r, g, b) = season.color_rgb();
    Color::Rgb(r, g, b)
}

/// Computes Y-axis bounds from chart data points with 10% padding.
pub fn auto_bounds_y(data: &[(f64, f64)]) -> [f64; 2] {
    let ys = data.iter().map(|&(_, y)| y);
    let min = ys.clone().fold(f64::INFINITY, f64::min);
    let max = ys.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
