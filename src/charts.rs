//! SVG chart rendering for a generated run.
//!
//! Feature-gated behind `charts` (enabled by default).

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{debug, info};

use crate::generator::SeasonRun;
use crate::season::Parameter;
use crate::stats::{self, CORRELATION_COLUMNS};

const SIZE: (u32, u32) = (1280, 720);
const HISTOGRAM_BINS: usize = 30;

/// Colors cycled across months in multi-series charts.
const MONTH_PALETTE: [RGBColor; 4] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0x94, 0x67, 0xbd),
];

type DrawResult = Result<(), Box<dyn Error>>;

/// Failure while writing a chart file.
#[derive(Debug)]
pub struct ChartError {
    /// File or directory being written.
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart error: {} — {}", self.path.display(), self.message)
    }
}

impl Error for ChartError {}

fn season_color(run: &SeasonRun) -> RGBColor {
    let (r, g, b) = run.season.color_rgb();
    RGBColor(r, g, b)
}

/// Padded `[lo, hi]` bounds over `values`, never empty.
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad, hi + pad)
}

/// Red-blue diverging scale: -1 maps to red, +1 to blue.
pub fn diverging_color(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0);
    let lerp = |a: u8, b: u8, t: f64| (f64::from(a) + (f64::from(b) - f64::from(a)) * t) as u8;
    let (white, red, blue) = ((247, 247, 247), (178, 24, 43), (33, 102, 172));
    let (target, t) = if v < 0.0 { (red, -v) } else { (blue, v) };
    RGBColor(
        lerp(white.0, target.0, t),
        lerp(white.1, target.1, t),
        lerp(white.2, target.2, t),
    )
}

fn draw_timeseries(run: &SeasonRun, path: &Path) -> DrawResult {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = run.records.len().max(2) as f64;
    let (y_lo, y_hi) = padded_bounds(run.records.iter().map(|r| r.kwh));
    let title = format!("{} Season - Daily Energy Production", run.season.title());

    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..(n - 1.0), y_lo..y_hi)?;

    let date_label = |v: &f64| {
        run.records
            .get(v.round().max(0.0) as usize)
            .map(|r| r.date.clone())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Energy (kWh)")
        .x_labels(8)
        .x_label_formatter(&date_label)
        .draw()?;

    chart.draw_series(LineSeries::new(
        run.records.iter().enumerate().map(|(i, r)| (i as f64, r.kwh)),
        season_color(run).stroke_width(2),
    ))?;

    root.present()?;
    Ok(())
}

fn draw_correlation(run: &SeasonRun, path: &Path) -> DrawResult {
    let matrix = stats::correlation_matrix(&run.records);
    let n = matrix.size() as f64;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    // Left and top margins inside the coordinate space hold the labels.
    let mut chart = ChartBuilder::on(&root)
        .caption("Parameter Correlation Matrix", ("sans-serif", 28))
        .margin(20)
        .build_cartesian_2d(-2.5..n, 0.0..(n + 0.8))?;

    let cells = (0..matrix.size()).flat_map(|row| {
        (0..matrix.size()).map(move |col| (row, col))
    });
    chart.draw_series(cells.clone().map(|(row, col)| {
        // Row 0 is drawn at the top.
        let y0 = n - row as f64 - 1.0;
        let fill = matrix
            .get(row, col)
            .map_or(RGBColor(200, 200, 200), diverging_color);
        Rectangle::new(
            [(col as f64, y0), (col as f64 + 1.0, y0 + 1.0)],
            fill.filled(),
        )
    }))?;
    chart.draw_series(cells.map(|(row, col)| {
        let y = n - row as f64 - 0.5;
        let text = matrix
            .get(row, col)
            .map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
        Text::new(text, (col as f64 + 0.35, y), ("sans-serif", 16).into_font())
    }))?;

    chart.draw_series(CORRELATION_COLUMNS.iter().enumerate().map(|(i, label)| {
        Text::new(
            label.to_string(),
            (-2.4, n - i as f64 - 0.5),
            ("sans-serif", 16).into_font(),
        )
    }))?;
    chart.draw_series(CORRELATION_COLUMNS.iter().enumerate().map(|(i, label)| {
        Text::new(
            label.to_string(),
            (i as f64 + 0.05, n + 0.4),
            ("sans-serif", 14).into_font(),
        )
    }))?;

    root.present()?;
    Ok(())
}

fn draw_distribution(run: &SeasonRun, path: &Path) -> DrawResult {
    let bins = stats::histogram(&run.kwh_series(), HISTOGRAM_BINS);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = padded_bounds(bins.iter().flat_map(|b| [b.lower, b.upper]));
    let y_hi = bins.iter().map(|b| b.count).max().unwrap_or(1).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Energy Production Distribution", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("kWh")
        .y_desc("count")
        .draw()?;

    let color = season_color(run);
    chart.draw_series(bins.iter().map(|b| {
        // A single degenerate bin still gets a visible width.
        let upper = if b.upper > b.lower { b.upper } else { b.lower + 0.5 };
        Rectangle::new([(b.lower, 0.0), (upper, b.count as f64)], color.filled())
    }))?;

    root.present()?;
    Ok(())
}

fn draw_monthly_box(run: &SeasonRun, path: &Path) -> DrawResult {
    let summaries = stats::monthly_distribution(run);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = summaries.len().max(1) as f64;
    let (y_lo, y_hi) = padded_bounds(summaries.iter().flat_map(|(_, s)| [s.min, s.max]));
    let label_y = y_lo + (y_hi - y_lo) * 0.02;

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly Energy Production Variation", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..(n - 0.5), y_lo..y_hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .y_desc("Energy (kWh)")
        .draw()?;

    let color = season_color(run);
    for (i, (month, s)) in summaries.iter().enumerate() {
        let x = i as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.25, s.q1), (x + 0.25, s.q3)],
            color.mix(0.5).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.25, s.q1), (x + 0.25, s.q3)],
            color.stroke_width(2),
        )))?;
        chart.draw_series([
            PathElement::new(vec![(x - 0.25, s.median), (x + 0.25, s.median)], BLACK.stroke_width(2)),
            PathElement::new(vec![(x, s.min), (x, s.q1)], BLACK.stroke_width(1)),
            PathElement::new(vec![(x, s.q3), (x, s.max)], BLACK.stroke_width(1)),
            PathElement::new(vec![(x - 0.1, s.min), (x + 0.1, s.min)], BLACK.stroke_width(1)),
            PathElement::new(vec![(x - 0.1, s.max), (x + 0.1, s.max)], BLACK.stroke_width(1)),
        ])?;
        chart.draw_series(std::iter::once(Text::new(
            month.clone(),
            (x - 0.15, label_y),
            ("sans-serif", 16).into_font(),
        )))?;
    }

    root.present()?;
    Ok(())
}

fn draw_impact(run: &SeasonRun, parameter: Parameter, path: &Path) -> DrawResult {
    let xs = stats::parameter_values(&run.records, parameter);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = padded_bounds(xs.iter().copied());
    let (y_lo, y_hi) = padded_bounds(run.records.iter().map(|r| r.kwh));
    let (k_lo, k_hi) = (y_lo, y_hi);
    let title = format!("Energy vs {}", parameter.label());

    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(format!("{} ({})", parameter.label(), parameter.unit()))
        .y_desc("Energy (kWh)")
        .draw()?;

    // Marker radius grows with kWh, as in a bubble chart.
    let radius = |kwh: f64| 2 + ((kwh - k_lo) / (k_hi - k_lo) * 6.0).round() as i32;

    for (i, month) in run.season.months().iter().enumerate() {
        let color = MONTH_PALETTE[i % MONTH_PALETTE.len()];
        let points: Vec<(f64, f64)> = run
            .records
            .iter()
            .zip(&xs)
            .filter(|(r, _)| r.month == month.name())
            .map(|(r, &x)| (x, r.kwh))
            .collect();
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), radius(y), color.mix(0.7).filled())),
            )?
            .label(month.name())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// File name of the impact chart for `parameter`.
pub fn impact_file_name(parameter: Parameter) -> String {
    format!("impact_{}.svg", parameter.column())
}

fn render(path: PathBuf, draw: impl FnOnce(&Path) -> DrawResult) -> Result<PathBuf, ChartError> {
    draw(path.as_path()).map_err(|e| ChartError {
        path: path.clone(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), "chart written");
    Ok(path)
}

/// Renders every chart for `run` into `dir`, creating it if needed.
///
/// Returns the written file paths in a stable order.
///
/// # Errors
///
/// Returns a `ChartError` if the directory cannot be created or a chart
/// fails to render.
pub fn render_all(run: &SeasonRun, dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
    fs::create_dir_all(dir).map_err(|e| ChartError {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut written = vec![
        render(dir.join("timeseries.svg"), |p| draw_timeseries(run, p))?,
        render(dir.join("correlation.svg"), |p| draw_correlation(run, p))?,
        render(dir.join("distribution.svg"), |p| draw_distribution(run, p))?,
        render(dir.join("monthly_box.svg"), |p| draw_monthly_box(run, p))?,
    ];
    for parameter in Parameter::ALL {
        written.push(render(dir.join(impact_file_name(parameter)), |p| {
            draw_impact(run, parameter, p)
        })?);
    }

    info!(count = written.len(), dir = %dir.display(), "charts rendered");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::Season;

    #[test]
    fn diverging_scale_endpoints() {
        assert_eq!(diverging_color(-1.0), RGBColor(178, 24, 43));
        assert_eq!(diverging_color(1.0), RGBColor(33, 102, 172));
        assert_eq!(diverging_color(0.0), RGBColor(247, 247, 247));
        assert_eq!(diverging_color(5.0), diverging_color(1.0));
    }

    #[test]
    fn padded_bounds_handles_empty_and_flat() {
        assert_eq!(padded_bounds(std::iter::empty::<f64>()), (0.0, 1.0));
        let (lo, hi) = padded_bounds([3.0, 3.0].into_iter());
        assert!(lo < 3.0 && hi > 3.0);
    }

    #[test]
    fn renders_all_charts() {
        let run = SeasonRun::generate(Season::Winter, 2024, Season::Winter.default_ranges(), 4);
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = render_all(&run, dir.path()).expect("charts should render");
        assert_eq!(paths.len(), 9);
        for p in &paths {
            let svg = fs::read_to_string(p).expect("chart readable");
            assert!(svg.contains("<svg"), "{} is not SVG", p.display());
        }
        assert!(paths.iter().any(|p| p.ends_with("impact_tilt_angle.svg")));
    }
}
