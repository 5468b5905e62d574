//! Solar energy calculator entry point: CLI wiring and config-driven generation.

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use tracing::{debug, info};
#[cfg(not(feature = "charts"))]
use tracing::warn;
use tracing_subscriber::EnvFilter;

use solar_calc::config::RunConfig;
use solar_calc::generator::SeasonRun;
use solar_calc::io::export::export_csv;
use solar_calc::model::formula_description;
use solar_calc::season::Season;
use solar_calc::stats::{self, Metrics, MonthlyTable};

#[derive(Parser, Debug)]
#[command(author, version, about = "Seasonal solar energy calculator", long_about = None)]
struct Cli {
    /// Load run configuration from a TOML file
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in preset (winter, spring, summer, autumn)
    #[arg(long)]
    preset: Option<String>,

    /// Season to generate; overrides the config
    #[arg(long)]
    season: Option<String>,

    /// Year to generate (2020-2030); overrides the config
    #[arg(long)]
    year: Option<i32>,

    /// Random seed; overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Write generated records to CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    csv_out: Option<PathBuf>,

    /// Render SVG charts into this directory
    #[cfg(feature = "charts")]
    #[arg(long, value_hint = ValueHint::DirPath)]
    charts_dir: Option<PathBuf>,

    /// Print every daily record
    #[arg(long, action = ArgAction::SetTrue)]
    print_records: bool,

    /// Open the interactive terminal dashboard
    #[cfg(feature = "tui")]
    #[arg(long, action = ArgAction::SetTrue)]
    tui: bool,

    /// Start REST API server after generation
    #[cfg(feature = "api")]
    #[arg(long, action = ArgAction::SetTrue)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Enable debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Loads the configuration and applies command-line overrides.
fn load_config(cli: &Cli) -> Result<RunConfig> {
    // --config takes priority, then --preset, then the winter default
    let mut cfg = if let Some(path) = &cli.config {
        RunConfig::from_toml_file(path)?
    } else if let Some(name) = &cli.preset {
        RunConfig::from_preset(name)?
    } else {
        RunConfig::default()
    };

    if let Some(season) = &cli.season {
        cfg.run.season = season.clone();
    }
    if let Some(year) = cli.year {
        cfg.run.year = year;
    }
    if let Some(seed) = cli.seed {
        cfg.run.seed = seed;
    }
    if let Some(path) = &cli.csv_out {
        cfg.output.csv = Some(path.clone());
    }
    #[cfg(feature = "charts")]
    if let Some(dir) = &cli.charts_dir {
        cfg.output.charts_dir = Some(dir.clone());
    }
    Ok(cfg)
}

fn print_banner(run: &SeasonRun) {
    let months: Vec<&str> = run.season.months().iter().map(|m| m.name()).collect();
    println!(
        "{} {} Season Analysis",
        run.season.icon(),
        run.season.title()
    );
    println!("Months: {}", months.join(", "));
    println!("Year: {}", run.year);
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let cfg = load_config(&cli)?;

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        return solar_calc::tui::run(cfg).context("terminal dashboard failed");
    }

    let season: Season = cfg.run.season.parse()?;
    let ranges = cfg.effective_ranges();
    debug!(?ranges, custom = cfg.ranges.is_custom(), "effective ranges");

    let run = SeasonRun::generate(season, cfg.run.year, ranges, cfg.run.seed);
    info!(
        season = %run.season,
        year = run.year,
        seed = run.seed,
        days = run.records.len(),
        "generated solar data"
    );

    print_banner(&run);

    if cli.print_records {
        println!();
        for r in &run.records {
            println!(
                "{}  irr={:>7.2}  hum={:>5.2}  wind={:>5.2}  temp={:>5.2}  tilt={:>5.2}  kwh={:>7.2}",
                r.date,
                r.irradiance,
                r.humidity,
                r.wind_speed,
                r.ambient_temperature,
                r.tilt_angle,
                r.kwh
            );
        }
    }

    let metrics = Metrics::from_records(&run.records);
    let monthly = stats::monthly_breakdown(&run);
    println!("\n{metrics}");
    println!("\n{}", MonthlyTable(&monthly));
    println!("\n{}", formula_description(run.season));

    if let Some(path) = &cfg.output.csv {
        export_csv(&run.records, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        info!("records written to {}", path.display());
    }

    #[cfg(feature = "charts")]
    if let Some(dir) = &cfg.output.charts_dir {
        solar_calc::charts::render_all(&run, dir)?;
    }
    #[cfg(not(feature = "charts"))]
    if cfg.output.charts_dir.is_some() {
        warn!("charts_dir is set but this build has no `charts` feature; skipping charts");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let custom = cfg.ranges.is_custom();
        let state = Arc::new(solar_calc::api::AppState::new(run, custom));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(solar_calc::api::serve(state, addr))
            .with_context(|| format!("API server on {addr} failed"))?;
    }

    Ok(())
}
