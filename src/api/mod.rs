//! Read-only REST API over one generated run.
//!
//! Endpoints:
//! - `/state` — run inputs, headline metrics, and monthly breakdown
//! - `/records` — daily records with optional day-range and month filters
//! - `/correlation` — parameter correlation matrix
//! - `/formula` — season coefficients and formula text
//! - `/export.csv` — CSV download of the records
//! - `/seasons` — season catalogue

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::generator::SeasonRun;
use crate::stats::{self, Metrics, MonthlyStats};

pub use types::{ErrorResponse, FormulaResponse, RecordsQuery, StateResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once from a finished run and wrapped in `Arc`; no locks needed
/// since all data is read-only.
pub struct AppState {
    /// The generated dataset.
    pub run: SeasonRun,
    /// Headline metrics for `run`.
    pub metrics: Metrics,
    /// Monthly breakdown for `run`.
    pub monthly: Vec<MonthlyStats>,
    /// Whether `run` used custom parameter ranges.
    pub custom_ranges: bool,
}

impl AppState {
    /// Precomputes the summaries served by the API.
    pub fn new(run: SeasonRun, custom_ranges: bool) -> Self {
        let metrics = Metrics::from_records(&run.records);
        let monthly = stats::monthly_breakdown(&run);
        Self {
            run,
            metrics,
            monthly,
            custom_ranges,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/records", get(handlers::get_records))
        .route("/correlation", get(handlers::get_correlation))
        .route("/formula", get(handlers::get_formula))
        .route("/export.csv", get(handlers::get_csv))
        .route("/seasons", get(handlers::get_seasons))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
