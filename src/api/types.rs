//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::model::Coefficients;
use crate::season::{ParameterRanges, Season};
use crate::stats::{Metrics, MonthlyStats};

/// Run inputs plus summaries.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub season: Season,
    pub year: i32,
    pub seed: u64,
    /// Ranges the data was sampled from.
    pub ranges: ParameterRanges,
    /// Whether `ranges` differ from the season defaults.
    pub custom_ranges: bool,
    pub metrics: Metrics,
    pub monthly: Vec<MonthlyStats>,
}

/// Season coefficients and the formula text.
#[derive(Debug, Serialize)]
pub struct FormulaResponse {
    pub season: Season,
    pub coefficients: Coefficients,
    pub description: String,
}

/// Optional filters for the records endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    /// First day index, 1-based (inclusive).
    pub from: Option<usize>,
    /// Last day index, 1-based (inclusive).
    pub to: Option<usize>,
    /// English month name (case-insensitive).
    pub month: Option<String>,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
