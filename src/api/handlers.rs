//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use tracing::warn;

use super::AppState;
use super::types::{ErrorResponse, FormulaResponse, RecordsQuery, StateResponse};
use crate::generator::DailyRecord;
use crate::io::export::to_csv_string;
use crate::model::{Coefficients, formula_description};
use crate::season::{Season, SeasonProfile, month_from_name};
use crate::stats::{CorrelationMatrix, correlation_matrix};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let run = &state.run;
    Json(StateResponse {
        season: run.season,
        year: run.year,
        seed: run.seed,
        ranges: run.ranges,
        custom_ranges: state.custom_ranges,
        metrics: state.metrics.clone(),
        monthly: state.monthly.clone(),
    })
}

/// Returns daily records, optionally filtered.
///
/// `GET /records` → every record
/// `GET /records?from=N&to=M` → days N..=M of the run (1-based)
/// `GET /records?month=June` → one month
/// `GET /records?from=10&to=5`, `from=0`, a malformed query, or an unknown
/// month → 400 + `ErrorResponse`
pub async fn get_records(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RecordsQuery>, QueryRejection>,
) -> Result<Json<Vec<DailyRecord>>, ApiError> {
    let Query(query) = query.map_err(|e| bad_request(e.body_text()))?;
    let from = query.from.unwrap_or(1);
    let to = query.to.unwrap_or(usize::MAX);

    if from == 0 || to == 0 {
        return Err(bad_request("day indices are 1-based".to_string()));
    }
    if from > to {
        return Err(bad_request(format!("`from` ({from}) must be <= `to` ({to})")));
    }

    let month = match query.month.as_deref() {
        Some(name) => Some(
            month_from_name(name)
                .ok_or_else(|| bad_request(format!("unknown month \"{name}\"")))?
                .name(),
        ),
        None => None,
    };

    let records = state
        .run
        .records
        .iter()
        .enumerate()
        .filter(|(i, _)| (from..=to).contains(&(i + 1)))
        .filter(|(_, r)| month.is_none_or(|m| r.month == m))
        .map(|(_, r)| r.clone())
        .collect();

    Ok(Json(records))
}

/// `GET /correlation` → 200 + `CorrelationMatrix` JSON (null where undefined)
pub async fn get_correlation(State(state): State<Arc<AppState>>) -> Json<CorrelationMatrix> {
    Json(correlation_matrix(&state.run.records))
}

/// `GET /formula` → 200 + `FormulaResponse` JSON
pub async fn get_formula(State(state): State<Arc<AppState>>) -> Json<FormulaResponse> {
    let season = state.run.season;
    Json(FormulaResponse {
        season,
        coefficients: Coefficients::for_season(season),
        description: formula_description(season),
    })
}

/// `GET /export.csv` → 200 + CSV attachment
pub async fn get_csv(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match to_csv_string(&state.run.records) {
        Ok(body) => Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", state.run.csv_file_name()),
                ),
            ],
            body,
        )),
        Err(e) => {
            warn!("CSV export failed: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("CSV export failed: {e}"),
                }),
            ))
        }
    }
}

/// `GET /seasons` → 200 + `Vec<SeasonProfile>` JSON
pub async fn get_seasons() -> Json<Vec<SeasonProfile>> {
    Json(Season::ALL.iter().map(|s| s.profile()).collect())
}
