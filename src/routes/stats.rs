use axum::{Json, extract::State};
use chrono::Utc;

use crate::common::AppState;
use crate::error::AppResult;
use crate::services::stats::{Stats, get_calibration_stats, get_maintenance_stats};

/// Calibration history statistics
#[utoipa::path(
    get,
    path = "/api/stats/calibration",
    responses(
        (status = 200, description = "Calibration statistics computed", body = Stats),
    ),
    tag = "stats"
)]
pub async fn calibration_stats(State(state): State<AppState>) -> AppResult<Json<Stats>> {
    let stats = get_calibration_stats(&state.db, Utc::now().date_naive()).await?;
    Ok(Json(stats))
}

/// Maintenance history statistics
#[utoipa::path(
    get,
    path = "/api/stats/maintenance",
    responses(
        (status = 200, description = "Maintenance statistics computed", body = Stats),
    ),
    tag = "stats"
)]
pub async fn maintenance_stats(State(state): State<AppState>) -> AppResult<Json<Stats>> {
    let stats = get_maintenance_stats(&state.db, Utc::now().date_naive()).await?;
    Ok(Json(stats))
}
