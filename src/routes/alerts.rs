use axum::{Json, extract::State};
use chrono::Utc;

use crate::common::AppState;
use crate::error::AppResult;
use crate::services::ServiceTrack;
use crate::services::alerts::{AlertCounts, AlertSummary, get_alert_summary, get_alerts};

/// Full calibration alert list
///
/// Machines whose next calibration is past due or within 30 days, sorted
/// critical-first, most urgent first.
#[utoipa::path(
    get,
    path = "/api/alerts/calibration",
    responses(
        (status = 200, description = "Calibration alerts computed", body = AlertSummary),
    ),
    tag = "alerts"
)]
pub async fn calibration_alerts(State(state): State<AppState>) -> AppResult<Json<AlertSummary>> {
    let summary = get_alerts(
        &state.db,
        ServiceTrack::Calibration,
        Utc::now().date_naive(),
    )
    .await?;
    Ok(Json(summary))
}

/// Full maintenance alert list
#[utoipa::path(
    get,
    path = "/api/alerts/maintenance",
    responses(
        (status = 200, description = "Maintenance alerts computed", body = AlertSummary),
    ),
    tag = "alerts"
)]
pub async fn maintenance_alerts(State(state): State<AppState>) -> AppResult<Json<AlertSummary>> {
    let summary = get_alerts(
        &state.db,
        ServiceTrack::Maintenance,
        Utc::now().date_naive(),
    )
    .await?;
    Ok(Json(summary))
}

/// Lightweight alert counts across both tracks
///
/// Intended for high-frequency polling; no alert list or org contacts are
/// materialized.
#[utoipa::path(
    get,
    path = "/api/alerts/summary",
    responses(
        (status = 200, description = "Alert counts computed", body = AlertCounts),
    ),
    tag = "alerts"
)]
pub async fn alert_summary(State(state): State<AppState>) -> AppResult<Json<AlertCounts>> {
    let counts = get_alert_summary(&state.db, Utc::now().date_naive()).await?;
    Ok(Json(counts))
}
