use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::AppState;
use crate::entity::{machine_calibrations, machine_maintenances};
use crate::error::AppResult;
use crate::services::events::{ServiceEventInput, record_calibration, record_maintenance};

/// Recorded calibration event
#[derive(Debug, Serialize, ToSchema)]
pub struct CalibrationEventResponse {
    pub id: i32,
    pub machine_id: i32,
    pub org_id: i32,
    pub calibrated_by: String,
    pub notes: Option<String>,
    pub calibration_date: NaiveDate,
}

impl From<machine_calibrations::Model> for CalibrationEventResponse {
    fn from(e: machine_calibrations::Model) -> Self {
        Self {
            id: e.id,
            machine_id: e.machine_id,
            org_id: e.org_id,
            calibrated_by: e.calibrated_by,
            notes: e.notes,
            calibration_date: e.calibration_date,
        }
    }
}

/// Recorded maintenance event
#[derive(Debug, Serialize, ToSchema)]
pub struct MaintenanceEventResponse {
    pub id: i32,
    pub machine_id: i32,
    pub org_id: i32,
    pub maintained_by: String,
    pub notes: Option<String>,
    pub maintenance_date: NaiveDate,
}

impl From<machine_maintenances::Model> for MaintenanceEventResponse {
    fn from(e: machine_maintenances::Model) -> Self {
        Self {
            id: e.id,
            machine_id: e.machine_id,
            org_id: e.org_id,
            maintained_by: e.maintained_by,
            notes: e.notes,
            maintenance_date: e.maintenance_date,
        }
    }
}

/// Query parameters for service-event history endpoints
#[derive(Debug, Deserialize, IntoParams)]
pub struct EventsQuery {
    /// Filter by machine ID
    pub machine_id: Option<i32>,
}

/// List calibration history, most recent first
#[utoipa::path(
    get,
    path = "/api/calibrations",
    params(EventsQuery),
    responses(
        (status = 200, description = "Calibration events retrieved successfully", body = Vec<CalibrationEventResponse>),
    ),
    tag = "service-events"
)]
pub async fn list_calibrations(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> AppResult<Json<Vec<CalibrationEventResponse>>> {
    let mut db_query = machine_calibrations::Entity::find();

    if let Some(machine_id) = query.machine_id {
        db_query = db_query.filter(machine_calibrations::Column::MachineId.eq(machine_id));
    }

    let events = db_query
        .order_by_desc(machine_calibrations::Column::CalibrationDate)
        .order_by_desc(machine_calibrations::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(
        events.into_iter().map(CalibrationEventResponse::from).collect(),
    ))
}

/// Record a calibration event
///
/// Validates the payload, then inserts the history row and updates the
/// machine's last-calibration fields in a single transaction.
#[utoipa::path(
    post,
    path = "/api/calibrations",
    request_body = ServiceEventInput,
    responses(
        (status = 201, description = "Calibration recorded", body = CalibrationEventResponse),
        (status = 400, description = "Payload violates a business rule"),
        (status = 404, description = "Machine or organization not found"),
    ),
    tag = "service-events"
)]
pub async fn create_calibration(
    State(state): State<AppState>,
    Json(input): Json<ServiceEventInput>,
) -> AppResult<(StatusCode, Json<CalibrationEventResponse>)> {
    let event = record_calibration(&state.db, input, Utc::now().date_naive()).await?;
    Ok((
        StatusCode::CREATED,
        Json(CalibrationEventResponse::from(event)),
    ))
}

/// List maintenance history, most recent first
#[utoipa::path(
    get,
    path = "/api/maintenances",
    params(EventsQuery),
    responses(
        (status = 200, description = "Maintenance events retrieved successfully", body = Vec<MaintenanceEventResponse>),
    ),
    tag = "service-events"
)]
pub async fn list_maintenances(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> AppResult<Json<Vec<MaintenanceEventResponse>>> {
    let mut db_query = machine_maintenances::Entity::find();

    if let Some(machine_id) = query.machine_id {
        db_query = db_query.filter(machine_maintenances::Column::MachineId.eq(machine_id));
    }

    let events = db_query
        .order_by_desc(machine_maintenances::Column::MaintenanceDate)
        .order_by_desc(machine_maintenances::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(
        events.into_iter().map(MaintenanceEventResponse::from).collect(),
    ))
}

/// Record a maintenance event
#[utoipa::path(
    post,
    path = "/api/maintenances",
    request_body = ServiceEventInput,
    responses(
        (status = 201, description = "Maintenance recorded", body = MaintenanceEventResponse),
        (status = 400, description = "Payload violates a business rule"),
        (status = 404, description = "Machine or organization not found"),
    ),
    tag = "service-events"
)]
pub async fn create_maintenance(
    State(state): State<AppState>,
    Json(input): Json<ServiceEventInput>,
) -> AppResult<(StatusCode, Json<MaintenanceEventResponse>)> {
    let event = record_maintenance(&state.db, input, Utc::now().date_naive()).await?;
    Ok((
        StatusCode::CREATED,
        Json(MaintenanceEventResponse::from(event)),
    ))
}
