use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::types::{MachineInput, MachineResponse};
use crate::common::AppState;
use crate::entity::{machine_calibrations, machine_maintenances, machines};
use crate::error::{AppError, AppResult};
use crate::services::due::MAX_INTERVAL_YEARS;

fn validate_machine_input(input: &MachineInput, today: NaiveDate) -> AppResult<()> {
    if input.serial_number.trim().is_empty() {
        return Err(AppError::Validation(
            "serial_number must not be blank".to_string(),
        ));
    }
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be blank".to_string()));
    }
    if !(1..=MAX_INTERVAL_YEARS).contains(&input.calibration_interval) {
        return Err(AppError::Validation(format!(
            "calibration_interval must be between 1 and {MAX_INTERVAL_YEARS} years"
        )));
    }
    if !(1..=MAX_INTERVAL_YEARS).contains(&input.maintenance_interval) {
        return Err(AppError::Validation(format!(
            "maintenance_interval must be between 1 and {MAX_INTERVAL_YEARS} years"
        )));
    }
    if input.last_calibration_date.is_some_and(|d| d > today) {
        return Err(AppError::Validation(
            "last_calibration_date must not be in the future".to_string(),
        ));
    }
    if input.last_maintenance_date.is_some_and(|d| d > today) {
        return Err(AppError::Validation(
            "last_maintenance_date must not be in the future".to_string(),
        ));
    }
    Ok(())
}

/// List all machines
#[utoipa::path(
    get,
    path = "/api/machines",
    responses(
        (status = 200, description = "Machines retrieved successfully", body = Vec<MachineResponse>),
    ),
    tag = "machines"
)]
pub async fn list_machines(State(state): State<AppState>) -> AppResult<Json<Vec<MachineResponse>>> {
    let machines_list = machines::Entity::find()
        .order_by_asc(machines::Column::SerialNumber)
        .all(&state.db)
        .await?;

    Ok(Json(
        machines_list.into_iter().map(MachineResponse::from).collect(),
    ))
}

/// Register a new machine
#[utoipa::path(
    post,
    path = "/api/machines",
    request_body = MachineInput,
    responses(
        (status = 201, description = "Machine created", body = MachineResponse),
        (status = 400, description = "Invalid machine payload"),
    ),
    tag = "machines"
)]
pub async fn create_machine(
    State(state): State<AppState>,
    Json(input): Json<MachineInput>,
) -> AppResult<(StatusCode, Json<MachineResponse>)> {
    validate_machine_input(&input, Utc::now().date_naive())?;

    let machine = machines::ActiveModel {
        serial_number: Set(input.serial_number.trim().to_string()),
        name: Set(input.name.trim().to_string()),
        brand: Set(input.brand),
        model: Set(input.model),
        measurement_range: Set(input.measurement_range),
        last_calibration_date: Set(input.last_calibration_date),
        calibration_org_id: Set(input.calibration_org_id),
        calibration_interval: Set(input.calibration_interval),
        last_maintenance_date: Set(input.last_maintenance_date),
        maintenance_org_id: Set(input.maintenance_org_id),
        maintenance_interval: Set(input.maintenance_interval),
        created_at: Set(Some(Utc::now().into())),
        updated_at: Set(Some(Utc::now().into())),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(MachineResponse::from(machine))))
}

/// Get a specific machine by ID
#[utoipa::path(
    get,
    path = "/api/machines/{machine_id}",
    params(
        ("machine_id" = i32, Path, description = "Machine ID"),
    ),
    responses(
        (status = 200, description = "Machine retrieved successfully", body = MachineResponse),
        (status = 404, description = "Machine not found"),
    ),
    tag = "machines"
)]
pub async fn get_machine(
    State(state): State<AppState>,
    Path(machine_id): Path<i32>,
) -> AppResult<Json<MachineResponse>> {
    let machine = machines::Entity::find_by_id(machine_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Machine {machine_id} not found")))?;

    Ok(Json(MachineResponse::from(machine)))
}

/// Update a machine
#[utoipa::path(
    put,
    path = "/api/machines/{machine_id}",
    params(
        ("machine_id" = i32, Path, description = "Machine ID"),
    ),
    request_body = MachineInput,
    responses(
        (status = 200, description = "Machine updated", body = MachineResponse),
        (status = 400, description = "Invalid machine payload"),
        (status = 404, description = "Machine not found"),
    ),
    tag = "machines"
)]
pub async fn update_machine(
    State(state): State<AppState>,
    Path(machine_id): Path<i32>,
    Json(input): Json<MachineInput>,
) -> AppResult<Json<MachineResponse>> {
    validate_machine_input(&input, Utc::now().date_naive())?;

    let machine = machines::Entity::find_by_id(machine_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Machine {machine_id} not found")))?;

    let mut machine: machines::ActiveModel = machine.into();
    machine.serial_number = Set(input.serial_number.trim().to_string());
    machine.name = Set(input.name.trim().to_string());
    machine.brand = Set(input.brand);
    machine.model = Set(input.model);
    machine.measurement_range = Set(input.measurement_range);
    machine.last_calibration_date = Set(input.last_calibration_date);
    machine.calibration_org_id = Set(input.calibration_org_id);
    machine.calibration_interval = Set(input.calibration_interval);
    machine.last_maintenance_date = Set(input.last_maintenance_date);
    machine.maintenance_org_id = Set(input.maintenance_org_id);
    machine.maintenance_interval = Set(input.maintenance_interval);
    machine.updated_at = Set(Some(Utc::now().into()));
    let machine = machine.update(&state.db).await?;

    Ok(Json(MachineResponse::from(machine)))
}

/// Delete a machine
///
/// Machines with recorded service history cannot be deleted; the history is
/// append-only.
#[utoipa::path(
    delete,
    path = "/api/machines/{machine_id}",
    params(
        ("machine_id" = i32, Path, description = "Machine ID"),
    ),
    responses(
        (status = 204, description = "Machine deleted"),
        (status = 400, description = "Machine has recorded service events"),
        (status = 404, description = "Machine not found"),
    ),
    tag = "machines"
)]
pub async fn delete_machine(
    State(state): State<AppState>,
    Path(machine_id): Path<i32>,
) -> AppResult<StatusCode> {
    let machine = machines::Entity::find_by_id(machine_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Machine {machine_id} not found")))?;

    let calibration_count = machine_calibrations::Entity::find()
        .filter(machine_calibrations::Column::MachineId.eq(machine.id))
        .count(&state.db)
        .await?;
    let maintenance_count = machine_maintenances::Entity::find()
        .filter(machine_maintenances::Column::MachineId.eq(machine.id))
        .count(&state.db)
        .await?;
    if calibration_count + maintenance_count > 0 {
        return Err(AppError::Validation(
            "machine has recorded service events and cannot be deleted".to_string(),
        ));
    }

    machines::Entity::delete_by_id(machine.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn input() -> MachineInput {
        MachineInput {
            serial_number: "SN-1000".to_string(),
            name: "Analytical balance".to_string(),
            brand: None,
            model: None,
            measurement_range: None,
            last_calibration_date: Some(d(2026, 6, 1)),
            calibration_org_id: None,
            calibration_interval: 1,
            last_maintenance_date: None,
            maintenance_org_id: None,
            maintenance_interval: 2,
        }
    }

    fn rule(result: AppResult<()>) -> String {
        match result.unwrap_err() {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_a_complete_machine() {
        assert!(validate_machine_input(&input(), d(2026, 8, 28)).is_ok());
    }

    #[test]
    fn blank_serial_and_name_are_rejected() {
        let mut bad = input();
        bad.serial_number = "   ".to_string();
        assert!(rule(validate_machine_input(&bad, d(2026, 8, 28))).contains("serial_number"));

        let mut bad = input();
        bad.name = String::new();
        assert!(rule(validate_machine_input(&bad, d(2026, 8, 28))).contains("name"));
    }

    #[test]
    fn intervals_must_stay_within_one_to_one_hundred_years() {
        let today = d(2026, 8, 28);

        let mut bad = input();
        bad.calibration_interval = 0;
        assert!(rule(validate_machine_input(&bad, today)).contains("calibration_interval"));

        // A runaway interval must be rejected here; past this gate it would
        // flow into the due-date arithmetic on every alert request.
        let mut bad = input();
        bad.calibration_interval = i32::MAX;
        assert!(rule(validate_machine_input(&bad, today)).contains("calibration_interval"));

        let mut bad = input();
        bad.maintenance_interval = 101;
        assert!(rule(validate_machine_input(&bad, today)).contains("maintenance_interval"));

        let mut ok = input();
        ok.calibration_interval = 100;
        ok.maintenance_interval = 100;
        assert!(validate_machine_input(&ok, today).is_ok());
    }

    #[test]
    fn future_last_service_dates_are_rejected() {
        let today = d(2026, 8, 28);

        let mut bad = input();
        bad.last_calibration_date = Some(d(2026, 8, 29));
        assert!(rule(validate_machine_input(&bad, today)).contains("last_calibration_date"));

        let mut bad = input();
        bad.last_maintenance_date = Some(d(2027, 1, 1));
        assert!(rule(validate_machine_input(&bad, today)).contains("last_maintenance_date"));

        // Today itself is fine.
        let mut ok = input();
        ok.last_calibration_date = Some(today);
        assert!(validate_machine_input(&ok, today).is_ok());
    }
}
