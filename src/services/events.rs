use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::Deserialize;
use utoipa::ToSchema;

use super::due::add_years_clamped;
use crate::entity::{
    calibration_orgs, machine_calibrations, machine_maintenances, machines, maintenance_orgs,
};
use crate::error::{AppError, AppResult};

/// Oldest service date accepted when recording an event.
pub const MAX_EVENT_AGE_YEARS: i32 = 10;

/// Input for recording one service event on either track.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ServiceEventInput {
    pub machine_id: i32,
    pub org_id: i32,
    pub performed_by: String,
    pub notes: Option<String>,
    pub service_date: Option<NaiveDate>,
}

/// Fail-fast business-rule validation; the first violated rule wins and its
/// message names the rule. No persistence happens before this passes.
fn validate(
    input: &ServiceEventInput,
    today: NaiveDate,
    performer_field: &str,
) -> Result<NaiveDate, AppError> {
    if input.machine_id <= 0 {
        return Err(AppError::Validation(
            "machine reference must be a positive id".to_string(),
        ));
    }
    if input.org_id <= 0 {
        return Err(AppError::Validation(
            "organization reference must be a positive id".to_string(),
        ));
    }
    let Some(date) = input.service_date else {
        return Err(AppError::Validation("service date is required".to_string()));
    };
    if input.performed_by.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "{performer_field} must not be blank"
        )));
    }
    if date > today {
        return Err(AppError::Validation(
            "service date must not be in the future".to_string(),
        ));
    }
    if add_years_clamped(today, -MAX_EVENT_AGE_YEARS).is_some_and(|cutoff| date < cutoff) {
        return Err(AppError::Validation(format!(
            "service date must not be more than {MAX_EVENT_AGE_YEARS} years old"
        )));
    }
    Ok(date)
}

/// Record a calibration event: insert the history row and update the machine's
/// `last_calibration_date`/`calibration_org_id` in one transaction. Any error
/// path drops the transaction, which rolls both writes back.
///
/// Concurrent recordings for the same machine are last-write-wins on the
/// machine's last-service fields; the history rows themselves are append-only
/// and never conflict.
pub async fn record_calibration(
    db: &DatabaseConnection,
    input: ServiceEventInput,
    today: NaiveDate,
) -> AppResult<machine_calibrations::Model> {
    let date = validate(&input, today, "calibrated_by")?;

    let txn = db.begin().await?;

    let machine = machines::Entity::find_by_id(input.machine_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Machine {} not found", input.machine_id)))?;

    let event = machine_calibrations::ActiveModel {
        machine_id: Set(machine.id),
        org_id: Set(input.org_id),
        calibrated_by: Set(input.performed_by.trim().to_string()),
        notes: Set(input.notes),
        calibration_date: Set(date),
        created_at: Set(Some(Utc::now().into())),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    // The org is resolved inside the transaction, after the history insert, so
    // a dangling org reference rolls the insert back as well.
    let org = calibration_orgs::Entity::find_by_id(input.org_id)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Calibration org {} not found", input.org_id))
        })?;

    let mut machine: machines::ActiveModel = machine.into();
    machine.last_calibration_date = Set(Some(date));
    machine.calibration_org_id = Set(Some(org.id));
    machine.updated_at = Set(Some(Utc::now().into()));
    machine.update(&txn).await?;

    txn.commit().await?;
    Ok(event)
}

/// Maintenance-track twin of [`record_calibration`].
pub async fn record_maintenance(
    db: &DatabaseConnection,
    input: ServiceEventInput,
    today: NaiveDate,
) -> AppResult<machine_maintenances::Model> {
    let date = validate(&input, today, "maintained_by")?;

    let txn = db.begin().await?;

    let machine = machines::Entity::find_by_id(input.machine_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Machine {} not found", input.machine_id)))?;

    let event = machine_maintenances::ActiveModel {
        machine_id: Set(machine.id),
        org_id: Set(input.org_id),
        maintained_by: Set(input.performed_by.trim().to_string()),
        notes: Set(input.notes),
        maintenance_date: Set(date),
        created_at: Set(Some(Utc::now().into())),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let org = maintenance_orgs::Entity::find_by_id(input.org_id)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Maintenance org {} not found", input.org_id))
        })?;

    let mut machine: machines::ActiveModel = machine.into();
    machine.last_maintenance_date = Set(Some(date));
    machine.maintenance_org_id = Set(Some(org.id));
    machine.updated_at = Set(Some(Utc::now().into()));
    machine.update(&txn).await?;

    txn.commit().await?;
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn input() -> ServiceEventInput {
        ServiceEventInput {
            machine_id: 1,
            org_id: 1,
            performed_by: "J. Meier".to_string(),
            notes: None,
            service_date: Some(d(2026, 8, 1)),
        }
    }

    fn rule(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rules_fire_in_declared_order() {
        let today = d(2026, 8, 28);

        // Everything invalid at once: machine reference is reported first.
        let all_bad = ServiceEventInput {
            machine_id: 0,
            org_id: -1,
            performed_by: "  ".to_string(),
            notes: None,
            service_date: None,
        };
        assert!(rule(validate(&all_bad, today, "calibrated_by").unwrap_err()).contains("machine"));

        let mut next = all_bad.clone();
        next.machine_id = 1;
        assert!(
            rule(validate(&next, today, "calibrated_by").unwrap_err()).contains("organization")
        );

        next.org_id = 1;
        assert!(
            rule(validate(&next, today, "calibrated_by").unwrap_err()).contains("date is required")
        );

        next.service_date = Some(d(2026, 8, 1));
        assert!(rule(validate(&next, today, "calibrated_by").unwrap_err()).contains("blank"));
    }

    #[test]
    fn blank_performer_is_rejected() {
        let today = d(2026, 8, 28);
        let mut bad = input();
        bad.performed_by = "".to_string();
        let msg = rule(validate(&bad, today, "calibrated_by").unwrap_err());
        assert!(msg.contains("calibrated_by"));
    }

    #[test]
    fn future_date_is_rejected() {
        let today = d(2026, 8, 28);
        let mut bad = input();
        bad.service_date = Some(d(2026, 8, 29));
        let msg = rule(validate(&bad, today, "maintained_by").unwrap_err());
        assert!(msg.contains("future"));
    }

    #[test]
    fn dates_older_than_ten_years_are_rejected() {
        let today = d(2026, 8, 28);
        let mut bad = input();
        bad.service_date = Some(d(2015, 8, 28));
        let msg = rule(validate(&bad, today, "calibrated_by").unwrap_err());
        assert!(msg.contains("10 years"));

        // Exactly ten years ago is still allowed.
        let mut ok = input();
        ok.service_date = Some(d(2016, 8, 28));
        assert_eq!(validate(&ok, today, "calibrated_by").unwrap(), d(2016, 8, 28));
    }

    #[test]
    fn performer_is_trimmed_not_rejected_for_padding() {
        let today = d(2026, 8, 28);
        let mut padded = input();
        padded.performed_by = "  J. Meier  ".to_string();
        assert!(validate(&padded, today, "calibrated_by").is_ok());
    }
}
