use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, EntityTrait, FromQueryResult, QueryOrder, QuerySelect};
use serde::Serialize;
use utoipa::ToSchema;

use super::ServiceTrack;
use super::due::{DueStatus, compute_due_status};
use crate::entity::{calibration_orgs, machines, maintenance_orgs};
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Critical,
    Warning,
}

impl AlertPriority {
    fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Warning => 1,
        }
    }
}

/// Derived notification for one machine/track pair. Computed fresh on every
/// request; never persisted or cached.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Alert {
    pub machine_id: i32,
    pub serial_number: String,
    pub machine_name: String,
    pub track: ServiceTrack,
    pub status: DueStatus,
    pub priority: AlertPriority,
    pub next_due: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_overdue: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
    pub org_name: Option<String>,
    pub org_contact: Option<String>,
    pub org_phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertSummary {
    pub total_expired: usize,
    pub total_expiring_soon: usize,
    pub alerts: Vec<Alert>,
    pub has_alerts: bool,
}

/// Counts-only view for high-frequency polling; spans both tracks and skips
/// the org join entirely.
#[derive(Debug, Serialize, ToSchema)]
pub struct AlertCounts {
    pub total_expired: usize,
    pub total_expiring_soon: usize,
    pub has_alerts: bool,
}

/// Org contact fields, identical across the two org tables.
struct OrgContact {
    name: String,
    contact_name: String,
    phone: String,
}

/// Compute the full alert list for one track.
///
/// Every machine is classified with [`compute_due_status`]; machines due more
/// than 30 days out are filtered, not errors. Any data-access failure
/// propagates whole; no partial list is ever returned.
pub async fn get_alerts(
    db: &DatabaseConnection,
    track: ServiceTrack,
    today: NaiveDate,
) -> AppResult<AlertSummary> {
    let machines_list = machines::Entity::find()
        .order_by_asc(machines::Column::SerialNumber)
        .all(db)
        .await?;

    let orgs: HashMap<i32, OrgContact> = match track {
        ServiceTrack::Calibration => calibration_orgs::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|o| {
                (
                    o.id,
                    OrgContact {
                        name: o.name,
                        contact_name: o.contact_name,
                        phone: o.phone,
                    },
                )
            })
            .collect(),
        ServiceTrack::Maintenance => maintenance_orgs::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|o| {
                (
                    o.id,
                    OrgContact {
                        name: o.name,
                        contact_name: o.contact_name,
                        phone: o.phone,
                    },
                )
            })
            .collect(),
    };

    let mut alerts = Vec::new();
    for machine in machines_list {
        let (last_date, interval, org_id) = match track {
            ServiceTrack::Calibration => (
                machine.last_calibration_date,
                machine.calibration_interval,
                machine.calibration_org_id,
            ),
            ServiceTrack::Maintenance => (
                machine.last_maintenance_date,
                machine.maintenance_interval,
                machine.maintenance_org_id,
            ),
        };

        let due = compute_due_status(last_date, interval, today);
        let priority = match due.status {
            DueStatus::Expired => AlertPriority::Critical,
            DueStatus::ExpiringSoon => AlertPriority::Warning,
            DueStatus::Normal => continue,
        };

        let org = org_id.and_then(|id| orgs.get(&id));
        alerts.push(Alert {
            machine_id: machine.id,
            serial_number: machine.serial_number,
            machine_name: machine.name,
            track,
            status: due.status,
            priority,
            next_due: due.next_due,
            days_overdue: due.days_overdue,
            days_remaining: due.days_remaining,
            org_name: org.map(|o| o.name.clone()),
            org_contact: org.map(|o| o.contact_name.clone()),
            org_phone: org.map(|o| o.phone.clone()),
        });
    }

    sort_alerts(&mut alerts);

    let total_expired = alerts
        .iter()
        .filter(|a| a.status == DueStatus::Expired)
        .count();
    let total_expiring_soon = alerts.len() - total_expired;

    Ok(AlertSummary {
        total_expired,
        total_expiring_soon,
        has_alerts: !alerts.is_empty(),
        alerts,
    })
}

/// Critical before warning; among expired, most overdue first; among expiring,
/// soonest due first.
fn sort_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| match a.priority {
                AlertPriority::Critical => b.days_overdue.cmp(&a.days_overdue),
                AlertPriority::Warning => a.days_remaining.cmp(&b.days_remaining),
            })
    });
}

#[derive(FromQueryResult)]
struct DueColumns {
    last_calibration_date: Option<NaiveDate>,
    calibration_interval: i32,
    last_maintenance_date: Option<NaiveDate>,
    maintenance_interval: i32,
}

/// Counts-only summary across both tracks. Selects just the four due columns;
/// no alert list or org contacts are materialized.
pub async fn get_alert_summary(db: &DatabaseConnection, today: NaiveDate) -> AppResult<AlertCounts> {
    let rows = machines::Entity::find()
        .select_only()
        .column(machines::Column::LastCalibrationDate)
        .column(machines::Column::CalibrationInterval)
        .column(machines::Column::LastMaintenanceDate)
        .column(machines::Column::MaintenanceInterval)
        .into_model::<DueColumns>()
        .all(db)
        .await?;

    let mut total_expired = 0;
    let mut total_expiring_soon = 0;
    for row in rows {
        for (last_date, interval) in [
            (row.last_calibration_date, row.calibration_interval),
            (row.last_maintenance_date, row.maintenance_interval),
        ] {
            match compute_due_status(last_date, interval, today).status {
                DueStatus::Expired => total_expired += 1,
                DueStatus::ExpiringSoon => total_expiring_soon += 1,
                DueStatus::Normal => {}
            }
        }
    }

    Ok(AlertCounts {
        total_expired,
        total_expiring_soon,
        has_alerts: total_expired + total_expiring_soon > 0,
    })
}
