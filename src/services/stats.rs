use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Months, NaiveDate};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::ServiceTrack;
use crate::entity::{
    calibration_orgs, machine_calibrations, machine_maintenances, maintenance_orgs,
};
use crate::error::AppResult;

/// How many organizations the top-orgs ranking returns.
const TOP_ORGS_LIMIT: u64 = 5;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrgEventCount {
    pub org_id: i32,
    /// Missing when the org row was deleted after events referenced it.
    pub org_name: Option<String>,
    pub events: i64,
}

#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthCount {
    /// `YYYY-MM`
    pub month: String,
    pub events: u64,
}

/// Read-only summary of one track's service-event history.
#[derive(Debug, Serialize, ToSchema)]
pub struct Stats {
    pub track: ServiceTrack,
    pub total_events: u64,
    pub this_month_events: u64,
    pub this_year_events: u64,
    /// Top 5 orgs by event count, descending; ties broken by org id ascending.
    pub top_orgs: Vec<OrgEventCount>,
    /// Trailing 12 months, most recent first. Months with zero events are
    /// omitted rather than zero-filled.
    pub monthly_histogram: Vec<MonthCount>,
}

#[derive(FromQueryResult)]
struct OrgCountRow {
    org_id: i32,
    events: i64,
}

#[derive(FromQueryResult)]
struct EventDateRow {
    date: NaiveDate,
}

pub async fn get_calibration_stats(db: &DatabaseConnection, today: NaiveDate) -> AppResult<Stats> {
    let total_events = machine_calibrations::Entity::find().count(db).await?;

    let org_rows = machine_calibrations::Entity::find()
        .select_only()
        .column(machine_calibrations::Column::OrgId)
        .column_as(machine_calibrations::Column::Id.count(), "events")
        .group_by(machine_calibrations::Column::OrgId)
        .order_by_desc(machine_calibrations::Column::Id.count())
        .order_by_asc(machine_calibrations::Column::OrgId)
        .limit(TOP_ORGS_LIMIT)
        .into_model::<OrgCountRow>()
        .all(db)
        .await?;

    let org_ids: Vec<i32> = org_rows.iter().map(|r| r.org_id).collect();
    let org_names: HashMap<i32, String> = calibration_orgs::Entity::find()
        .filter(calibration_orgs::Column::Id.is_in(org_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|o| (o.id, o.name))
        .collect();

    let dates: Vec<NaiveDate> = machine_calibrations::Entity::find()
        .select_only()
        .column_as(machine_calibrations::Column::CalibrationDate, "date")
        .filter(machine_calibrations::Column::CalibrationDate.gte(histogram_window_start(today)))
        .into_model::<EventDateRow>()
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.date)
        .collect();

    Ok(assemble_stats(
        ServiceTrack::Calibration,
        total_events,
        org_rows,
        &org_names,
        &dates,
        today,
    ))
}

pub async fn get_maintenance_stats(db: &DatabaseConnection, today: NaiveDate) -> AppResult<Stats> {
    let total_events = machine_maintenances::Entity::find().count(db).await?;

    let org_rows = machine_maintenances::Entity::find()
        .select_only()
        .column(machine_maintenances::Column::OrgId)
        .column_as(machine_maintenances::Column::Id.count(), "events")
        .group_by(machine_maintenances::Column::OrgId)
        .order_by_desc(machine_maintenances::Column::Id.count())
        .order_by_asc(machine_maintenances::Column::OrgId)
        .limit(TOP_ORGS_LIMIT)
        .into_model::<OrgCountRow>()
        .all(db)
        .await?;

    let org_ids: Vec<i32> = org_rows.iter().map(|r| r.org_id).collect();
    let org_names: HashMap<i32, String> = maintenance_orgs::Entity::find()
        .filter(maintenance_orgs::Column::Id.is_in(org_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|o| (o.id, o.name))
        .collect();

    let dates: Vec<NaiveDate> = machine_maintenances::Entity::find()
        .select_only()
        .column_as(machine_maintenances::Column::MaintenanceDate, "date")
        .filter(machine_maintenances::Column::MaintenanceDate.gte(histogram_window_start(today)))
        .into_model::<EventDateRow>()
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.date)
        .collect();

    Ok(assemble_stats(
        ServiceTrack::Maintenance,
        total_events,
        org_rows,
        &org_names,
        &dates,
        today,
    ))
}

/// First day of the month 11 months back: one fetch of this window covers the
/// trailing-12-month histogram and the current month/year counts.
fn histogram_window_start(today: NaiveDate) -> NaiveDate {
    let month_start = today.with_day(1).unwrap_or(today);
    month_start
        .checked_sub_months(Months::new(11))
        .unwrap_or(month_start)
}

/// Month bucketing and calendar filtering happen here, in application code,
/// so the SQL stays identical across the sqlite and postgres backends.
fn assemble_stats(
    track: ServiceTrack,
    total_events: u64,
    org_rows: Vec<OrgCountRow>,
    org_names: &HashMap<i32, String>,
    dates: &[NaiveDate],
    today: NaiveDate,
) -> Stats {
    let mut this_month_events = 0;
    let mut this_year_events = 0;
    let mut buckets: BTreeMap<(i32, u32), u64> = BTreeMap::new();

    for date in dates {
        if date.year() == today.year() {
            this_year_events += 1;
            if date.month() == today.month() {
                this_month_events += 1;
            }
        }
        *buckets.entry((date.year(), date.month())).or_insert(0) += 1;
    }

    let monthly_histogram = buckets
        .into_iter()
        .rev()
        .map(|((year, month), events)| MonthCount {
            month: format!("{year:04}-{month:02}"),
            events,
        })
        .collect();

    let top_orgs = org_rows
        .into_iter()
        .map(|r| OrgEventCount {
            org_id: r.org_id,
            org_name: org_names.get(&r.org_id).cloned(),
            events: r.events,
        })
        .collect();

    Stats {
        track,
        total_events,
        this_month_events,
        this_year_events,
        top_orgs,
        monthly_histogram,
    }
}
