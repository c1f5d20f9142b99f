//! Shared test setup: in-memory sqlite with the real migration applied, plus
//! seed helpers for machines, orgs, and history rows.

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use labcal::entity::{
    calibration_orgs, machine_calibrations, machine_maintenances, machines, maintenance_orgs,
};

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct MachineSeed<'a> {
    pub serial: &'a str,
    pub last_calibration_date: Option<NaiveDate>,
    pub calibration_org_id: Option<i32>,
    pub calibration_interval: i32,
    pub last_maintenance_date: Option<NaiveDate>,
    pub maintenance_org_id: Option<i32>,
    pub maintenance_interval: i32,
}

impl Default for MachineSeed<'_> {
    fn default() -> Self {
        Self {
            serial: "SN-0001",
            last_calibration_date: None,
            calibration_org_id: None,
            calibration_interval: 1,
            last_maintenance_date: None,
            maintenance_org_id: None,
            maintenance_interval: 1,
        }
    }
}

pub async fn insert_machine(db: &DatabaseConnection, seed: MachineSeed<'_>) -> machines::Model {
    machines::ActiveModel {
        serial_number: Set(seed.serial.to_string()),
        name: Set(format!("Machine {}", seed.serial)),
        brand: Set(None),
        model: Set(None),
        measurement_range: Set(None),
        last_calibration_date: Set(seed.last_calibration_date),
        calibration_org_id: Set(seed.calibration_org_id),
        calibration_interval: Set(seed.calibration_interval),
        last_maintenance_date: Set(seed.last_maintenance_date),
        maintenance_org_id: Set(seed.maintenance_org_id),
        maintenance_interval: Set(seed.maintenance_interval),
        created_at: Set(Some(Utc::now().into())),
        updated_at: Set(Some(Utc::now().into())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert machine")
}

pub async fn insert_calibration_org(db: &DatabaseConnection, name: &str) -> calibration_orgs::Model {
    calibration_orgs::ActiveModel {
        name: Set(name.to_string()),
        contact_name: Set("Contact".to_string()),
        phone: Set("+41 21 000 00 00".to_string()),
        email: Set(None),
        created_at: Set(Some(Utc::now().into())),
        updated_at: Set(Some(Utc::now().into())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert calibration org")
}

pub async fn insert_maintenance_org(db: &DatabaseConnection, name: &str) -> maintenance_orgs::Model {
    maintenance_orgs::ActiveModel {
        name: Set(name.to_string()),
        contact_name: Set("Contact".to_string()),
        phone: Set("+41 21 000 00 00".to_string()),
        email: Set(None),
        created_at: Set(Some(Utc::now().into())),
        updated_at: Set(Some(Utc::now().into())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert maintenance org")
}

pub async fn insert_calibration_event(
    db: &DatabaseConnection,
    machine_id: i32,
    org_id: i32,
    date: NaiveDate,
) -> machine_calibrations::Model {
    machine_calibrations::ActiveModel {
        machine_id: Set(machine_id),
        org_id: Set(org_id),
        calibrated_by: Set("Tester".to_string()),
        notes: Set(None),
        calibration_date: Set(date),
        created_at: Set(Some(Utc::now().into())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert calibration event")
}

pub async fn insert_maintenance_event(
    db: &DatabaseConnection,
    machine_id: i32,
    org_id: i32,
    date: NaiveDate,
) -> machine_maintenances::Model {
    machine_maintenances::ActiveModel {
        machine_id: Set(machine_id),
        org_id: Set(org_id),
        maintained_by: Set("Tester".to_string()),
        notes: Set(None),
        maintenance_date: Set(date),
        created_at: Set(Some(Utc::now().into())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert maintenance event")
}
