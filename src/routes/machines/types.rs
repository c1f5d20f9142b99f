use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::machines;

/// Machine create/update payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct MachineInput {
    pub serial_number: String,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub measurement_range: Option<String>,
    pub last_calibration_date: Option<NaiveDate>,
    pub calibration_org_id: Option<i32>,
    /// Calibration interval in whole years, between 1 and 100
    pub calibration_interval: i32,
    pub last_maintenance_date: Option<NaiveDate>,
    pub maintenance_org_id: Option<i32>,
    /// Maintenance interval in whole years, between 1 and 100
    pub maintenance_interval: i32,
}

/// Machine response
#[derive(Debug, Serialize, ToSchema)]
pub struct MachineResponse {
    pub id: i32,
    pub serial_number: String,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub measurement_range: Option<String>,
    pub last_calibration_date: Option<NaiveDate>,
    pub calibration_org_id: Option<i32>,
    pub calibration_interval: i32,
    pub last_maintenance_date: Option<NaiveDate>,
    pub maintenance_org_id: Option<i32>,
    pub maintenance_interval: i32,
}

impl From<machines::Model> for MachineResponse {
    fn from(m: machines::Model) -> Self {
        Self {
            id: m.id,
            serial_number: m.serial_number,
            name: m.name,
            brand: m.brand,
            model: m.model,
            measurement_range: m.measurement_range,
            last_calibration_date: m.last_calibration_date,
            calibration_org_id: m.calibration_org_id,
            calibration_interval: m.calibration_interval,
            last_maintenance_date: m.last_maintenance_date,
            maintenance_org_id: m.maintenance_org_id,
            maintenance_interval: m.maintenance_interval,
        }
    }
}
