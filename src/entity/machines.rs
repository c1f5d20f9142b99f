use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "machines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub serial_number: String,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub measurement_range: Option<String>,
    pub last_calibration_date: Option<Date>,
    pub calibration_org_id: Option<i32>,
    pub calibration_interval: i32,
    pub last_maintenance_date: Option<Date>,
    pub maintenance_org_id: Option<i32>,
    pub maintenance_interval: i32,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::machine_calibrations::Entity")]
    MachineCalibrations,
    #[sea_orm(has_many = "super::machine_maintenances::Entity")]
    MachineMaintenances,
}

impl Related<super::machine_calibrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MachineCalibrations.def()
    }
}

impl Related<super::machine_maintenances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MachineMaintenances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
