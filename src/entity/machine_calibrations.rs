use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only calibration history. Rows are only ever inserted; the parent
/// machine's `last_calibration_date`/`calibration_org_id` are updated in the
/// same transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "machine_calibrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub machine_id: i32,
    pub org_id: i32,
    pub calibrated_by: String,
    pub notes: Option<String>,
    pub calibration_date: Date,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::machines::Entity",
        from = "Column::MachineId",
        to = "super::machines::Column::Id"
    )]
    Machine,
}

impl Related<super::machines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Machine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
