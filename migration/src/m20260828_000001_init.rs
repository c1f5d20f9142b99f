use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Schema is built with portable schema-builder constructs only, so the same
// migration runs against both the embedded sqlite backend and postgres.
// Timestamps are written by application code for the same reason.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== CALIBRATION ORGS ==========
        manager
            .create_table(
                Table::create()
                    .table(CalibrationOrgs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CalibrationOrgs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CalibrationOrgs::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(CalibrationOrgs::ContactName)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CalibrationOrgs::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(CalibrationOrgs::Email).string_len(128))
                    .col(ColumnDef::new(CalibrationOrgs::CreatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CalibrationOrgs::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // ========== MAINTENANCE ORGS ==========
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceOrgs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaintenanceOrgs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MaintenanceOrgs::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(MaintenanceOrgs::ContactName)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaintenanceOrgs::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(MaintenanceOrgs::Email).string_len(128))
                    .col(ColumnDef::new(MaintenanceOrgs::CreatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(MaintenanceOrgs::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // ========== MACHINES ==========
        manager
            .create_table(
                Table::create()
                    .table(Machines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Machines::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Machines::SerialNumber)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Machines::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Machines::Brand).string_len(64))
                    .col(ColumnDef::new(Machines::Model).string_len(64))
                    .col(ColumnDef::new(Machines::MeasurementRange).string_len(64))
                    .col(ColumnDef::new(Machines::LastCalibrationDate).date())
                    .col(ColumnDef::new(Machines::CalibrationOrgId).integer())
                    .col(ColumnDef::new(Machines::CalibrationInterval).integer().not_null())
                    .col(ColumnDef::new(Machines::LastMaintenanceDate).date())
                    .col(ColumnDef::new(Machines::MaintenanceOrgId).integer())
                    .col(ColumnDef::new(Machines::MaintenanceInterval).integer().not_null())
                    .col(ColumnDef::new(Machines::CreatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Machines::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // ========== MACHINE CALIBRATIONS (append-only history) ==========
        // No FK on org_id: the org reference is resolved inside the recording
        // transaction, after the history insert, so a dangling reference rolls
        // the whole event back.
        manager
            .create_table(
                Table::create()
                    .table(MachineCalibrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MachineCalibrations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MachineCalibrations::MachineId).integer().not_null())
                    .col(ColumnDef::new(MachineCalibrations::OrgId).integer().not_null())
                    .col(
                        ColumnDef::new(MachineCalibrations::CalibratedBy)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MachineCalibrations::Notes).text())
                    .col(ColumnDef::new(MachineCalibrations::CalibrationDate).date().not_null())
                    .col(ColumnDef::new(MachineCalibrations::CreatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_machine_calibrations_machine")
                            .from(MachineCalibrations::Table, MachineCalibrations::MachineId)
                            .to(Machines::Table, Machines::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_machine_calibrations_machine")
                    .table(MachineCalibrations::Table)
                    .col(MachineCalibrations::MachineId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_machine_calibrations_date")
                    .table(MachineCalibrations::Table)
                    .col(MachineCalibrations::CalibrationDate)
                    .to_owned(),
            )
            .await?;

        // ========== MACHINE MAINTENANCES (append-only history) ==========
        manager
            .create_table(
                Table::create()
                    .table(MachineMaintenances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MachineMaintenances::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MachineMaintenances::MachineId).integer().not_null())
                    .col(ColumnDef::new(MachineMaintenances::OrgId).integer().not_null())
                    .col(
                        ColumnDef::new(MachineMaintenances::MaintainedBy)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MachineMaintenances::Notes).text())
                    .col(ColumnDef::new(MachineMaintenances::MaintenanceDate).date().not_null())
                    .col(ColumnDef::new(MachineMaintenances::CreatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_machine_maintenances_machine")
                            .from(MachineMaintenances::Table, MachineMaintenances::MachineId)
                            .to(Machines::Table, Machines::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_machine_maintenances_machine")
                    .table(MachineMaintenances::Table)
                    .col(MachineMaintenances::MachineId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_machine_maintenances_date")
                    .table(MachineMaintenances::Table)
                    .col(MachineMaintenances::MaintenanceDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of dependencies
        manager
            .drop_table(
                Table::drop()
                    .table(MachineMaintenances::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(MachineCalibrations::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Machines::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(MaintenanceOrgs::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(CalibrationOrgs::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Machines {
    Table,
    Id,
    SerialNumber,
    Name,
    Brand,
    Model,
    MeasurementRange,
    LastCalibrationDate,
    CalibrationOrgId,
    CalibrationInterval,
    LastMaintenanceDate,
    MaintenanceOrgId,
    MaintenanceInterval,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CalibrationOrgs {
    Table,
    Id,
    Name,
    ContactName,
    Phone,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MaintenanceOrgs {
    Table,
    Id,
    Name,
    ContactName,
    Phone,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MachineCalibrations {
    Table,
    Id,
    MachineId,
    OrgId,
    CalibratedBy,
    Notes,
    CalibrationDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MachineMaintenances {
    Table,
    Id,
    MachineId,
    OrgId,
    MaintainedBy,
    Notes,
    MaintenanceDate,
    CreatedAt,
}
