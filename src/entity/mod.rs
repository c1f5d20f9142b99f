pub mod calibration_orgs;
pub mod machine_calibrations;
pub mod machine_maintenances;
pub mod machines;
pub mod maintenance_orgs;
