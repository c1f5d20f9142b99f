mod handlers;
mod types;

pub use handlers::{
    create_calibration_org, create_maintenance_org, delete_calibration_org,
    delete_maintenance_org, get_calibration_org, get_maintenance_org, list_calibration_orgs,
    list_maintenance_orgs, update_calibration_org, update_maintenance_org,
};
pub use types::{OrgInput, OrgResponse};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_calibration_org, __path_create_maintenance_org, __path_delete_calibration_org,
    __path_delete_maintenance_org, __path_get_calibration_org, __path_get_maintenance_org,
    __path_list_calibration_orgs, __path_list_maintenance_orgs, __path_update_calibration_org,
    __path_update_maintenance_org,
};
