use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{calibration_orgs, maintenance_orgs};

/// Service-organization create/update payload, shared by both org kinds.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrgInput {
    pub name: String,
    pub contact_name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// Service-organization response
#[derive(Debug, Serialize, ToSchema)]
pub struct OrgResponse {
    pub id: i32,
    pub name: String,
    pub contact_name: String,
    pub phone: String,
    pub email: Option<String>,
}

impl From<calibration_orgs::Model> for OrgResponse {
    fn from(o: calibration_orgs::Model) -> Self {
        Self {
            id: o.id,
            name: o.name,
            contact_name: o.contact_name,
            phone: o.phone,
            email: o.email,
        }
    }
}

impl From<maintenance_orgs::Model> for OrgResponse {
    fn from(o: maintenance_orgs::Model) -> Self {
        Self {
            id: o.id,
            name: o.name,
            contact_name: o.contact_name,
            phone: o.phone,
            email: o.email,
        }
    }
}
