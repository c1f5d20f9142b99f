use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use super::types::{OrgInput, OrgResponse};
use crate::common::AppState;
use crate::entity::{calibration_orgs, maintenance_orgs};
use crate::error::{AppError, AppResult};

/// Minimal email shape check: one `@` with a non-empty local part and a
/// dotted, non-empty domain, and no whitespace.
fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

fn validate_org_input(input: &OrgInput) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be blank".to_string()));
    }
    if input.contact_name.trim().is_empty() {
        return Err(AppError::Validation(
            "contact_name must not be blank".to_string(),
        ));
    }
    if input.phone.trim().is_empty() {
        return Err(AppError::Validation("phone must not be blank".to_string()));
    }
    if let Some(email) = &input.email
        && !is_valid_email(email)
    {
        return Err(AppError::Validation(
            "email is not a valid address".to_string(),
        ));
    }
    Ok(())
}

/// List all calibration organizations
#[utoipa::path(
    get,
    path = "/api/calibration-orgs",
    responses(
        (status = 200, description = "Organizations retrieved successfully", body = Vec<OrgResponse>),
    ),
    tag = "orgs"
)]
pub async fn list_calibration_orgs(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<OrgResponse>>> {
    let orgs = calibration_orgs::Entity::find()
        .order_by_asc(calibration_orgs::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(orgs.into_iter().map(OrgResponse::from).collect()))
}

/// Create a calibration organization
#[utoipa::path(
    post,
    path = "/api/calibration-orgs",
    request_body = OrgInput,
    responses(
        (status = 201, description = "Organization created", body = OrgResponse),
        (status = 400, description = "Invalid organization payload"),
    ),
    tag = "orgs"
)]
pub async fn create_calibration_org(
    State(state): State<AppState>,
    Json(input): Json<OrgInput>,
) -> AppResult<(StatusCode, Json<OrgResponse>)> {
    validate_org_input(&input)?;

    let org = calibration_orgs::ActiveModel {
        name: Set(input.name.trim().to_string()),
        contact_name: Set(input.contact_name.trim().to_string()),
        phone: Set(input.phone.trim().to_string()),
        email: Set(input.email),
        created_at: Set(Some(Utc::now().into())),
        updated_at: Set(Some(Utc::now().into())),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(OrgResponse::from(org))))
}

/// Get a calibration organization by ID
#[utoipa::path(
    get,
    path = "/api/calibration-orgs/{org_id}",
    params(
        ("org_id" = i32, Path, description = "Organization ID"),
    ),
    responses(
        (status = 200, description = "Organization retrieved successfully", body = OrgResponse),
        (status = 404, description = "Organization not found"),
    ),
    tag = "orgs"
)]
pub async fn get_calibration_org(
    State(state): State<AppState>,
    Path(org_id): Path<i32>,
) -> AppResult<Json<OrgResponse>> {
    let org = calibration_orgs::Entity::find_by_id(org_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Calibration org {org_id} not found")))?;

    Ok(Json(OrgResponse::from(org)))
}

/// Update a calibration organization
#[utoipa::path(
    put,
    path = "/api/calibration-orgs/{org_id}",
    params(
        ("org_id" = i32, Path, description = "Organization ID"),
    ),
    request_body = OrgInput,
    responses(
        (status = 200, description = "Organization updated", body = OrgResponse),
        (status = 400, description = "Invalid organization payload"),
        (status = 404, description = "Organization not found"),
    ),
    tag = "orgs"
)]
pub async fn update_calibration_org(
    State(state): State<AppState>,
    Path(org_id): Path<i32>,
    Json(input): Json<OrgInput>,
) -> AppResult<Json<OrgResponse>> {
    validate_org_input(&input)?;

    let org = calibration_orgs::Entity::find_by_id(org_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Calibration org {org_id} not found")))?;

    let mut org: calibration_orgs::ActiveModel = org.into();
    org.name = Set(input.name.trim().to_string());
    org.contact_name = Set(input.contact_name.trim().to_string());
    org.phone = Set(input.phone.trim().to_string());
    org.email = Set(input.email);
    org.updated_at = Set(Some(Utc::now().into()));
    let org = org.update(&state.db).await?;

    Ok(Json(OrgResponse::from(org)))
}

/// Delete a calibration organization
#[utoipa::path(
    delete,
    path = "/api/calibration-orgs/{org_id}",
    params(
        ("org_id" = i32, Path, description = "Organization ID"),
    ),
    responses(
        (status = 204, description = "Organization deleted"),
        (status = 404, description = "Organization not found"),
    ),
    tag = "orgs"
)]
pub async fn delete_calibration_org(
    State(state): State<AppState>,
    Path(org_id): Path<i32>,
) -> AppResult<StatusCode> {
    let org = calibration_orgs::Entity::find_by_id(org_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Calibration org {org_id} not found")))?;

    calibration_orgs::Entity::delete_by_id(org.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List all maintenance organizations
#[utoipa::path(
    get,
    path = "/api/maintenance-orgs",
    responses(
        (status = 200, description = "Organizations retrieved successfully", body = Vec<OrgResponse>),
    ),
    tag = "orgs"
)]
pub async fn list_maintenance_orgs(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<OrgResponse>>> {
    let orgs = maintenance_orgs::Entity::find()
        .order_by_asc(maintenance_orgs::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(orgs.into_iter().map(OrgResponse::from).collect()))
}

/// Create a maintenance organization
#[utoipa::path(
    post,
    path = "/api/maintenance-orgs",
    request_body = OrgInput,
    responses(
        (status = 201, description = "Organization created", body = OrgResponse),
        (status = 400, description = "Invalid organization payload"),
    ),
    tag = "orgs"
)]
pub async fn create_maintenance_org(
    State(state): State<AppState>,
    Json(input): Json<OrgInput>,
) -> AppResult<(StatusCode, Json<OrgResponse>)> {
    validate_org_input(&input)?;

    let org = maintenance_orgs::ActiveModel {
        name: Set(input.name.trim().to_string()),
        contact_name: Set(input.contact_name.trim().to_string()),
        phone: Set(input.phone.trim().to_string()),
        email: Set(input.email),
        created_at: Set(Some(Utc::now().into())),
        updated_at: Set(Some(Utc::now().into())),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(OrgResponse::from(org))))
}

/// Get a maintenance organization by ID
#[utoipa::path(
    get,
    path = "/api/maintenance-orgs/{org_id}",
    params(
        ("org_id" = i32, Path, description = "Organization ID"),
    ),
    responses(
        (status = 200, description = "Organization retrieved successfully", body = OrgResponse),
        (status = 404, description = "Organization not found"),
    ),
    tag = "orgs"
)]
pub async fn get_maintenance_org(
    State(state): State<AppState>,
    Path(org_id): Path<i32>,
) -> AppResult<Json<OrgResponse>> {
    let org = maintenance_orgs::Entity::find_by_id(org_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance org {org_id} not found")))?;

    Ok(Json(OrgResponse::from(org)))
}

/// Update a maintenance organization
#[utoipa::path(
    put,
    path = "/api/maintenance-orgs/{org_id}",
    params(
        ("org_id" = i32, Path, description = "Organization ID"),
    ),
    request_body = OrgInput,
    responses(
        (status = 200, description = "Organization updated", body = OrgResponse),
        (status = 400, description = "Invalid organization payload"),
        (status = 404, description = "Organization not found"),
    ),
    tag = "orgs"
)]
pub async fn update_maintenance_org(
    State(state): State<AppState>,
    Path(org_id): Path<i32>,
    Json(input): Json<OrgInput>,
) -> AppResult<Json<OrgResponse>> {
    validate_org_input(&input)?;

    let org = maintenance_orgs::Entity::find_by_id(org_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance org {org_id} not found")))?;

    let mut org: maintenance_orgs::ActiveModel = org.into();
    org.name = Set(input.name.trim().to_string());
    org.contact_name = Set(input.contact_name.trim().to_string());
    org.phone = Set(input.phone.trim().to_string());
    org.email = Set(input.email);
    org.updated_at = Set(Some(Utc::now().into()));
    let org = org.update(&state.db).await?;

    Ok(Json(OrgResponse::from(org)))
}

/// Delete a maintenance organization
#[utoipa::path(
    delete,
    path = "/api/maintenance-orgs/{org_id}",
    params(
        ("org_id" = i32, Path, description = "Organization ID"),
    ),
    responses(
        (status = 204, description = "Organization deleted"),
        (status = 404, description = "Organization not found"),
    ),
    tag = "orgs"
)]
pub async fn delete_maintenance_org(
    State(state): State<AppState>,
    Path(org_id): Path<i32>,
) -> AppResult<StatusCode> {
    let org = maintenance_orgs::Entity::find_by_id(org_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance org {org_id} not found")))?;

    maintenance_orgs::Entity::delete_by_id(org.id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> OrgInput {
        OrgInput {
            name: "Metrology AG".to_string(),
            contact_name: "J. Meier".to_string(),
            phone: "+41 21 000 00 00".to_string(),
            email: None,
        }
    }

    fn rule(result: AppResult<()>) -> String {
        match result.unwrap_err() {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_an_org_with_and_without_email() {
        assert!(validate_org_input(&input()).is_ok());

        let mut with_email = input();
        with_email.email = Some("contact@metrology.ch".to_string());
        assert!(validate_org_input(&with_email).is_ok());
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        let mut bad = input();
        bad.name = "  ".to_string();
        assert!(rule(validate_org_input(&bad)).contains("name"));

        let mut bad = input();
        bad.contact_name = String::new();
        assert!(rule(validate_org_input(&bad)).contains("contact_name"));

        let mut bad = input();
        bad.phone = " ".to_string();
        assert!(rule(validate_org_input(&bad)).contains("phone"));
    }

    #[test]
    fn malformed_email_is_rejected_when_present() {
        let mut bad = input();
        bad.email = Some("not-an-address".to_string());
        assert!(rule(validate_org_input(&bad)).contains("email"));
    }

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("lab@example.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@ex ample.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example."));
    }
}
