pub mod alerts;
pub mod health;
pub mod machines;
pub mod orgs;
mod rate_limit;
pub mod service_events;
pub mod stats;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};

use rate_limit::FallbackIpKeyExtractor;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        machines::list_machines,
        machines::create_machine,
        machines::get_machine,
        machines::update_machine,
        machines::delete_machine,
        orgs::list_calibration_orgs,
        orgs::create_calibration_org,
        orgs::get_calibration_org,
        orgs::update_calibration_org,
        orgs::delete_calibration_org,
        orgs::list_maintenance_orgs,
        orgs::create_maintenance_org,
        orgs::get_maintenance_org,
        orgs::update_maintenance_org,
        orgs::delete_maintenance_org,
        service_events::list_calibrations,
        service_events::create_calibration,
        service_events::list_maintenances,
        service_events::create_maintenance,
        alerts::calibration_alerts,
        alerts::maintenance_alerts,
        alerts::alert_summary,
        stats::calibration_stats,
        stats::maintenance_stats,
    ),
    components(
        schemas(
            machines::MachineInput,
            machines::MachineResponse,
            orgs::OrgInput,
            orgs::OrgResponse,
            service_events::CalibrationEventResponse,
            service_events::MaintenanceEventResponse,
            services::ServiceTrack,
            services::due::DueStatus,
            services::events::ServiceEventInput,
            services::alerts::Alert,
            services::alerts::AlertPriority,
            services::alerts::AlertSummary,
            services::alerts::AlertCounts,
            services::stats::Stats,
            services::stats::OrgEventCount,
            services::stats::MonthCount,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "machines", description = "Laboratory equipment"),
        (name = "orgs", description = "Calibration and maintenance organizations"),
        (name = "service-events", description = "Append-only calibration/maintenance history"),
        (name = "alerts", description = "Computed due-date alerts"),
        (name = "stats", description = "Service history statistics"),
    ),
    info(
        title = "LabCal API",
        description = "Calibration and maintenance tracking for laboratory equipment",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            crud_rate = %format!("{}/s burst {}", config.rate_limit_crud_per_second, config.rate_limit_crud_burst),
            reporting_rate = %format!("{}/s burst {}", config.rate_limit_reporting_per_second, config.rate_limit_reporting_burst),
            "Rate limiting configured"
        );
    }

    // CRUD routes: machines, orgs, service events
    let crud_routes_base = Router::new()
        .route(
            "/machines",
            get(machines::list_machines).post(machines::create_machine),
        )
        .route(
            "/machines/{machine_id}",
            get(machines::get_machine)
                .put(machines::update_machine)
                .delete(machines::delete_machine),
        )
        .route(
            "/calibration-orgs",
            get(orgs::list_calibration_orgs).post(orgs::create_calibration_org),
        )
        .route(
            "/calibration-orgs/{org_id}",
            get(orgs::get_calibration_org)
                .put(orgs::update_calibration_org)
                .delete(orgs::delete_calibration_org),
        )
        .route(
            "/maintenance-orgs",
            get(orgs::list_maintenance_orgs).post(orgs::create_maintenance_org),
        )
        .route(
            "/maintenance-orgs/{org_id}",
            get(orgs::get_maintenance_org)
                .put(orgs::update_maintenance_org)
                .delete(orgs::delete_maintenance_org),
        )
        .route(
            "/calibrations",
            get(service_events::list_calibrations).post(service_events::create_calibration),
        )
        .route(
            "/maintenances",
            get(service_events::list_maintenances).post(service_events::create_maintenance),
        );

    // Reporting routes: alerts and stats, computed fresh on every request
    let reporting_routes_base = Router::new()
        .route("/alerts/calibration", get(alerts::calibration_alerts))
        .route("/alerts/maintenance", get(alerts::maintenance_alerts))
        .route("/alerts/summary", get(alerts::alert_summary))
        .route("/stats/calibration", get(stats::calibration_stats))
        .route("/stats/maintenance", get(stats::maintenance_stats));

    // Combine API routes, conditionally applying rate limiting
    let api_routes = if config.disable_rate_limiting {
        Router::new()
            .merge(crud_routes_base)
            .merge(reporting_routes_base)
    } else {
        let crud_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_crud_per_second)
            .burst_size(config.rate_limit_crud_burst)
            .finish()
            .expect("Failed to create CRUD rate limiter");

        let reporting_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_reporting_per_second)
            .burst_size(config.rate_limit_reporting_burst)
            .finish()
            .expect("Failed to create reporting rate limiter");

        Router::new()
            .merge(crud_routes_base.layer(GovernorLayer {
                config: Arc::new(crud_limiter),
            }))
            .merge(reporting_routes_base.layer(GovernorLayer {
                config: Arc::new(reporting_limiter),
            }))
    }
    .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Combine all routes
    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
