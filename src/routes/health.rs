use axum::http::StatusCode;

/// Liveness probe
///
/// Returns 200 OK whenever the process is up. Bypasses rate limiting so
/// orchestrator probes never get throttled out.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is up"),
    ),
    tag = "health"
)]
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
