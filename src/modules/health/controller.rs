use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use utoipa::ToSchema;

use todoapp_observability::HttpMetrics;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "Healthy" })
}

/// Sends browsers to the todo page.
pub async fn redirect_to_todo_page() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/todos/todo-page")])
}

/// Prometheus exposition of the request metrics
#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Prometheus text format", content_type = "text/plain")),
    tag = "Health"
)]
pub async fn export_metrics(State(metrics): State<HttpMetrics>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.render(),
    )
}
