use std::any::Any;

use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, middleware, routing::get};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use todoapp_core::INTERNAL_ERROR_DETAIL;
use todoapp_observability::observe_request;

use crate::docs::ApiDoc;
use crate::middleware::role::require_admin;
use crate::modules::admin::router::init_admin_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::health::controller::export_metrics;
use crate::modules::health::router::init_health_router;
use crate::modules::todos::router::init_todos_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

pub const STATIC_DIR: &str = "static";

/// Last resort for a panicking handler. The observability middleware has
/// already recorded the failure by the time this runs.
fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": INTERNAL_ERROR_DETAIL })),
    )
        .into_response()
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let observed = Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/redoc", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest("/auth", init_auth_router())
        .nest("/todos", init_todos_router())
        .nest("/users", init_users_router())
        .nest(
            "/admin",
            init_admin_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            observe_request,
        ));

    // Scrapes stay out of the request metrics.
    let metrics = Router::new()
        .route("/metrics", get(export_metrics))
        .with_state(state.metrics.clone());

    observed
        .merge(metrics)
        .layer(cors_layer(&state))
        .layer(CatchPanicLayer::custom(handle_panic))
}
