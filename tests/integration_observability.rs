//! Routes that never reach the database, run against a lazy pool.

mod common;

use axum::http::{Request, StatusCode, header};
use axum::body::Body;
use serde_json::json;
use tower::ServiceExt;

use common::{TestUser, lazy_pool, request, send, test_state, token_for};
use todoapp::router::init_router;
use todoapp_auth::UserRole;
use todoapp_observability::metrics::{ERROR_COUNT, REQUEST_COUNT};

#[tokio::test]
async fn test_health_check() {
    let app = init_router(test_state(lazy_pool()));

    let (status, body) = send(app, request("GET", "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "Healthy" }));
}

#[tokio::test]
async fn test_root_redirects_to_todo_page() {
    let app = init_router(test_state(lazy_pool()));

    let response = app
        .oneshot(request("GET", "/", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/todos/todo-page"
    );
}

#[tokio::test]
async fn test_request_counter_grows_by_request_count() {
    let state = test_state(lazy_pool());
    let metrics = state.metrics.clone();
    let app = init_router(state);
    let labels = [("method", "GET"), ("endpoint", "/health"), ("status_code", "200")];

    let before = metrics.sample(REQUEST_COUNT, &labels).unwrap_or(0.0);
    for _ in 0..5 {
        let (status, _) = send(app.clone(), request("GET", "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(metrics.sample(REQUEST_COUNT, &labels), Some(before + 5.0));
    assert_eq!(metrics.sample(ERROR_COUNT, &[("endpoint", "/health")]), None);
}

#[tokio::test]
async fn test_rejected_requests_are_counted_with_their_status() {
    let state = test_state(lazy_pool());
    let metrics = state.metrics.clone();
    let app = init_router(state);

    let (status, _) = send(app, request("GET", "/todos", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        metrics.sample(
            REQUEST_COUNT,
            &[("endpoint", "/todos"), ("status_code", "401")]
        ),
        Some(1.0)
    );
    assert_eq!(metrics.sample(ERROR_COUNT, &[]), None);
}

#[tokio::test]
async fn test_route_template_is_the_endpoint_label() {
    let state = test_state(lazy_pool());
    let metrics = state.metrics.clone();
    let app = init_router(state);

    send(app.clone(), request("GET", "/todos/todo/1", None, None)).await;
    send(app, request("GET", "/todos/todo/2", None, None)).await;

    assert_eq!(
        metrics.sample(REQUEST_COUNT, &[("endpoint", "/todos/todo/{todo_id}")]),
        Some(2.0)
    );
}

#[tokio::test]
async fn test_metrics_exposition() {
    let state = test_state(lazy_pool());
    let metrics = state.metrics.clone();
    let app = init_router(state);

    send(app.clone(), request("GET", "/health", None, None)).await;

    let response = app
        .clone()
        .oneshot(request("GET", "/metrics", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );

    let (_, body) = send(app, request("GET", "/metrics", None, None)).await;
    let text = body.as_str().unwrap();
    assert!(text.contains("app_request_count"));
    assert!(text.contains("app_request_latency_seconds"));

    assert_eq!(metrics.sample(REQUEST_COUNT, &[("endpoint", "/metrics")]), None);
}

#[tokio::test]
async fn test_non_admin_is_forbidden_before_any_query() {
    let user = TestUser {
        id: 7,
        username: "alice".to_string(),
        password: String::new(),
        role: UserRole::User,
    };
    let app = init_router(test_state(lazy_pool()));

    let (status, body) = send(
        app,
        request("GET", "/admin/users", Some(&token_for(&user)), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "detail": "Admin privileges required." }));
}

#[tokio::test]
async fn test_malformed_bearer_token() {
    let app = init_router(test_state(lazy_pool()));

    let (status, body) = send(
        app,
        request("GET", "/users", Some("not.a.token"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "detail": "Could not validate user." }));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = init_router(test_state(lazy_pool()));

    let (status, body) = send(app, request("GET", "/openapi.json", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Todo App API");
    assert!(body["paths"].get("/todos").is_some());
}

#[tokio::test]
async fn test_cors_preflight_for_allowed_origin() {
    let app = init_router(test_state(lazy_pool()));

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/todos")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}
