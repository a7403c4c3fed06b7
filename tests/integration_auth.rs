mod common;

use std::time::Instant;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    create_test_user, form_request, request, send, test_jwt_config, test_state,
};
use todoapp::modules::auth::service::AuthService;
use todoapp::router::init_router;
use todoapp_auth::{UserRole, verify_token};

fn registration() -> serde_json::Value {
    json!({
        "username": "newuser",
        "email": "newuser@example.com",
        "first_name": "New",
        "last_name": "User",
        "password": "secret123",
        "phone_number": "5551234"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_user(pool: PgPool) {
    let app = init_router(test_state(pool.clone()));

    let (status, body) = send(app, request("POST", "/auth", None, Some(registration()))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "newuser");
    assert_eq!(body["role"], "user");
    assert_eq!(body["is_active"], true);
    assert!(body.get("hashed_password").is_none());

    let stored: String =
        sqlx::query_scalar("SELECT hashed_password FROM users WHERE username = 'newuser'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_ne!(stored, "secret123");
    assert!(stored.starts_with("$2"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_cannot_choose_admin_role(pool: PgPool) {
    let mut payload = registration();
    payload["role"] = json!("admin");

    let (status, body) = send(
        init_router(test_state(pool)),
        request("POST", "/auth", None, Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "user");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_username(pool: PgPool) {
    create_test_user(&pool, "newuser", "whatever1", UserRole::User).await;

    let (status, body) = send(
        init_router(test_state(pool)),
        request("POST", "/auth", None, Some(registration())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Username or email already registered.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_short_password(pool: PgPool) {
    let mut payload = registration();
    payload["password"] = json!("123");

    let (status, body) = send(
        init_router(test_state(pool)),
        request("POST", "/auth", None, Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Password must be at least 6 characters");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_oversized_fields(pool: PgPool) {
    let app = init_router(test_state(pool));

    let mut long_name = registration();
    long_name["first_name"] = json!("x".repeat(256));
    let (status, body) = send(app.clone(), request("POST", "/auth", None, Some(long_name))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "First name must be 1 to 255 characters");

    let mut long_phone = registration();
    long_phone["phone_number"] = json!("1".repeat(40));
    let (status, body) = send(app, request("POST", "/auth", None, Some(long_phone))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Phone number must be at most 32 characters");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_for_access_token(pool: PgPool) {
    let user = create_test_user(&pool, "codingwithroby", "testpassword", UserRole::Admin).await;
    let state = test_state(pool);
    let metrics = state.metrics.clone();

    let (status, body) = send(
        init_router(state),
        form_request("/auth/token", "username=codingwithroby&password=testpassword"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");

    let claims = verify_token(body["access_token"].as_str().unwrap(), &test_jwt_config()).unwrap();
    assert_eq!(claims.sub, "codingwithroby");
    assert_eq!(claims.id, user.id);
    assert_eq!(claims.role, UserRole::Admin);

    assert_eq!(
        metrics.sample("app_login_attempts", &[("outcome", "success")]),
        Some(1.0)
    );
    assert_eq!(metrics.sample("app_tokens_issued", &[]), Some(1.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_test_user(&pool, "alice", "testpassword", UserRole::User).await;
    let state = test_state(pool);
    let metrics = state.metrics.clone();

    let (status, body) = send(
        init_router(state),
        form_request("/auth/token", "username=alice&password=wrongpassword"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "detail": "Could not validate user." }));
    assert_eq!(
        metrics.sample("app_login_attempts", &[("outcome", "failure")]),
        Some(1.0)
    );
    assert_eq!(metrics.sample("app_tokens_issued", &[]), None);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_user_looks_like_wrong_password(pool: PgPool) {
    let (status, body) = send(
        init_router(test_state(pool)),
        form_request("/auth/token", "username=nobody&password=testpassword"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "detail": "Could not validate user." }));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_requires_form_fields(pool: PgPool) {
    let (status, body) = send(
        init_router(test_state(pool)),
        form_request("/auth/token", "username=alice"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "password is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_authenticate(pool: PgPool) {
    let user = create_test_user(&pool, "alice", "testpassword", UserRole::User).await;

    let found = AuthService::authenticate(&pool, "alice", "testpassword")
        .await
        .unwrap()
        .expect("correct credentials authenticate");
    assert_eq!(found.id, user.id);
    assert_eq!(found.username, "alice");

    assert!(
        AuthService::authenticate(&pool, "alice", "wrongpassword")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        AuthService::authenticate(&pool, "nobody", "testpassword")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_user_costs_a_password_check(pool: PgPool) {
    create_test_user(&pool, "alice", "testpassword", UserRole::User).await;
    AuthService::authenticate(&pool, "nobody", "warmup").await.unwrap();

    let started = Instant::now();
    let unknown = AuthService::authenticate(&pool, "nobody", "testpassword")
        .await
        .unwrap();
    let unknown_elapsed = started.elapsed();

    let started = Instant::now();
    let wrong = AuthService::authenticate(&pool, "alice", "wrongpassword")
        .await
        .unwrap();
    let wrong_elapsed = started.elapsed();

    assert!(unknown.is_none());
    assert!(wrong.is_none());
    assert!(
        unknown_elapsed * 3 >= wrong_elapsed,
        "unknown user answered in {unknown_elapsed:?}, wrong password in {wrong_elapsed:?}"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_authenticate_malformed_stored_hash(pool: PgPool) {
    let user = create_test_user(&pool, "alice", "testpassword", UserRole::User).await;
    sqlx::query("UPDATE users SET hashed_password = 'not-a-bcrypt-hash' WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let result = AuthService::authenticate(&pool, "alice", "testpassword")
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_grants_access_to_own_todos(pool: PgPool) {
    create_test_user(&pool, "alice", "testpassword", UserRole::User).await;

    let (_, body) = send(
        init_router(test_state(pool.clone())),
        form_request("/auth/token", "username=alice&password=testpassword"),
    )
    .await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, todos) = send(
        init_router(test_state(pool)),
        request("GET", "/todos", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(todos, json!([]));
}
