use axum::http::StatusCode;

use todoapp::middleware::auth::AuthUser;
use todoapp::middleware::role::{ADMIN_REQUIRED, check_role};
use todoapp_auth::{Claims, UserRole};

fn create_test_auth_user(role: UserRole) -> AuthUser {
    AuthUser(Claims {
        sub: "tester".to_string(),
        id: 1,
        role,
        exp: 9999999999,
    })
}

#[test]
fn test_check_role_exact_match() {
    assert!(check_role(&create_test_auth_user(UserRole::Admin), UserRole::Admin).is_ok());
    assert!(check_role(&create_test_auth_user(UserRole::User), UserRole::User).is_ok());
}

#[test]
fn test_check_role_no_match_is_forbidden() {
    let err = check_role(&create_test_auth_user(UserRole::User), UserRole::Admin).unwrap_err();

    assert_eq!(err.status, StatusCode::FORBIDDEN);
    assert_eq!(err.detail(), ADMIN_REQUIRED);
}

#[test]
fn test_auth_user_accessors() {
    let auth_user = create_test_auth_user(UserRole::Admin);

    assert_eq!(auth_user.user_id(), 1);
    assert_eq!(auth_user.username(), "tester");
    assert_eq!(auth_user.role(), UserRole::Admin);
    assert!(auth_user.is_admin());
    assert!(!create_test_auth_user(UserRole::User).is_admin());
}
