//! Role gate for admin-only routes.
//!
//! Applied with `route_layer` so unmatched paths still fall through to 404:
//!
//! ```rust,ignore
//! let admin_routes = init_admin_router()
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use todoapp_auth::UserRole;
use todoapp_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const ADMIN_REQUIRED: &str = "Admin privileges required.";

/// Succeeds when `user` holds `required`.
pub fn check_role(user: &AuthUser, required: UserRole) -> Result<(), AppError> {
    if user.role() == required {
        Ok(())
    } else {
        Err(AppError::forbidden(ADMIN_REQUIRED))
    }
}

/// Rejects unauthenticated callers with 401 and non-admins with 403.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    if let Err(err) = check_role(&auth_user, UserRole::Admin) {
        warn!(user_id = auth_user.user_id(), "Non-admin attempted an admin operation");
        return err.into_response();
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(auth_user);
    next.run(req).await
}
