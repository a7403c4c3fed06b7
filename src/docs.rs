use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use todoapp_auth::UserRole;

use crate::modules::ErrorResponse;
use crate::modules::admin::model::UpdateUserStatusDto;
use crate::modules::auth::model::{RegisterRequestDto, TokenRequest, TokenResponse};
use crate::modules::health::controller::HealthResponse;
use crate::modules::todos::model::{Todo, TodoRequest};
use crate::modules::users::model::{ChangePasswordDto, User};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::health::controller::export_metrics,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_for_access_token,
        crate::modules::todos::controller::read_all,
        crate::modules::todos::controller::read_todo,
        crate::modules::todos::controller::create_todo,
        crate::modules::todos::controller::update_todo,
        crate::modules::todos::controller::delete_todo,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::change_password,
        crate::modules::users::controller::change_phone_number,
        crate::modules::admin::controller::read_all_todos,
        crate::modules::admin::controller::delete_todo,
        crate::modules::admin::controller::read_all_users,
        crate::modules::admin::controller::update_user_status,
    ),
    components(
        schemas(
            User,
            UserRole,
            Todo,
            TodoRequest,
            RegisterRequestDto,
            TokenRequest,
            TokenResponse,
            ChangePasswordDto,
            UpdateUserStatusDto,
            HealthResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and token issuance"),
        (name = "Todos", description = "The caller's own todos"),
        (name = "Users", description = "Profile self-service"),
        (name = "Admin", description = "Administrative operations, admin role only"),
        (name = "Health", description = "Liveness and metrics")
    ),
    info(
        title = "Todo App API",
        version = "1.0.0",
        description = "Todo management with bearer token authentication and request monitoring.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
