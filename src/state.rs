use sqlx::PgPool;
use todoapp_config::{CorsConfig, JwtConfig, Settings};
use todoapp_observability::HttpMetrics;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub metrics: HttpMetrics,
}

impl AppState {
    pub fn new(db: PgPool, settings: &Settings, metrics: HttpMetrics) -> Self {
        Self {
            db,
            jwt_config: settings.jwt.clone(),
            cors_config: settings.cors.clone(),
            metrics,
        }
    }
}
