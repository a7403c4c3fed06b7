use std::net::SocketAddr;
use std::time::Duration;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::info;

use todoapp::router::init_router;
use todoapp::state::AppState;
use todoapp_config::Settings;
use todoapp_db::{init_db_pool, run_migrations};
use todoapp_observability::{HttpMetrics, init_tracing, shutdown_tracer};

const METRICS_UPKEEP_PERIOD: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let settings = Settings::from_env()?;
    init_tracing(settings.server.debug)?;

    let db = init_db_pool(&settings.database).await?;
    run_migrations(&db).await?;

    let metrics = HttpMetrics::new()?;
    metrics.spawn_upkeep(METRICS_UPKEEP_PERIOD);

    let state = AppState::new(db, &settings, metrics);
    let app = init_router(state);

    let address = settings.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!(%address, "Server listening");
    info!("Swagger UI available at http://{address}/docs");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    shutdown_tracer();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
