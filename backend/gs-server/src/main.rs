use gs_server::{AppState, ShutdownCoordinator, bootstrap, build_router, logger, signals};

use gs_db::Database;

use std::error::Error;
use std::sync::Arc;

use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = bootstrap::load_config()?;

    // Initialize logger (before any other logging)
    let _log_guard = logger::initialize(&config.logging, &config.log_dir()?)?;

    info!("Starting gs-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    bootstrap::install_metrics_exporter(&config.server.host, &config.metrics)?;

    // Open the store; integrity failures are fatal
    let database_path = config.database_path()?;
    info!("Opening database: {}", database_path.display());
    let database = Database::open(&database_path).await?;

    let jwt_validator = bootstrap::jwt_validator(&config.auth)?;

    // Listen before instances start heartbeating
    let listener = bootstrap::bind_control_api(&config).await?;

    // Recover or start every instance
    let registry = Arc::new(bootstrap::start_supervisor(&config, &database).await?);

    let shutdown = ShutdownCoordinator::new();
    signals::spawn_shutdown_listener(shutdown.clone());
    let reload_task = signals::spawn_reload_listener(registry.clone(), shutdown.clone());

    let app = build_router(AppState {
        registry: registry.clone(),
        jwt_validator,
    });

    let mut guard = shutdown.subscribe_guard();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move { guard.wait().await })
        .await;
    if let Err(ref e) = served {
        error!("Control API failed: {}", e);
    }

    // Stop instances even when the HTTP server failed
    info!("Stopping supervised instances");
    reload_task.abort();
    registry.shutdown().await;
    database.close().await;
    info!("Graceful shutdown complete");

    served?;
    Ok(())
}
