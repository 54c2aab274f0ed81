//! Process signals: Ctrl-C and SIGTERM shut down, SIGHUP reloads.

use crate::ShutdownCoordinator;
use crate::bootstrap::{instance_setups, load_config};
use crate::error::Result as ServerErrorResult;

use gs_supervisor::{ConfigReload, SupervisorRegistry};

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Resolve on the first Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Forward shutdown signals to the coordinator.
pub fn spawn_shutdown_listener(shutdown: ShutdownCoordinator) -> JoinHandle<()> {
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.shutdown();
    })
}

/// Re-read the configuration file and push it to running instances.
pub async fn reload_config(registry: &SupervisorRegistry) -> ServerErrorResult<ConfigReload> {
    let config = load_config()?;
    let setups = instance_setups(&config)?;
    let reload = registry.apply_config(setups).await;

    info!(
        "Configuration reloaded: {} updated, {} added, {} removed",
        reload.updated.len(),
        reload.added.len(),
        reload.removed.len()
    );
    if !reload.added.is_empty() || !reload.removed.is_empty() {
        warn!("Added or removed instances take effect after a supervisor restart");
    }

    Ok(reload)
}

/// Reload the configuration on every SIGHUP until shutdown.
#[cfg(unix)]
pub fn spawn_reload_listener(
    registry: Arc<SupervisorRegistry>,
    shutdown: ShutdownCoordinator,
) -> JoinHandle<()> {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                error!("Failed to listen for SIGHUP, reload disabled: {}", e);
                return;
            }
        };
        let mut guard = shutdown.subscribe_guard();

        loop {
            tokio::select! {
                _ = guard.wait() => break,
                received = hangup.recv() => {
                    if received.is_none() {
                        break;
                    }
                    info!("Received SIGHUP, reloading configuration");
                    if let Err(e) = reload_config(&registry).await {
                        error!("Configuration reload failed, keeping current settings: {}", e);
                    }
                }
            }
        }
    })
}

#[cfg(not(unix))]
pub fn spawn_reload_listener(
    _registry: Arc<SupervisorRegistry>,
    _shutdown: ShutdownCoordinator,
) -> JoinHandle<()> {
    tokio::spawn(async {})
}
