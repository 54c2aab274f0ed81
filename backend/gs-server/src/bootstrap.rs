//! Wiring from configuration to a running supervisor.

use crate::error::{Result as ServerErrorResult, ServerError};

use gs_auth::JwtValidator;
use gs_config::{AuthConfig, Config, MetricsConfig, NotifyConfig};
use gs_db::{Database, InstanceRecordRepository};
use gs_process::ProcessManagerFactory;
use gs_supervisor::{
    FanoutNotifier, HttpStopRequester, InstanceSetup, LogNotifier, SupervisorDeps,
    SupervisorRegistry, SupervisorSettings, UpdateProviderFactory, WebhookNotifier,
};

use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Load configuration and reject out-of-range values.
pub fn load_config() -> ServerErrorResult<Config> {
    let config = Config::load()?;
    config.validate()?;
    Ok(config)
}

/// Bind the control API address. Done before any instance starts so their
/// first heartbeats find it listening.
pub async fn bind_control_api(config: &Config) -> ServerErrorResult<TcpListener> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Control API bound to {}", listener.local_addr()?);
    Ok(listener)
}

/// One [`InstanceSetup`] per configured instance, each with the update
/// provider and check interval in effect for it.
pub fn instance_setups(config: &Config) -> ServerErrorResult<Vec<InstanceSetup>> {
    let factory = UpdateProviderFactory::new();

    config
        .instances
        .iter()
        .map(|instance| {
            let update = config.update_for(instance);
            let updates = factory.create(update)?;
            info!(
                "Instance '{}': update provider '{}'",
                instance.key,
                updates.name()
            );
            Ok(InstanceSetup {
                config: instance.clone(),
                updates,
                check_interval: update.check_interval(),
            })
        })
        .collect()
}

/// Notifications always go to the log; a webhook is added when configured.
pub fn build_notifier(notify: &NotifyConfig) -> ServerErrorResult<FanoutNotifier> {
    let notifier = FanoutNotifier::new(vec![Arc::new(LogNotifier)]);

    match notify.webhook_url {
        Some(ref url) => {
            info!("Notifications: log + webhook");
            let webhook = WebhookNotifier::new(url.clone(), notify.timeout())?;
            Ok(notifier.with(Arc::new(webhook)))
        }
        None => {
            info!("Notifications: log only");
            Ok(notifier)
        }
    }
}

/// JWT validator for operator requests, `None` when auth is disabled.
pub fn jwt_validator(auth: &AuthConfig) -> ServerErrorResult<Option<Arc<JwtValidator>>> {
    if !auth.enabled {
        warn!("Authentication DISABLED - operator endpoints are open");
        return Ok(None);
    }

    let secret = auth
        .jwt_secret
        .as_ref()
        .ok_or_else(|| gs_config::ConfigError::auth("auth.enabled requires auth.jwt_secret"))?;

    info!("JWT: HS256 authentication enabled");
    Ok(Some(Arc::new(JwtValidator::with_hs256(secret.as_bytes()))))
}

/// Recover or start every configured instance.
pub async fn start_supervisor(
    config: &Config,
    database: &Database,
) -> ServerErrorResult<SupervisorRegistry> {
    let records = InstanceRecordRepository::new(database.pool().clone());

    let processes = ProcessManagerFactory::new(config.process.clone()).create(Some(records.clone()));
    info!("Process backend: {}", config.process.backend);

    let deps = SupervisorDeps {
        processes,
        store: Arc::new(records),
        notifier: Arc::new(build_notifier(&config.notify)?),
        stop_requester: Arc::new(HttpStopRequester::new(
            config.supervisor.stop_request_timeout(),
        )?),
    };

    let setups = instance_setups(config)?;
    Ok(SupervisorRegistry::start(setups, SupervisorSettings::from_config(config), deps).await)
}

/// Serve Prometheus metrics on `host:metrics.port` when enabled.
pub fn install_metrics_exporter(host: &str, metrics: &MetricsConfig) -> ServerErrorResult<()> {
    if !metrics.enabled {
        return Ok(());
    }

    let addr: SocketAddr = format!("{}:{}", host, metrics.port)
        .parse()
        .map_err(|e| ServerError::metrics(format!("invalid listen address: {e}")))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ServerError::metrics(e.to_string()))?;

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}
