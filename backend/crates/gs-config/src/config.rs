use crate::{
    AuthConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR_NAME, DatabaseConfig, InstanceConfig, LoggingConfig, MetricsConfig,
    NotifyConfig, ProcessConfig, ServerConfig, SupervisorConfig, UpdateConfig,
};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub supervisor: SupervisorConfig,
    pub process: ProcessConfig,
    pub update: UpdateConfig,
    pub notify: NotifyConfig,
    pub metrics: MetricsConfig,
    pub instances: Vec<InstanceConfig>,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for GS_CONFIG_DIR env var, else use ./.gs/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply GS_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: GS_CONFIG_DIR env var > ./.gs/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.auth.validate()?;
        self.supervisor.validate()?;
        self.process.validate()?;
        self.update.validate()?;
        self.notify.validate()?;
        self.metrics.validate()?;
        self.database.validate()?;

        let mut seen = HashSet::new();
        for instance in &self.instances {
            if !seen.insert(instance.key.as_str()) {
                return Err(ConfigError::instance(format!(
                    "duplicate instance key '{}'",
                    instance.key
                )));
            }
            instance.validate()?;
        }

        Ok(())
    }

    /// Get absolute path to database file.
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.database.path))
    }

    /// Get absolute path to the log directory.
    pub fn log_dir(&self) -> ConfigErrorResult<PathBuf> {
        let dir = Path::new(&self.logging.dir);
        if dir.is_absolute() {
            return Ok(dir.to_path_buf());
        }
        Ok(Self::config_dir()?.join(dir))
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Update settings in effect for one instance.
    pub fn update_for<'a>(&'a self, instance: &'a InstanceConfig) -> &'a UpdateConfig {
        instance.update.as_ref().unwrap_or(&self.update)
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} (public url {})",
            self.server.host,
            self.server.port,
            self.server.public_url()
        );
        info!("  database: {}", self.database.path);

        info!(
            "  auth: {}",
            if self.auth.enabled {
                "enabled (HS256)"
            } else {
                "disabled"
            }
        );

        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("none")
        );

        info!(
            "  supervisor: queue={}, max_init_failures={}, stop_grace={}s, shutdown={}s",
            self.supervisor.queue_capacity,
            self.supervisor.max_init_failures,
            self.supervisor.stop_grace_secs,
            self.supervisor.shutdown_timeout_secs
        );

        info!(
            "  spawn_retry: attempts={}, initial={}ms, max={}s, backoff={}x",
            self.supervisor.spawn_retry.max_attempts,
            self.supervisor.spawn_retry.initial_delay_ms,
            self.supervisor.spawn_retry.max_delay_secs,
            self.supervisor.spawn_retry.backoff_multiplier
        );

        info!("  process: backend={}", self.process.backend);

        info!(
            "  update: provider={:?}, interval={}s",
            self.update.provider, self.update.check_interval_secs
        );

        info!(
            "  notify: webhook {}",
            if self.notify.webhook_url.is_some() {
                "configured"
            } else {
                "not configured"
            }
        );

        info!(
            "  metrics: {}",
            if self.metrics.enabled {
                format!("enabled on port {}", self.metrics.port)
            } else {
                String::from("disabled")
            }
        );

        for instance in &self.instances {
            info!(
                "  instance {}: {} (heartbeat timeout {}s)",
                instance.key,
                instance.program_path().display(),
                instance.heartbeat_timeout_secs
            );
        }
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("GS_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("GS_SERVER_PORT", &mut self.server.port);
        Self::apply_env_option_string("GS_SERVER_PUBLIC_URL", &mut self.server.public_url);

        // Database
        Self::apply_env_string("GS_DATABASE_PATH", &mut self.database.path);

        // Auth
        Self::apply_env_bool("GS_AUTH_ENABLED", &mut self.auth.enabled);
        Self::apply_env_option_string("GS_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);

        // Logging
        Self::apply_env_parse("GS_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("GS_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_string("GS_LOG_DIR", &mut self.logging.dir);
        Self::apply_env_option_string("GS_LOG_FILE", &mut self.logging.file);

        // Supervisor
        Self::apply_env_parse(
            "GS_SUPERVISOR_QUEUE_CAPACITY",
            &mut self.supervisor.queue_capacity,
        );
        Self::apply_env_parse(
            "GS_SUPERVISOR_MAX_INIT_FAILURES",
            &mut self.supervisor.max_init_failures,
        );
        Self::apply_env_parse(
            "GS_SUPERVISOR_STOP_REQUEST_TIMEOUT_MS",
            &mut self.supervisor.stop_request_timeout_ms,
        );
        Self::apply_env_parse(
            "GS_SUPERVISOR_STOP_GRACE_SECS",
            &mut self.supervisor.stop_grace_secs,
        );
        Self::apply_env_parse(
            "GS_SUPERVISOR_SHUTDOWN_TIMEOUT_SECS",
            &mut self.supervisor.shutdown_timeout_secs,
        );

        // Spawn retry
        let retry = &mut self.supervisor.spawn_retry;
        Self::apply_env_parse("GS_SPAWN_RETRY_MAX_ATTEMPTS", &mut retry.max_attempts);
        Self::apply_env_parse(
            "GS_SPAWN_RETRY_INITIAL_DELAY_MS",
            &mut retry.initial_delay_ms,
        );
        Self::apply_env_parse("GS_SPAWN_RETRY_MAX_DELAY_SECS", &mut retry.max_delay_secs);
        Self::apply_env_parse(
            "GS_SPAWN_RETRY_BACKOFF_MULTIPLIER",
            &mut retry.backoff_multiplier,
        );
        Self::apply_env_bool("GS_SPAWN_RETRY_JITTER", &mut retry.jitter);

        // Process
        Self::apply_env_parse("GS_PROCESS_BACKEND", &mut self.process.backend);
        Self::apply_env_parse("GS_PROCESS_UNIT_NAMING", &mut self.process.unit_naming);
        Self::apply_env_string("GS_PROCESS_UNIT_PREFIX", &mut self.process.unit_prefix);
        Self::apply_env_bool("GS_PROCESS_USER_SCOPE", &mut self.process.user_scope);

        // Update
        Self::apply_env_parse("GS_UPDATE_PROVIDER", &mut self.update.provider);
        Self::apply_env_parse(
            "GS_UPDATE_CHECK_INTERVAL_SECS",
            &mut self.update.check_interval_secs,
        );
        Self::apply_env_option_string("GS_UPDATE_MANIFEST_URL", &mut self.update.manifest_url);
        Self::apply_env_option_string("GS_UPDATE_LOCAL_DIR", &mut self.update.local_dir);
        Self::apply_env_option_string("GS_UPDATE_PLATFORM", &mut self.update.platform);

        // Notify
        Self::apply_env_option_string("GS_NOTIFY_WEBHOOK_URL", &mut self.notify.webhook_url);
        Self::apply_env_parse("GS_NOTIFY_TIMEOUT_SECS", &mut self.notify.timeout_secs);

        // Metrics
        Self::apply_env_bool("GS_METRICS_ENABLED", &mut self.metrics.enabled);
        Self::apply_env_parse("GS_METRICS_PORT", &mut self.metrics.port);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
