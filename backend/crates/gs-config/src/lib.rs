mod auth_config;
mod config;
mod database_config;
mod error;
mod instance_config;
mod log_level;
mod logging_config;
mod metrics_config;
mod notify_config;
mod process_config;
mod server_config;
mod spawn_retry_config;
mod supervisor_config;
mod update_config;

#[cfg(test)]
mod tests;

pub use auth_config::AuthConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use instance_config::InstanceConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use metrics_config::MetricsConfig;
pub use notify_config::NotifyConfig;
pub use process_config::{ProcessBackend, ProcessConfig, UnitNaming};
pub use server_config::ServerConfig;
pub use spawn_retry_config::SpawnRetryConfig;
pub use supervisor_config::SupervisorConfig;
pub use update_config::{UpdateConfig, UpdateProviderKind};

/// Environment variable naming the config directory.
pub const CONFIG_DIR_ENV: &str = "GS_CONFIG_DIR";
const DEFAULT_CONFIG_DIR_NAME: &str = ".gs";
const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8700;
const MIN_PORT: u16 = 1024;

const DEFAULT_DATABASE_FILENAME: &str = "supervisor.db";

const DEFAULT_AUTH_ENABLED: bool = false;
const MIN_JWT_SECRET_LENGTH: usize = 32;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;

const DEFAULT_METRICS_PORT: u16 = 9700;
