use crate::error::{Result as ServerErrorResult, ServerError};

use gs_config::LoggingConfig;

use std::path::Path;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const MAX_LOG_FILES: usize = 7;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Records emitted
/// through the `log` crate are forwarded into tracing. When a log file is
/// configured it is rotated daily inside `log_dir`; keep the returned guard
/// alive until exit so buffered lines are flushed.
pub fn initialize(
    logging: &LoggingConfig,
    log_dir: &Path,
) -> ServerErrorResult<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_directive()));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(logging.colored);

    let (file_layer, guard) = match logging.file {
        Some(ref filename) => {
            std::fs::create_dir_all(log_dir)?;

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(MAX_LOG_FILES)
                .filename_prefix(filename)
                .build(log_dir)
                .map_err(|e| {
                    ServerError::logger(format!(
                        "cannot create log file in {}: {e}",
                        log_dir.display()
                    ))
                })?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| ServerError::logger(e.to_string()))?;

    match logging.file {
        Some(ref filename) => info!(
            "Logger initialized: level={}, file={}",
            logging.level.as_directive(),
            log_dir.join(filename).display()
        ),
        None => info!(
            "Logger initialized: level={}, stdout",
            logging.level.as_directive()
        ),
    }

    Ok(guard)
}
