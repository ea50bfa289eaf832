//! File logging. The terminal belongs to the UI, so everything goes to a
//! daily rolling file through a non-blocking writer.

use crate::config::Config;
use crate::error::{LoggingSnafu, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_PREFIX: &str = "news-reader";
const LOG_FILE_SUFFIX: &str = "log";
const MAX_LOG_FILES: usize = 7;

/// Install the global subscriber. Keep the guard alive until exit so
/// buffered lines get flushed.
#[must_use = "dropping the guard stops the log writer"]
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let filter = filter(&config.log_filter)?;

    std::fs::create_dir_all(&config.log_dir).map_err(|e| {
        LoggingSnafu { message: format!("cannot create {}: {e}", config.log_dir.display()) }.build()
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(&config.log_dir)
        .map_err(|e| LoggingSnafu { message: e.to_string() }.build())?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| LoggingSnafu { message: e.to_string() }.build())?;

    Ok(guard)
}

fn filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| LoggingSnafu { message: format!("bad filter '{directives}': {e}") }.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn accepts_target_directives() {
        assert!(filter("info").is_ok());
        assert!(filter("warn,news_nexus=debug").is_ok());
    }

    #[test]
    fn rejects_unknown_levels() {
        assert!(matches!(filter("news_reader=loud"), Err(AppError::Logging { .. })));
    }

    #[test]
    fn init_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config { log_dir: dir.path().join("logs"), ..Config::default() };
        let guard = init(&config).unwrap();
        tracing::info!("logging ready");
        drop(guard);
        assert!(config.log_dir.is_dir());
    }
}
