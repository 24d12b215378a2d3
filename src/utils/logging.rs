// src/utils/logging.rs
use crate::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Logs to stdout and to a daily rolling file. Keep the returned guard alive
/// for the whole process or buffered file lines are lost on exit.
pub fn init_tracing(config: &LoggingConfig) -> Result<WorkerGuard, InitError> {
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender(config)?);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(guard)
}

/// Fails when the log directory cannot be created or the first file opened.
fn file_appender(config: &LoggingConfig) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(config.file_prefix.as_str())
        .build(&config.directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appender_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            directory: dir.path().join("nested").join("logs"),
            ..Default::default()
        };

        assert!(file_appender(&config).is_ok());
        assert!(config.directory.is_dir());
    }

    #[test]
    fn unusable_directory_is_an_error() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let config = LoggingConfig {
            directory: blocker.path().to_path_buf(),
            ..Default::default()
        };

        assert!(file_appender(&config).is_err());
    }
}
