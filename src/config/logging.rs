use std::path::{Path, PathBuf};

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::EnvironmentProvider;

/// Configuration for application logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub log_level: String,
    pub app_log_file: Option<PathBuf>,
}

impl LoggingConfig {
    /// `LOG_LEVEL` (default `INFO`) and optional `APP_LOG_FILE`
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Self {
        Self {
            log_level: env.get_var_or("LOG_LEVEL", "INFO"),
            app_log_file: env
                .get_var("APP_LOG_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),
}

/// Install the tracing subscriber with console and optional daily-rolling file output
pub fn init_logging(env: &dyn EnvironmentProvider) -> Result<(), LoggingError> {
    let config = LoggingConfig::from_env_provider(env);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(build_filter(&config.log_level)?);

    let subscriber = tracing_subscriber::registry().with(console_layer);

    match &config.app_log_file {
        Some(log_file_path) => {
            let directory = log_file_path.parent().unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(directory)?;
            let file_name = log_file_path
                .file_name()
                .ok_or_else(|| LoggingError::InitializationError("Invalid log file path".to_string()))?;

            let file_appender = tracing_appender::rolling::daily(directory, file_name);
            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .with_target(true)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_filter(build_filter(&config.log_level)?);

            subscriber
                .with(file_layer)
                .try_init()
                .map_err(|e| LoggingError::InitializationError(e.to_string()))
        }
        None => subscriber
            .try_init()
            .map_err(|e| LoggingError::InitializationError(e.to_string())),
    }
}

fn build_filter(log_level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(log_level).map_err(|e| LoggingError::InvalidLogLevel(format!("{}: {}", log_level, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::from_env_provider(&MockEnvironment::empty());

        assert_eq!(config.log_level, "INFO");
        assert_eq!(config.app_log_file, None);
    }

    #[test]
    fn test_logging_config_reads_file_path() {
        let env = MockEnvironment::empty()
            .with_vars(&[("LOG_LEVEL", "debug,sea_orm=warn"), ("APP_LOG_FILE", "logs/app.log")]);

        let config = LoggingConfig::from_env_provider(&env);

        assert_eq!(config.log_level, "debug,sea_orm=warn");
        assert_eq!(config.app_log_file, Some(PathBuf::from("logs/app.log")));
    }
}
