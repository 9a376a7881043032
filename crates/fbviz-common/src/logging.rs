//! Structured logging setup for the fbviz binary.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Configuration for the logging system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "fbviz_data=debug").
    pub level: String,
    /// Emit one JSON object per event instead of human readable lines.
    pub json_format: bool,
    /// Optional file path for log output; stderr otherwise.
    pub file_path: Option<String>,
    /// Whether to log span open/close events.
    pub include_spans: bool,
    /// Whether to include target module information.
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Builds the env filter, preferring `RUST_LOG` when it is set.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given configuration.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(config.env_filter());

    let file = config.file_path.as_deref().map(file_appender).transpose()?;

    if config.json_format {
        let layer = fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_target(config.include_targets);

        match file {
            Some(file) => registry.with(layer.with_writer(file)).try_init()?,
            None => registry.with(layer.with_writer(std::io::stderr)).try_init()?,
        }
    } else {
        let layer = fmt::layer()
            .with_span_events(span_events)
            .with_target(config.include_targets);

        match file {
            Some(file) => registry
                .with(layer.with_ansi(false).with_writer(file))
                .try_init()?,
            None => registry.with(layer.with_writer(std::io::stderr)).try_init()?,
        }
    }

    Ok(())
}

/// Appending, non-rotating writer for `path`. Parent directories are created.
fn file_appender(path: &str) -> std::io::Result<RollingFileAppender> {
    let path = Path::new(path);
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Log path '{}' has no file name", path.display()),
        )
    })?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)?;
    Ok(rolling::never(directory, file_name))
}

/// Initialize logging at the given level with otherwise default settings.
pub fn init_logging_with_level(
    level: impl Into<String>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging(&LoggingConfig {
        level: level.into(),
        ..LoggingConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
        assert!(config.file_path.is_none());
        assert!(!config.include_spans);
        assert!(config.include_targets);
    }

    #[test]
    fn test_file_appender_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("fbviz.log");
        file_appender(path.to_str().unwrap()).unwrap();
        assert!(dir.path().join("logs").is_dir());
        assert!(file_appender("").is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: LoggingConfig = serde_json::from_str(r#"{"level": "debug"}"#).unwrap();
        assert_eq!(config.level, "debug");
        assert!(config.include_targets);
    }
}
