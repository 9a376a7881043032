//! Configuration loading utilities.
//!
//! Configuration is resolved in this order: an explicit path, the file named
//! by `FBVIZ_CONFIG_PATH`, `fbviz.yaml` / `fbviz.yml` in the working
//! directory, and finally the built-in defaults. Environment overrides are
//! applied on top of whichever source won, then the result is validated.

use crate::validator::ConfigValidator;
use crate::Config;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "FBVIZ_CONFIG_PATH";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading the configuration file
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        /// Path that failed to load
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration for '{field}': {message}")]
    Validation {
        /// Dotted path of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        /// Variable name
        var: String,
        /// Underlying parse error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ConfigError {
    /// Create a validation error for a field.
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ConfigError> for fbviz_common::FbvizError {
    fn from(err: ConfigError) -> Self {
        let message = err.to_string();
        Self::config_with_source(message, err)
    }
}

/// Configuration loader for the application.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment overrides.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, |var| env::var(var).ok())
    }

    /// Load configuration from a YAML file, resolving overrides through `lookup`.
    pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content)?;

        apply_overrides(&mut config, lookup)?;
        ConfigValidator::validate(&config)?;

        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parse a YAML document. Missing sections and fields take their defaults.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Resolve configuration from an optional explicit path, the environment,
    /// local files, or defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_config(path);
        }
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Self::load_config(path);
        }
        for candidate in ["fbviz.yaml", "fbviz.yml"] {
            if Path::new(candidate).exists() {
                return Self::load_config(candidate);
            }
        }

        debug!("No configuration file found, using defaults");
        Self::defaults_with(|var| env::var(var).ok())
    }

    /// Defaults with overrides applied and validated.
    pub fn defaults_with<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        apply_overrides(&mut config, lookup)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim().parse().map_err(|e| ConfigError::EnvParse {
        var: var.to_string(),
        source: Box::new(e),
    })
}

/// Apply `FBVIZ_*` overrides resolved through `lookup`.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("FBVIZ_BASE_URL") {
        config.data_source.base_url = url;
    }

    if let Some(key) = lookup("FBVIZ_API_KEY") {
        config.data_source.api_key = Some(key).filter(|k| !k.is_empty());
    }

    if let Some(timeout) = lookup("FBVIZ_TIMEOUT_SECONDS") {
        config.data_source.timeout_seconds = parse_var("FBVIZ_TIMEOUT_SECONDS", &timeout)?;
    }

    if let Some(dir) = lookup("FBVIZ_CACHE_DIR") {
        config.cache.directory = PathBuf::from(dir);
    }

    if let Some(ttl) = lookup("FBVIZ_CACHE_TTL_HOURS") {
        config.cache.ttl_hours = Some(parse_var("FBVIZ_CACHE_TTL_HOURS", &ttl)?);
    }

    if let Some(dir) = lookup("FBVIZ_OUTPUT_DIR") {
        config.output.directory = PathBuf::from(dir);
    }

    if let Some(font) = lookup("FBVIZ_FONT_FAMILY") {
        config.style.font_family = font;
    }

    if let Some(level) = lookup("FBVIZ_LOG_LEVEL") {
        config.logging.level = level;
    }

    Ok(())
}
