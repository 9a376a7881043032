//! Configuration validation.

use crate::loader::ConfigError;
use crate::schema::{AnalysisConfig, Config, StyleConfig};

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting the first offending field.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.data_source.base_url.trim().is_empty() {
            return Err(ConfigError::validation(
                "data_source.base_url",
                "must not be empty",
            ));
        }
        if config.data_source.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "data_source.timeout_seconds",
                "must be positive",
            ));
        }
        if config.cache.memory_capacity == 0 {
            return Err(ConfigError::validation(
                "cache.memory_capacity",
                "must be positive",
            ));
        }
        validate_style(&config.style)?;
        validate_analysis(&config.analysis)
    }
}

fn validate_style(style: &StyleConfig) -> Result<(), ConfigError> {
    if !(style.width_in > 0.0 && style.height_in > 0.0) {
        return Err(ConfigError::validation(
            "style.width_in",
            "figure dimensions must be positive",
        ));
    }
    if style.dpi == 0 {
        return Err(ConfigError::validation("style.dpi", "must be positive"));
    }
    if style.title_font_size <= 0.0 || style.subtitle_font_size <= 0.0 {
        return Err(ConfigError::validation(
            "style.subtitle_font_size",
            "font sizes must be positive",
        ));
    }
    let colors = [
        ("style.background", &style.background),
        ("style.plot_background", &style.plot_background),
        ("style.title_color", &style.title_color),
        ("style.subtitle_color", &style.subtitle_color),
        ("style.grid_color", &style.grid_color),
        ("style.low_color", &style.low_color),
        ("style.high_color", &style.high_color),
    ];
    for (field, color) in colors {
        if !is_hex_color(color) {
            return Err(ConfigError::validation(
                field,
                format!("'{color}' is not a #RRGGBB color"),
            ));
        }
    }
    if let Some(bad) = style.palette.iter().find(|c| !is_hex_color(c)) {
        return Err(ConfigError::validation(
            "style.palette",
            format!("'{bad}' is not a #RRGGBB color"),
        ));
    }
    Ok(())
}

fn validate_analysis(analysis: &AnalysisConfig) -> Result<(), ConfigError> {
    let p = analysis.percentile_threshold;
    if !(p > 50.0 && p < 100.0) {
        return Err(ConfigError::validation(
            "analysis.percentile_threshold",
            format!("{p} must lie strictly between 50 and 100"),
        ));
    }
    if analysis.rolling_window == 0 {
        return Err(ConfigError::validation(
            "analysis.rolling_window",
            "must be at least 1",
        ));
    }
    if !(0.0..=1.0).contains(&analysis.highlight_quantile) {
        return Err(ConfigError::validation(
            "analysis.highlight_quantile",
            "must lie in [0, 1]",
        ));
    }
    if analysis.max_goals == 0 {
        return Err(ConfigError::validation(
            "analysis.max_goals",
            "must be at least 1",
        ));
    }
    Ok(())
}

/// True for `#RRGGBB` strings.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#FFFFFF"));
        assert!(is_hex_color("#5a5a5a"));
        assert!(!is_hex_color("FFFFFF"));
        assert!(!is_hex_color("#FFF"));
        assert!(!is_hex_color("#GGGGGG"));
    }

    #[test]
    fn test_rejects_empty_base_url() {
        let mut config = Config::default();
        config.data_source.base_url = "  ".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_non_positive_figure() {
        let mut config = Config::default();
        config.style.height_in = 0.0;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_percentile_bounds_are_exclusive() {
        for p in [50.0, 100.0, 20.0] {
            let mut config = Config::default();
            config.analysis.percentile_threshold = p;
            assert!(ConfigValidator::validate(&config).is_err(), "{p}");
        }
        let mut config = Config::default();
        config.analysis.percentile_threshold = 75.0;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_zero_rolling_window() {
        let mut config = Config::default();
        config.analysis.rolling_window = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_bad_palette_entry() {
        let mut config = Config::default();
        config.style.palette.push("red".to_string());
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("style.palette"));
    }
}
