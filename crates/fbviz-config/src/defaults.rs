//! Default values for every configuration section.

use crate::schema::*;
use fbviz_common::LoggingConfig;
use std::path::PathBuf;

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: DataSourceConfig::default(),
            cache: CacheConfig::default(),
            output: OutputConfig::default(),
            style: StyleConfig::default(),
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            api_key: None,
            timeout_seconds: 30,
            user_agent: concat!("fbviz/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("fbrefData"),
            ttl_hours: None,
            memory_capacity: 256,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("imgs"),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "monospace".to_string(),
            background: "#eeeeee".to_string(),
            plot_background: "#eeeeee".to_string(),
            title_color: "#000000".to_string(),
            subtitle_color: "#5a5a5a".to_string(),
            grid_color: "#d3d3d3".to_string(),
            low_color: "#748cab".to_string(),
            high_color: "#e26d5c".to_string(),
            palette: vec![
                "#1d3557".to_string(),
                "#669bbc".to_string(),
                "#e76f51".to_string(),
                "#588157".to_string(),
            ],
            width_in: 8.0,
            height_in: 8.0,
            dpi: 100,
            title_font_size: 15.0,
            subtitle_font_size: 9.0,
            title_line_spacing: 1.2,
            subtitle_line_spacing: 1.5,
            caption: Some("Data from FBRef".to_string()),
            greyscale_logo: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            percentile_threshold: 60.0,
            min_good_gameweeks: 5,
            min_current_season_matches: 80,
            rolling_window: 10,
            max_goals: 5,
            highlight_quantile: 0.85,
            min_games: 10,
            team_overrides: None,
        }
    }
}
