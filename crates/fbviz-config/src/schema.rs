//! Configuration schema definitions using serde.

use fbviz_common::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Main configuration structure for fbviz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Statistics provider configuration.
    pub data_source: DataSourceConfig,
    /// Snapshot cache configuration.
    pub cache: CacheConfig,
    /// Output configuration.
    pub output: OutputConfig,
    /// Chart styling.
    pub style: StyleConfig,
    /// Analysis parameters.
    pub analysis: AnalysisConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Statistics provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    /// Provider base URL.
    pub base_url: String,
    /// Optional API key sent as a bearer token.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// User agent header value.
    pub user_agent: String,
}

/// Snapshot cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding cache files.
    pub directory: PathBuf,
    /// Entries older than this many hours are refetched. `None` keeps them forever.
    pub ttl_hours: Option<u64>,
    /// Capacity of the in-process memory layer.
    pub memory_capacity: u64,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for rendered images.
    pub directory: PathBuf,
}

/// Chart styling passed to every renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Font family for all chart text.
    pub font_family: String,
    /// Figure background color.
    pub background: String,
    /// Plot area background color.
    pub plot_background: String,
    /// Title color.
    pub title_color: String,
    /// Subtitle and caption color.
    pub subtitle_color: String,
    /// Grid line color.
    pub grid_color: String,
    /// Gradient start color for value-mapped bars and points.
    pub low_color: String,
    /// Gradient end color for value-mapped bars and points.
    pub high_color: String,
    /// Series palette for multi-line charts.
    pub palette: Vec<String>,
    /// Figure width in inches.
    pub width_in: f64,
    /// Figure height in inches.
    pub height_in: f64,
    /// Pixels per inch.
    pub dpi: u32,
    /// Title font size in points.
    pub title_font_size: f64,
    /// Subtitle font size in points.
    pub subtitle_font_size: f64,
    /// Title line spacing multiplier.
    pub title_line_spacing: f64,
    /// Subtitle line spacing multiplier.
    pub subtitle_line_spacing: f64,
    /// Attribution caption drawn bottom-right, if any.
    pub caption: Option<String>,
    /// Convert logos to greyscale with alpha before compositing.
    pub greyscale_logo: bool,
}

/// Analysis parameters shared by the pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Percentile cut for strong/weak team classification, in (50, 100).
    pub percentile_threshold: f64,
    /// Minimum shared easy gameweeks for a pairing to be surfaced.
    pub min_good_gameweeks: usize,
    /// Played current-season matches required before the previous season is ignored.
    pub min_current_season_matches: usize,
    /// Rolling mean window, in matches.
    pub rolling_window: usize,
    /// Goal count at which the Poisson distribution is truncated.
    pub max_goals: u32,
    /// Quantile above which composite scores are highlighted.
    pub highlight_quantile: f64,
    /// Minimum games for per-group rate tables.
    pub min_games: usize,
    /// Explicit team classification; replaces the computed one when set.
    pub team_overrides: Option<TeamOverrides>,
}

/// Hand-picked team classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamOverrides {
    /// Offensively strong teams.
    pub off_strong: BTreeSet<String>,
    /// Offensively weak teams.
    pub off_weak: BTreeSet<String>,
    /// Defensively strong teams.
    pub def_strong: BTreeSet<String>,
    /// Defensively weak teams.
    pub def_weak: BTreeSet<String>,
}

impl CacheConfig {
    /// TTL as a duration, if one is configured.
    pub fn ttl(&self) -> Option<std::time::Duration> {
        self.ttl_hours
            .map(|hours| std::time::Duration::from_secs(hours * 3600))
    }
}

impl StyleConfig {
    /// Figure size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    /// Copy of this style with a different figure size.
    pub fn with_size(&self, width_in: f64, height_in: f64) -> Self {
        Self {
            width_in,
            height_in,
            ..self.clone()
        }
    }
}
