//! Statistics provider access.
//!
//! [`DataSource`] is the seam between the pipelines and the provider. The
//! HTTP implementation issues one GET per query against
//! `<base_url>/<endpoint>` and expects a JSON array of rows.

use async_trait::async_trait;
use fbviz_common::{flatten_stat_object, FbvizError, LineupRow, Result, ScheduleRow, SeasonId, StatRow};
use fbviz_config::DataSourceConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Read access to the statistics provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Full schedule of one league season, played and unplayed fixtures.
    async fn read_schedule(&self, league: &str, season: &SeasonId) -> Result<Vec<ScheduleRow>>;

    /// Player season totals for one stat table (e.g. `"defense"`, `"keeper"`).
    async fn read_player_season_stats(
        &self,
        league: &str,
        season: &SeasonId,
        stat_type: &str,
    ) -> Result<Vec<StatRow>>;

    /// Player stats for one match and stat table.
    async fn read_player_match_stats(
        &self,
        league: &str,
        season: &SeasonId,
        match_id: &str,
        stat_type: &str,
    ) -> Result<Vec<StatRow>>;

    /// Lineup of one match, both teams.
    async fn read_lineup(&self, league: &str, season: &SeasonId, match_id: &str) -> Result<Vec<LineupRow>>;
}

/// Columns that identify a player row rather than measure something.
const IDENTITY_COLUMNS: &[&str] = &[
    "league", "season", "team", "player", "nation", "pos", "position", "age", "born", "game",
    "game_id", "match_id", "matches",
];

/// HTTP client for the statistics provider.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpDataSource {
    /// Create a client from configuration.
    pub fn new(config: &DataSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FbvizError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Underlying HTTP client, shared with image downloads.
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Build the request URL for an endpoint and its query parameters.
    pub fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, endpoint);
        Url::parse_with_params(&raw, params).map_err(|e| {
            FbvizError::config_with_source(format!("Invalid data source URL '{raw}'"), e)
        })
    }

    #[instrument(skip(self, params), fields(endpoint = %endpoint))]
    async fn fetch_rows(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<Value>> {
        let url = self.endpoint_url(endpoint, params)?;
        debug!("Requesting {}", url);

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FbvizError::data_source_with_status(
                format!("Provider returned {status} for {endpoint}"),
                status.as_u16(),
            ));
        }

        let rows: Vec<Value> = response.json().await?;
        info!("Fetched {} rows from {}", rows.len(), endpoint);
        Ok(rows)
    }

    async fn fetch_typed<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        self.fetch_rows(endpoint, params)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(FbvizError::from))
            .collect()
    }

    /// Download raw bytes, e.g. a team logo. No retry.
    #[instrument(skip(self))]
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FbvizError::data_source_with_status(
                format!("Download of {url} returned {status}"),
                status.as_u16(),
            ));
        }
        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn read_schedule(&self, league: &str, season: &SeasonId) -> Result<Vec<ScheduleRow>> {
        self.fetch_typed("schedule", &[("league", league), ("season", season.0.as_str())])
            .await
    }

    async fn read_player_season_stats(
        &self,
        league: &str,
        season: &SeasonId,
        stat_type: &str,
    ) -> Result<Vec<StatRow>> {
        let params = [("league", league), ("season", season.0.as_str()), ("stat_type", stat_type)];
        self.fetch_rows("player_season_stats", &params)
            .await?
            .iter()
            .map(stat_row_from_value)
            .collect()
    }

    async fn read_player_match_stats(
        &self,
        league: &str,
        season: &SeasonId,
        match_id: &str,
        stat_type: &str,
    ) -> Result<Vec<StatRow>> {
        let params = [
            ("league", league),
            ("season", season.0.as_str()),
            ("match_id", match_id),
            ("stat_type", stat_type),
        ];
        self.fetch_rows("player_match_stats", &params)
            .await?
            .iter()
            .map(stat_row_from_value)
            .collect()
    }

    async fn read_lineup(&self, league: &str, season: &SeasonId, match_id: &str) -> Result<Vec<LineupRow>> {
        let params = [("league", league), ("season", season.0.as_str()), ("match_id", match_id)];
        self.fetch_typed("lineup", &params).await
    }
}

/// Convert one provider stat row into a [`StatRow`].
///
/// Identity columns are lifted out; every other column, nested groups
/// included, is flattened into `group_stat` numeric columns.
pub fn stat_row_from_value(value: &Value) -> Result<StatRow> {
    let object = value
        .as_object()
        .ok_or_else(|| FbvizError::validation("Stat row is not a JSON object"))?;

    let player = text_field(object, &["player", "Player"])
        .ok_or_else(|| FbvizError::validation_field("Stat row has no player", "player"))?;

    let measures: Map<String, Value> = object
        .iter()
        .filter(|(name, _)| !IDENTITY_COLUMNS.contains(&name.to_lowercase().as_str()))
        .map(|(name, v)| (name.clone(), v.clone()))
        .collect();

    Ok(StatRow {
        player,
        team: text_field(object, &["team", "Team", "Squad"]).unwrap_or_default(),
        position: text_field(object, &["position", "pos", "Pos"]),
        game_id: text_field(object, &["game_id", "match_id", "game"]),
        season: text_field(object, &["season"]).map(SeasonId::new),
        stats: flatten_stat_object(&Value::Object(measures)),
    })
}

fn text_field(object: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match object.get(*name)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}
