//! `tackling`: tackles per 90 against the share of tackles won.

use super::default_request;
use crate::app::FbvizApp;
use crate::args::{ChartArgs, SeasonArgs};
use crate::error::CliResult;
use fbviz_common::{FbvizError, Result, StatRow};
use fbviz_data::DataSource;
use fbviz_graphs::{LogoSource, TacklingChart};
use fbviz_metrics::{tackling_ranking, TacklingRow};
use std::path::PathBuf;

/// Ranks players, optionally from one team only.
pub fn prepare(rows: &[StatRow], team: Option<&str>, highlight_quantile: f64) -> Result<Vec<TacklingRow>> {
    let selected: Vec<StatRow> = rows
        .iter()
        .filter(|row| team.map_or(true, |team| row.team == team))
        .cloned()
        .collect();
    if selected.is_empty() {
        return Err(FbvizError::validation_field(
            format!("No player rows for team '{}'", team.unwrap_or_default()),
            "team",
        ));
    }
    tackling_ranking(&selected, highlight_quantile)
}

/// Loads season stats and draws the scatter.
pub async fn run<S: DataSource, L: LogoSource>(
    app: &FbvizApp<S, L>,
    season: &SeasonArgs,
    team: Option<&str>,
    stat_type: &str,
    chart: &ChartArgs,
) -> CliResult<PathBuf> {
    let rows = app
        .loader()
        .player_season_stats(&season.league, std::slice::from_ref(&season.season), stat_type)
        .await?;
    let ranking = prepare(&rows, team, app.config().analysis.highlight_quantile)?;

    let scope = team.unwrap_or(&season.league);
    let defaults = default_request(
        &season.league,
        format!("Who tackles most, and wins them? {}", scope),
        format!(
            "Players at or above the median of minutes and tackles per 90, {} {}. Highlighted players have the best combined score.",
            season.league,
            season.season.label()
        ),
        &format!("tackling {} {}", scope, season.season),
    );
    app.write_chart(&TacklingChart, &ranking, chart, defaults).await
}
