//! `creators`: assists against expected assists for a team's creators.

use super::default_request;
use crate::app::FbvizApp;
use crate::args::{ChartArgs, SeasonArgs};
use crate::error::CliResult;
use fbviz_common::{FbvizError, Result, StatRow};
use fbviz_data::DataSource;
use fbviz_graphs::{BarChart, BarSet, LogoSource};
use fbviz_metrics::creator_ranking;
use std::path::PathBuf;

/// Bars for the `limit` players with the most expected assists.
pub fn prepare(rows: &[StatRow], team: &str, limit: usize) -> Result<BarSet> {
    let creators = creator_ranking(rows, team, limit);
    if creators.is_empty() {
        return Err(FbvizError::validation_field(
            format!("No player of '{team}' has expected assists"),
            "team",
        ));
    }
    Ok(BarSet::from_creators(&creators))
}

/// Loads season passing stats and draws the bars.
pub async fn run<S: DataSource, L: LogoSource>(
    app: &FbvizApp<S, L>,
    season: &SeasonArgs,
    team: &str,
    limit: usize,
    stat_type: &str,
    chart: &ChartArgs,
) -> CliResult<PathBuf> {
    let rows = app
        .loader()
        .player_season_stats(&season.league, std::slice::from_ref(&season.season), stat_type)
        .await?;
    let bars = prepare(&rows, team, limit)?;

    let defaults = default_request(
        &season.league,
        format!("{}: who finishes off their chances?", team),
        format!(
            "Assists minus expected assists for the {} players creating the most xA, {}",
            bars.rows.len(),
            season.season.label()
        ),
        &format!("creators {} {}", team, season.season),
    );
    app.write_chart(&BarChart::CREATORS, &bars, chart, defaults).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbviz_common::test_utils::stat_fixtures::stat_row;

    #[test]
    fn test_prepare_keeps_team_creators() {
        let rows = vec![
            stat_row("A", "Alpha", &[("ast", 5.0), ("expected_xa", 3.0)]),
            stat_row("B", "Alpha", &[("ast", 1.0), ("expected_xa", 2.5)]),
            stat_row("C", "Alpha", &[("ast", 2.0), ("expected_xa", 0.0)]),
            stat_row("D", "Beta", &[("ast", 9.0), ("expected_xa", 4.0)]),
        ];
        let bars = prepare(&rows, "Alpha", 10).unwrap();
        let labels: Vec<&str> = bars.rows.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(bars.rows[0].good, Some(true));
        assert_eq!(bars.rows[1].good, Some(false));

        assert!(prepare(&rows, "Gamma", 10).is_err());
    }
}
