//! `on-off`: team output with each player starting against not starting.

use super::{default_request, team_match_ids};
use crate::app::FbvizApp;
use crate::args::{ChartArgs, SeasonArgs};
use crate::error::CliResult;
use fbviz_common::{normalize_schedule, LineupRow, Result, ScheduleRow, TeamMatch};
use fbviz_data::DataSource;
use fbviz_graphs::{LogoSource, OnOffChart};
use fbviz_metrics::{on_off_split, OnOffRow};
use std::path::PathBuf;
use tracing::warn;

/// The team's played matches from its own side.
pub fn team_rows(schedule: &[ScheduleRow], team: &str) -> Result<Vec<TeamMatch>> {
    Ok(normalize_schedule(schedule)?
        .into_iter()
        .filter(|row| row.team == team && row.goals.is_some())
        .collect())
}

/// Splits team output by each player's starts.
pub fn prepare(
    schedule: &[ScheduleRow],
    lineups: &[LineupRow],
    team: &str,
    lineup_team: &str,
    min_starts: usize,
) -> Result<Vec<OnOffRow>> {
    on_off_split(&team_rows(schedule, team)?, lineups, lineup_team, min_starts)
}

/// Loads the season's lineups for the team's matches and draws the split.
pub async fn run<S: DataSource, L: LogoSource>(
    app: &FbvizApp<S, L>,
    season: &SeasonArgs,
    team: &str,
    lineup_team: &str,
    min_starts: usize,
    chart: &ChartArgs,
) -> CliResult<PathBuf> {
    let loader = app.loader();
    let schedule = loader
        .schedule(&season.league, std::slice::from_ref(&season.season))
        .await?;
    let ids = team_match_ids(&schedule, team);
    let batch = loader.lineups(&season.league, &season.season, &ids).await;
    if !batch.skipped.is_empty() {
        warn!("{} of {}'s lineups are missing", batch.skipped.len(), team);
    }
    let rows = prepare(&schedule, &batch.rows, team, lineup_team, min_starts)?;

    let defaults = default_request(
        &season.league,
        format!("{} with and without each starter", team),
        format!(
            "Goals and xG for and against per match when the player starts, minus when not starting. Players with at least {} starts, {}",
            min_starts,
            season.season.label()
        ),
        &format!("on_off {} {}", team, season.season),
    );
    app.write_chart(&OnOffChart, &rows, chart, defaults).await
}
