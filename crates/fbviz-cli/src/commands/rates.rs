//! `venue-goals` and `referee-fouls`: per-game rates by group.

use super::{default_request, seasons_label};
use crate::app::FbvizApp;
use crate::args::{ChartArgs, SeasonArgs, SeasonsArgs};
use crate::error::CliResult;
use fbviz_common::{FbvizError, Result, ScheduleRow, StatRow};
use fbviz_data::{played_match_ids, DataSource};
use fbviz_graphs::{BarChart, BarSet, LogoSource};
use fbviz_metrics::{referee_foul_rates, venue_goal_rates};
use std::path::PathBuf;
use tracing::warn;

/// Goals per match at each home ground, highest on top.
pub fn prepare_venue_goals(schedule: &[ScheduleRow]) -> Result<BarSet> {
    let rates = venue_goal_rates(schedule)?;
    if rates.is_empty() {
        return Err(FbvizError::validation("No played matches with a venue"));
    }
    Ok(BarSet::from_group_rates(&rates, "Goals per match", true))
}

/// Fouls per match by referee, highest on top.
pub fn prepare_referee_fouls(schedule: &[ScheduleRow], match_stats: &[StatRow], min_games: usize) -> Result<BarSet> {
    let rates = referee_foul_rates(schedule, match_stats, min_games);
    if rates.is_empty() {
        return Err(FbvizError::validation_field(
            format!("No referee has {min_games} or more matches with fouls data"),
            "min_games",
        ));
    }
    Ok(BarSet::from_group_rates(&rates, "Fouls per match", false))
}

/// Loads schedules and draws goals per venue.
pub async fn run_venue_goals<S: DataSource, L: LogoSource>(
    app: &FbvizApp<S, L>,
    seasons: &SeasonsArgs,
    chart: &ChartArgs,
) -> CliResult<PathBuf> {
    let schedule = app.loader().schedule(&seasons.league, &seasons.seasons).await?;
    let bars = prepare_venue_goals(&schedule)?;

    let label = seasons_label(&seasons.seasons);
    let defaults = default_request(
        &seasons.league,
        format!("Goals per match by stadium, {}", seasons.league),
        format!("Average goals in every match played at each home ground, {}", label),
        &format!("venue_goals {}", label),
    );
    app.write_chart(&BarChart::VENUE_GOALS, &bars, chart, defaults).await
}

/// Loads per-match fouls and draws fouls per referee.
pub async fn run_referee_fouls<S: DataSource, L: LogoSource>(
    app: &FbvizApp<S, L>,
    season: &SeasonArgs,
    min_games: usize,
    stat_type: &str,
    chart: &ChartArgs,
) -> CliResult<PathBuf> {
    let loader = app.loader();
    let schedule = loader
        .schedule(&season.league, std::slice::from_ref(&season.season))
        .await?;
    let ids = played_match_ids(&schedule);
    let batch = loader
        .player_match_stats(&season.league, &season.season, &ids, stat_type)
        .await;
    if !batch.skipped.is_empty() {
        warn!("{} matches left out of the referee table", batch.skipped.len());
    }
    let bars = prepare_referee_fouls(&schedule, &batch.rows, min_games)?;

    let defaults = default_request(
        &season.league,
        format!("Fouls per match by referee, {}", season.league),
        format!(
            "Both teams' fouls per match, referees with at least {} matches, {}",
            min_games,
            season.season.label()
        ),
        &format!("referee_fouls {}", season.season),
    );
    app.write_chart(&BarChart::REFEREE_FOULS, &bars, chart, defaults).await
}
