//! `team-form`: rolling points, goals and xG for one team.

use super::{default_request, seasons_label};
use crate::app::FbvizApp;
use crate::args::{ChartArgs, SeasonsArgs};
use crate::error::CliResult;
use fbviz_common::{normalize_schedule, Result, ScheduleRow};
use fbviz_data::DataSource;
use fbviz_graphs::{LogoSource, TeamFormChart};
use fbviz_metrics::{team_form, TeamForm};
use std::path::PathBuf;

/// Rolling form over every season in the schedule.
pub fn prepare(schedule: &[ScheduleRow], team: &str, window: usize) -> Result<TeamForm> {
    team_form(&normalize_schedule(schedule)?, team, window)
}

/// Loads the seasons and draws the form panels.
pub async fn run<S: DataSource, L: LogoSource>(
    app: &FbvizApp<S, L>,
    seasons: &SeasonsArgs,
    team: &str,
    window: usize,
    chart: &ChartArgs,
) -> CliResult<PathBuf> {
    let schedule = app.loader().schedule(&seasons.league, &seasons.seasons).await?;
    let form = prepare(&schedule, team, window)?;

    let label = seasons_label(&seasons.seasons);
    let defaults = default_request(
        &seasons.league,
        format!("{} form, {}", team, label),
        format!(
            "{}-match rolling averages of points, goals and xG for and against over {} matches. Flat lines mark the average.",
            window,
            form.matches()
        ),
        &format!("team_form {} {}", team, label),
    );
    app.write_chart(&TeamFormChart, &form, chart, defaults).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbviz_common::test_utils::schedule_fixtures::four_team_season;

    #[test]
    fn test_prepare_spans_seasons() {
        let mut schedule = four_team_season("2324");
        schedule.extend(four_team_season("2425"));
        let form = prepare(&schedule, "Delta", 3).unwrap();
        assert_eq!(form.matches(), 12);
        assert_eq!(form.season_starts.len(), 2);
    }
}
