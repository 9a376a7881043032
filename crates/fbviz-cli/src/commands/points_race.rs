//! `points-race`: cumulative points against cumulative expected points.

use super::default_request;
use crate::app::FbvizApp;
use crate::args::{ChartArgs, SeasonArgs};
use crate::error::{CliError, CliResult};
use fbviz_common::{normalize_schedule, Result, ScheduleRow};
use fbviz_data::DataSource;
use fbviz_graphs::{LogoSource, PointsRaceChart};
use fbviz_metrics::{points_race, PointsRace};
use std::path::PathBuf;
use tracing::info;

/// Races of the selected teams, in the order given.
pub fn prepare(schedule: &[ScheduleRow], teams: &[String], max_goals: u32) -> Result<Vec<PointsRace>> {
    let rows = normalize_schedule(schedule)?;
    points_race(&rows, teams, max_goals)
}

/// Loads one season and draws the race.
pub async fn run<S: DataSource, L: LogoSource>(
    app: &FbvizApp<S, L>,
    season: &SeasonArgs,
    teams: &[String],
    chart: &ChartArgs,
) -> CliResult<PathBuf> {
    if teams.is_empty() {
        return Err(CliError::Usage("at least one team is needed".to_string()));
    }

    let schedule = app
        .loader()
        .schedule(&season.league, std::slice::from_ref(&season.season))
        .await?;
    let races = prepare(&schedule, teams, app.config().analysis.max_goals)?;
    for race in &races {
        info!("{}: {:+.2} points over expectation", race.team, race.over_performance());
    }

    let defaults = default_request(
        &season.league,
        format!("{} points race", teams.join(" vs ")),
        format!(
            "Cumulative points (solid) against cumulative expected points from xG (faded), {} {}",
            season.league,
            season.season.label()
        ),
        &format!("points_race {} {}", season.season, teams.join(" ")),
    );
    app.write_chart(&PointsRaceChart, &races, chart, defaults).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbviz_common::test_utils::schedule_fixtures::{four_team_future, four_team_season};

    #[test]
    fn test_prepare_ignores_future_fixtures() {
        let mut schedule = four_team_season("2425");
        schedule.extend(four_team_future("2425"));
        let races = prepare(&schedule, &["Alpha".to_string()], 5).unwrap();

        assert_eq!(races.len(), 1);
        assert_eq!(races[0].team, "Alpha");
        assert_eq!(races[0].points.len(), 6);
    }

    #[test]
    fn test_prepare_rejects_unknown_team() {
        let schedule = four_team_season("2425");
        assert!(prepare(&schedule, &["Nobody".to_string()], 5).is_err());
    }
}
