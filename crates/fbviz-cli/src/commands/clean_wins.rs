//! `clean-wins`: wins by two or more goals without conceding.

use super::{default_request, seasons_label};
use crate::app::FbvizApp;
use crate::args::{ChartArgs, SeasonsArgs};
use crate::error::CliResult;
use fbviz_common::{normalize_schedule, Result, ScheduleRow};
use fbviz_data::DataSource;
use fbviz_graphs::{clean_win_cells, CleanWinChart, LogoSource};
use fbviz_metrics::{clean_win_table, CleanWinTable};
use std::path::PathBuf;

/// Table for the teams of the latest season.
pub fn prepare(schedule: &[ScheduleRow]) -> Result<CleanWinTable> {
    Ok(clean_win_table(&normalize_schedule(schedule)?))
}

/// Prints the table and, unless `no_chart`, draws it.
pub async fn run<S: DataSource, L: LogoSource>(
    app: &FbvizApp<S, L>,
    seasons: &SeasonsArgs,
    no_chart: bool,
    chart: &ChartArgs,
) -> CliResult<Option<PathBuf>> {
    let schedule = app.loader().schedule(&seasons.league, &seasons.seasons).await?;
    let table = prepare(&schedule)?;
    print!("{}", clean_win_cells(&table).to_text());
    if no_chart {
        return Ok(None);
    }

    let label = seasons_label(&seasons.seasons);
    let defaults = default_request(
        &seasons.league,
        format!("Clean wins, {} {}", seasons.league, label),
        "Wins by two or more goals without conceding, per season. Trend is the yearly change over the last five seasons."
            .to_string(),
        &format!("clean_wins {}", label),
    );
    Ok(Some(app.write_chart(&CleanWinChart, &table, chart, defaults).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbviz_common::test_utils::schedule_fixtures::four_team_season;

    #[test]
    fn test_prepare_counts_each_season() {
        let mut schedule = four_team_season("2324");
        schedule.extend(four_team_season("2425"));
        let table = prepare(&schedule).unwrap();

        assert_eq!(table.seasons.len(), 2);
        assert_eq!(table.rows.len(), 4);
        let alpha = table.rows.iter().find(|row| row.team == "Alpha").unwrap();
        assert_eq!(alpha.per_season, vec![Some(3), Some(3)]);
        assert_eq!(alpha.games, 12);
    }
}
