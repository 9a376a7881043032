//! `rolling-psxg`: a keeper's rolling PSxG faced against goals conceded.

use super::{default_request, seasons_label, team_match_ids};
use crate::app::FbvizApp;
use crate::args::{ChartArgs, SeasonsArgs};
use crate::error::CliResult;
use fbviz_common::{Result, StatRow};
use fbviz_data::DataSource;
use fbviz_graphs::{LogoSource, RollingPsxgChart};
use fbviz_metrics::{keeper_matches, rolling_psxg, RollingPsxg};
use std::path::PathBuf;
use tracing::{info, warn};

/// Rolling series from per-match keeper rows in match order.
pub fn prepare(rows: &[StatRow], player: &str, window: usize) -> Result<RollingPsxg> {
    rolling_psxg(player, keeper_matches(rows, player), window)
}

/// Loads each season's keeper stats for the team's matches and draws them.
pub async fn run<S: DataSource, L: LogoSource>(
    app: &FbvizApp<S, L>,
    seasons: &SeasonsArgs,
    player: &str,
    team: &str,
    window: usize,
    stat_type: &str,
    chart: &ChartArgs,
) -> CliResult<PathBuf> {
    let loader = app.loader();
    let mut rows = Vec::new();
    for season in &seasons.seasons {
        let schedule = loader.schedule(&seasons.league, std::slice::from_ref(season)).await?;
        let ids = team_match_ids(&schedule, team);
        info!("{} played {} matches in {}", team, ids.len(), season);

        let batch = loader
            .player_match_stats(&seasons.league, season, &ids, stat_type)
            .await;
        if !batch.skipped.is_empty() {
            warn!("{} of {}'s matches in {} are missing", batch.skipped.len(), team, season);
        }
        rows.extend(batch.rows);
    }
    let series = prepare(&rows, player, window)?;

    let label = seasons_label(&seasons.seasons);
    let defaults = default_request(
        &seasons.league,
        format!("{}: shot-stopping over time", player),
        format!(
            "{}-match rolling average of post-shot xG faced against goals conceded, {} {}. Shaded where the keeper prevented goals.",
            window, team, label
        ),
        &format!("{} PSxG {}", player, label),
    );
    app.write_chart(&RollingPsxgChart, &series, chart, defaults).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbviz_common::test_utils::stat_fixtures::stat_row;
    use fbviz_common::SeasonId;

    #[test]
    fn test_prepare_picks_the_keeper() {
        let rows: Vec<StatRow> = [(1.2, 1.0), (0.4, 2.0), (2.0, 1.0)]
            .iter()
            .enumerate()
            .flat_map(|(i, &(psxg, ga))| {
                let mut keeper = stat_row("Keeper", "Alpha", &[("Shot Stopping_PSxG", psxg), ("Shot Stopping_GA", ga)]);
                keeper.season = Some(SeasonId::new("2425"));
                keeper.game_id = Some(format!("m{i}"));
                let mut other = keeper.clone();
                other.player = "Backup".to_string();
                [keeper, other]
            })
            .collect();

        let series = prepare(&rows, "Keeper", 2).unwrap();
        assert_eq!(series.matches.len(), 3);
        assert_eq!(series.gap.len(), 3);
        assert!(prepare(&rows, "Nobody", 2).is_err());
    }
}
