//! Goalkeeper shot stopping: post-shot xG faced against goals conceded.

use crate::form::season_starts;
use crate::stats::rolling_mean;
use fbviz_common::{FbvizError, Result, SeasonId, StatRow};
use serde::Serialize;
use tracing::debug;

/// Post-shot expected goals faced.
pub const PSXG_COLUMN: &str = "Shot Stopping_PSxG";
/// Goals conceded.
pub const GOALS_AGAINST_COLUMN: &str = "Shot Stopping_GA";

/// One match of one keeper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeeperMatch {
    /// Provider match identifier.
    pub game_id: Option<String>,
    /// Season of the match.
    pub season: SeasonId,
    /// Post-shot xG faced.
    pub psxg: f64,
    /// Goals conceded.
    pub goals_against: f64,
}

/// Rolling shot-stopping series of one keeper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingPsxg {
    /// Keeper name.
    pub player: String,
    /// Matches in order.
    pub matches: Vec<KeeperMatch>,
    /// Rolling mean of PSxG faced.
    pub psxg_rolling: Vec<f64>,
    /// Rolling mean of goals conceded.
    pub ga_rolling: Vec<f64>,
    /// `psxg_rolling - ga_rolling`; positive means goals prevented.
    pub gap: Vec<f64>,
    /// Index of the first match of each season.
    pub season_starts: Vec<(usize, SeasonId)>,
}

/// Picks one keeper's rows out of per-match keeper stats, in input order.
///
/// Rows without a season or without both shot-stopping columns are dropped,
/// as are rows whose columns are not finite.
pub fn keeper_matches(rows: &[StatRow], player: &str) -> Vec<KeeperMatch> {
    rows.iter()
        .filter(|row| row.player == player)
        .filter_map(|row| {
            Some(KeeperMatch {
                game_id: row.game_id.clone(),
                season: row.season.clone()?,
                psxg: row.stat(PSXG_COLUMN)?,
                goals_against: row.stat(GOALS_AGAINST_COLUMN)?,
            })
        })
        .filter(KeeperMatch::is_finite)
        .collect()
}

impl KeeperMatch {
    /// Both columns are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.psxg.is_finite() && self.goals_against.is_finite()
    }
}

/// Trailing means of PSxG and goals conceded, partially filled at the start.
///
/// Matches with a non-finite column are dropped first, so every series has
/// one value per kept match.
pub fn rolling_psxg(player: &str, mut matches: Vec<KeeperMatch>, window: usize) -> Result<RollingPsxg> {
    let total = matches.len();
    matches.retain(KeeperMatch::is_finite);
    if matches.len() < total {
        debug!("Dropped {} matches of {} without finite PSxG or goals", total - matches.len(), player);
    }
    if matches.is_empty() {
        return Err(FbvizError::validation_field(
            format!("No keeper matches for '{player}'"),
            "player",
        ));
    }

    let psxg: Vec<f64> = matches.iter().map(|m| m.psxg).collect();
    let goals: Vec<f64> = matches.iter().map(|m| m.goals_against).collect();
    let psxg_rolling: Vec<f64> = rolling_mean(&psxg, window, 1).into_iter().flatten().collect();
    let ga_rolling: Vec<f64> = rolling_mean(&goals, window, 1).into_iter().flatten().collect();
    let gap = psxg_rolling
        .iter()
        .zip(&ga_rolling)
        .map(|(p, g)| p - g)
        .collect();
    let season_starts = season_starts(matches.iter().map(|m| &m.season));
    debug!("{} matches for {} over {} seasons", matches.len(), player, season_starts.len());

    Ok(RollingPsxg {
        player: player.to_string(),
        matches,
        psxg_rolling,
        ga_rolling,
        gap,
        season_starts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbviz_common::test_utils::assert_approx_eq;
    use fbviz_common::test_utils::stat_fixtures::stat_row;

    fn keeper_row(player: &str, season: &str, psxg: f64, ga: f64) -> StatRow {
        let mut row = stat_row(player, "Torino", &[("Shot Stopping_PSxG", psxg), ("Shot Stopping_GA", ga)]);
        row.season = Some(SeasonId::new(season));
        row.position = Some("GK".to_string());
        row
    }

    #[test]
    fn test_keeper_matches_filters_player() {
        let rows = vec![
            keeper_row("Milinkovic-Savic", "2324", 1.2, 1.0),
            keeper_row("Someone Else", "2324", 3.0, 0.0),
            keeper_row("Milinkovic-Savic", "2425", 0.4, 2.0),
        ];
        let matches = keeper_matches(&rows, "Milinkovic-Savic");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].goals_against, 2.0);
    }

    #[test]
    fn test_rolling_gap_and_season_starts() {
        let rows = vec![
            keeper_row("K", "2324", 2.0, 1.0),
            keeper_row("K", "2324", 1.0, 1.0),
            keeper_row("K", "2425", 0.0, 2.0),
        ];
        let series = rolling_psxg("K", keeper_matches(&rows, "K"), 2).unwrap();

        assert_eq!(series.psxg_rolling, vec![2.0, 1.5, 0.5]);
        assert_eq!(series.ga_rolling, vec![1.0, 1.0, 1.5]);
        assert_approx_eq(series.gap[0], 1.0, 1e-12);
        assert_approx_eq(series.gap[2], -1.0, 1e-12);
        assert_eq!(
            series.season_starts,
            vec![(0, SeasonId::new("2324")), (2, SeasonId::new("2425"))]
        );
    }

    #[test]
    fn test_non_finite_matches_keep_series_aligned() {
        let mut rows = vec![
            keeper_row("K", "2324", 1.0, 1.0),
            keeper_row("K", "2324", 1.0, 0.0),
            keeper_row("K", "2425", 2.0, 1.0),
        ];
        rows[0].stats.insert("Shot Stopping_PSxG".to_string(), f64::NAN);
        assert_eq!(keeper_matches(&rows, "K").len(), 2);

        let matches: Vec<KeeperMatch> = rows
            .iter()
            .map(|row| KeeperMatch {
                game_id: None,
                season: row.season.clone().unwrap(),
                psxg: row.stats["Shot Stopping_PSxG"],
                goals_against: row.stats["Shot Stopping_GA"],
            })
            .collect();
        let series = rolling_psxg("K", matches, 3).unwrap();

        assert_eq!(series.matches.len(), 2);
        assert_eq!(series.psxg_rolling, vec![1.0, 1.5]);
        assert_eq!(series.ga_rolling, vec![0.0, 0.5]);
        assert_eq!(series.gap, vec![1.0, 1.0]);
        assert_eq!(
            series.season_starts,
            vec![(0, SeasonId::new("2324")), (1, SeasonId::new("2425"))]
        );

        let only_nan = vec![KeeperMatch {
            game_id: None,
            season: SeasonId::new("2425"),
            psxg: f64::NAN,
            goals_against: 1.0,
        }];
        assert!(rolling_psxg("K", only_nan, 3).is_err());
    }

    #[test]
    fn test_rolling_requires_matches() {
        assert!(rolling_psxg("K", Vec::new(), 10).is_err());
    }
}
