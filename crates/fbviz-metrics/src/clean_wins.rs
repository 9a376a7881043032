//! Clean wins: matches won by two or more goals without conceding.

use crate::stats::trend_slope;
use fbviz_common::{round_to, SeasonId, TeamMatch};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Minimum goals for a clean win.
pub const CLEAN_WIN_MIN_GOALS: u32 = 2;

/// Seasons covered by the trend column.
pub const TREND_SEASONS: usize = 5;

/// Whether a played match is a clean win for `row.team`.
pub fn is_clean_win(row: &TeamMatch) -> bool {
    matches!((row.goals, row.opponent_goals), (Some(goals), Some(0)) if goals >= CLEAN_WIN_MIN_GOALS)
}

/// One team's row in the clean-win table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanWinRow {
    /// Team name.
    pub team: String,
    /// Clean wins per season column; `None` where the team did not play.
    pub per_season: Vec<Option<u32>>,
    /// Clean wins over every season.
    pub total: u32,
    /// Played matches over every season.
    pub games: u32,
    /// `total / games * 100`, two decimals.
    pub percentage: f64,
    /// Least-squares slope over the last seasons.
    pub trend: f64,
}

/// Clean-win counts per team and season.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanWinTable {
    /// Season columns, oldest first.
    pub seasons: Vec<SeasonId>,
    /// Rows sorted by percentage, highest first.
    pub rows: Vec<CleanWinRow>,
}

/// Builds the clean-win table for the teams of the latest season.
pub fn clean_win_table(rows: &[TeamMatch]) -> CleanWinTable {
    let played: Vec<&TeamMatch> = rows.iter().filter(|row| row.goals.is_some()).collect();
    let seasons: Vec<SeasonId> = played
        .iter()
        .map(|row| row.season.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let Some(latest) = seasons.last() else {
        return CleanWinTable::default();
    };

    let teams: BTreeSet<&str> = rows
        .iter()
        .filter(|row| &row.season == latest)
        .map(|row| row.team.as_str())
        .collect();

    // (season index, games, clean wins) per team
    let mut counts: BTreeMap<&str, BTreeMap<usize, (u32, u32)>> = BTreeMap::new();
    for row in &played {
        if !teams.contains(row.team.as_str()) {
            continue;
        }
        let Ok(season) = seasons.binary_search(&row.season) else {
            continue;
        };
        let entry = counts
            .entry(row.team.as_str())
            .or_default()
            .entry(season)
            .or_default();
        entry.0 += 1;
        entry.1 += u32::from(is_clean_win(row));
    }

    let mut table_rows: Vec<CleanWinRow> = counts
        .into_iter()
        .map(|(team, by_season)| {
            let per_season: Vec<Option<u32>> = (0..seasons.len())
                .map(|i| by_season.get(&i).map(|(_, wins)| *wins))
                .collect();
            let total: u32 = by_season.values().map(|(_, wins)| wins).sum();
            let games: u32 = by_season.values().map(|(games, _)| games).sum();
            let recent: Vec<Option<f64>> = per_season
                .iter()
                .skip(per_season.len().saturating_sub(TREND_SEASONS))
                .map(|wins| wins.map(f64::from))
                .collect();

            CleanWinRow {
                team: team.to_string(),
                per_season,
                total,
                games,
                percentage: if games == 0 {
                    0.0
                } else {
                    round_to(f64::from(total) / f64::from(games) * 100.0, 2)
                },
                trend: trend_slope(&recent),
            }
        })
        .collect();

    table_rows.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.team.cmp(&b.team))
    });

    CleanWinTable {
        seasons,
        rows: table_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbviz_common::normalize_schedule;
    use fbviz_common::test_utils::schedule_fixtures::{fixture, four_team_season};

    #[test]
    fn test_is_clean_win() {
        let rows = normalize_schedule(&[fixture("2425", 1, "A", "B", Some("2–0"), None)]).unwrap();
        assert!(is_clean_win(&rows[0]));
        assert!(!is_clean_win(&rows[1]));

        let rows = normalize_schedule(&[fixture("2425", 1, "A", "B", Some("1–0"), None)]).unwrap();
        assert!(!is_clean_win(&rows[0]));
    }

    #[test]
    fn test_table_per_season_and_percentage() {
        let mut schedule = four_team_season("2324");
        schedule.extend(four_team_season("2425"));
        let table = clean_win_table(&normalize_schedule(&schedule).unwrap());

        assert_eq!(table.seasons, vec![SeasonId::new("2324"), SeasonId::new("2425")]);
        let alpha = &table.rows[0];
        assert_eq!(alpha.team, "Alpha");
        // 3-0, 2-0 away, 4-0 away each season.
        assert_eq!(alpha.per_season, vec![Some(3), Some(3)]);
        assert_eq!((alpha.total, alpha.games), (6, 12));
        assert_eq!(alpha.percentage, 50.0);
        assert_eq!(alpha.trend, 0.0);

        let delta = table.rows.iter().find(|r| r.team == "Delta").unwrap();
        assert_eq!(delta.per_season, vec![Some(0), Some(0)]);
        assert_eq!(delta.percentage, 0.0);
    }

    #[test]
    fn test_new_and_relegated_teams() {
        let mut schedule = vec![
            fixture("2324", 1, "A", "Old", Some("3–0"), None),
            fixture("2324", 2, "B", "Old", Some("0–1"), None),
        ];
        schedule.extend(vec![
            fixture("2425", 1, "A", "B", Some("2–0"), None),
            fixture("2425", 2, "B", "A", Some("0–0"), None),
            fixture("2425", 3, "C", "A", Some("0–3"), None),
        ]);
        let table = clean_win_table(&normalize_schedule(&schedule).unwrap());

        let teams: Vec<&str> = table.rows.iter().map(|r| r.team.as_str()).collect();
        assert!(!teams.contains(&"Old"));

        let a = table.rows.iter().find(|r| r.team == "A").unwrap();
        assert_eq!(a.per_season, vec![Some(1), Some(2)]);
        assert_eq!(a.percentage, 75.0);
        assert_eq!(a.trend, 1.0);

        let c = table.rows.iter().find(|r| r.team == "C").unwrap();
        assert_eq!(c.per_season, vec![None, Some(0)]);

        let b = table.rows.iter().find(|r| r.team == "B").unwrap();
        assert_eq!(b.per_season, vec![Some(0), Some(0)]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_win_table(&[]), CleanWinTable::default());
    }
}
