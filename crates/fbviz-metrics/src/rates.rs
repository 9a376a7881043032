//! Per-group rate tables: goals per match by home venue and fouls per match
//! by referee.

use fbviz_common::{parse_score, Result, ScheduleRow, StatRow};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Fouls committed, per player and match.
pub const FOULS_COLUMN: &str = "Performance_Fls";

/// Referee name used when the schedule has none.
pub const UNKNOWN_REFEREE: &str = "Unknown";

/// A group with its total, game count and per-game rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRate {
    /// Group key: the home team or the referee.
    pub group: String,
    /// Display label, e.g. the stadium name.
    pub label: String,
    /// Summed quantity.
    pub total: f64,
    /// Games counted.
    pub games: usize,
    /// `total / games`.
    pub per_game: f64,
}

fn finish(groups: BTreeMap<String, (String, f64, usize)>, min_games: usize) -> Vec<GroupRate> {
    let mut rates: Vec<GroupRate> = groups
        .into_iter()
        .filter(|(_, (_, _, games))| *games >= min_games && *games > 0)
        .map(|(group, (label, total, games))| GroupRate {
            group,
            label,
            total,
            games,
            per_game: total / games as f64,
        })
        .collect();
    rates.sort_by(|a, b| a.per_game.total_cmp(&b.per_game).then_with(|| a.group.cmp(&b.group)));
    rates
}

/// Short venue label: the text before the first `-`, trimmed.
pub fn venue_label(venue: &str) -> String {
    venue.split('-').next().unwrap_or(venue).trim().to_string()
}

/// Goals per match at each home team's ground, lowest first.
///
/// Only played matches with a venue count. A team's label is the last venue
/// it hosted a match at.
pub fn venue_goal_rates(rows: &[ScheduleRow]) -> Result<Vec<GroupRate>> {
    let mut groups: BTreeMap<String, (String, f64, usize)> = BTreeMap::new();
    for row in rows.iter().filter(|row| row.is_played()) {
        let (Some(venue), Some(score)) = (row.venue.as_deref(), row.score.as_deref()) else {
            continue;
        };
        let score = parse_score(score)?;
        let entry = groups.entry(row.home_team.clone()).or_default();
        entry.0 = venue_label(venue);
        entry.1 += f64::from(score.total());
        entry.2 += 1;
    }
    Ok(finish(groups, 1))
}

/// Fouls per match by referee, lowest first.
///
/// A played match counts once its per-match stats include the fouls
/// column; its fouls are summed over every player row. Referees with fewer
/// than `min_games` matches are dropped.
pub fn referee_foul_rates(schedule: &[ScheduleRow], match_stats: &[StatRow], min_games: usize) -> Vec<GroupRate> {
    let mut fouls_by_match: HashMap<&str, Option<f64>> = HashMap::new();
    for row in match_stats {
        let Some(game_id) = row.game_id.as_deref() else {
            continue;
        };
        let entry = fouls_by_match.entry(game_id).or_insert(None);
        if let Some(fouls) = row.stat(FOULS_COLUMN) {
            *entry = Some(entry.unwrap_or(0.0) + fouls);
        }
    }

    let mut groups: BTreeMap<String, (String, f64, usize)> = BTreeMap::new();
    for row in schedule.iter().filter(|row| row.is_played()) {
        let Some(game_id) = row.game_id.as_deref() else {
            continue;
        };
        let Some(&Some(fouls)) = fouls_by_match.get(game_id) else {
            debug!("No foul data for match {}", game_id);
            continue;
        };
        let referee = row
            .referee
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(UNKNOWN_REFEREE)
            .to_string();
        let entry = groups.entry(referee.clone()).or_default();
        entry.0 = referee;
        entry.1 += fouls;
        entry.2 += 1;
    }

    finish(groups, min_games)
}
