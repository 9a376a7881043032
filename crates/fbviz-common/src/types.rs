//! Row types delivered by the statistics provider and derived per-team views.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A season identifier in the provider's compact form, e.g. `"2425"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonId(pub String);

impl SeasonId {
    /// Creates a season identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Human label used in chart headers: `"2425"` becomes `"24/25"`.
    pub fn label(&self) -> String {
        if self.0.len() == 4 && self.0.chars().all(|c| c.is_ascii_digit()) {
            format!("{}/{}", &self.0[..2], &self.0[2..])
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SeasonId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One fixture from a league schedule.
///
/// `score` is `None` for fixtures that have not been played yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// League name as used by the provider.
    #[serde(default)]
    pub league: String,
    /// Season identifier.
    pub season: SeasonId,
    /// Provider match identifier.
    #[serde(default)]
    pub game_id: Option<String>,
    /// Gameweek number.
    #[serde(default)]
    pub week: Option<u32>,
    /// Round label, e.g. `"Regular season"`.
    #[serde(default)]
    pub round: Option<String>,
    /// Kick-off date, ISO formatted.
    #[serde(default)]
    pub date: Option<String>,
    /// Home team name.
    pub home_team: String,
    /// Away team name.
    pub away_team: String,
    /// Home expected goals.
    #[serde(default)]
    pub home_xg: Option<f64>,
    /// Away expected goals.
    #[serde(default)]
    pub away_xg: Option<f64>,
    /// Score string with a locale-dependent dash, e.g. `"2–1"`.
    #[serde(default)]
    pub score: Option<String>,
    /// Stadium.
    #[serde(default)]
    pub venue: Option<String>,
    /// Match referee.
    #[serde(default)]
    pub referee: Option<String>,
}

impl ScheduleRow {
    /// Whether the fixture has a recorded result.
    pub fn is_played(&self) -> bool {
        self.score.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// Whether `team` takes part in the fixture.
    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }
}

/// A final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    /// Home goals.
    pub home: u32,
    /// Away goals.
    pub away: u32,
}

impl Score {
    /// Outcome from the home side's point of view.
    pub const fn outcome(self) -> MatchOutcome {
        if self.home > self.away {
            MatchOutcome::HomeWin
        } else if self.home < self.away {
            MatchOutcome::AwayWin
        } else {
            MatchOutcome::Draw
        }
    }

    /// Total goals scored in the match.
    pub const fn total(self) -> u32 {
        self.home + self.away
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Home side won.
    HomeWin,
    /// Level score.
    Draw,
    /// Away side won.
    AwayWin,
}

impl MatchOutcome {
    /// League points awarded as `(home, away)` under the 3/1/0 rule.
    pub const fn points(self) -> (u32, u32) {
        match self {
            Self::HomeWin => (3, 0),
            Self::Draw => (1, 1),
            Self::AwayWin => (0, 3),
        }
    }
}

/// A fixture seen from one team's side.
///
/// Every played or future fixture yields two of these, one per team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatch {
    /// The team this row describes.
    pub team: String,
    /// Its opponent.
    pub opponent: String,
    /// Whether `team` played at home.
    pub at_home: bool,
    /// Season identifier.
    pub season: SeasonId,
    /// Gameweek number.
    pub week: Option<u32>,
    /// Provider match identifier.
    pub game_id: Option<String>,
    /// Goals scored by `team`, `None` for unplayed fixtures.
    pub goals: Option<u32>,
    /// Goals conceded by `team`, `None` for unplayed fixtures.
    pub opponent_goals: Option<u32>,
    /// Expected goals for `team`.
    pub xg: Option<f64>,
    /// Expected goals for the opponent.
    pub opponent_xg: Option<f64>,
}

/// A row of player statistics, for a season or a single match.
///
/// Numeric columns are kept in a flat map keyed by their flattened column
/// name (`"Tackles_Tkl"`, `"Performance_Fls"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    /// Player name.
    pub player: String,
    /// Team name.
    #[serde(default)]
    pub team: String,
    /// Position string as delivered, e.g. `"DF,MF"`.
    #[serde(default)]
    pub position: Option<String>,
    /// Match identifier for per-match rows.
    #[serde(default)]
    pub game_id: Option<String>,
    /// Season identifier for per-season rows.
    #[serde(default)]
    pub season: Option<SeasonId>,
    /// Flattened numeric columns.
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
}

impl StatRow {
    /// Looks up a numeric column, case-insensitively.
    pub fn stat(&self, column: &str) -> Option<f64> {
        self.stats.get(column).copied().or_else(|| {
            self.stats
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(column))
                .map(|(_, value)| *value)
        })
    }

    /// Like [`StatRow::stat`] but treats a missing column as zero.
    pub fn stat_or_zero(&self, column: &str) -> f64 {
        self.stat(column).unwrap_or(0.0)
    }
}

/// One player's entry in a match lineup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupRow {
    /// Provider match identifier.
    pub game_id: String,
    /// Team name as used in lineups.
    pub team: String,
    /// Player name.
    pub player: String,
    /// Position code, e.g. `"GK"`.
    #[serde(default)]
    pub position: Option<String>,
    /// Whether the player started.
    #[serde(default)]
    pub is_starter: bool,
}

impl LineupRow {
    /// Whether this entry is a goalkeeper.
    pub fn is_goalkeeper(&self) -> bool {
        self.position.as_deref() == Some("GK")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_label() {
        assert_eq!(SeasonId::new("2425").label(), "24/25");
        assert_eq!(SeasonId::new("2024").label(), "20/24");
        assert_eq!(SeasonId::new("2024-2025").label(), "2024-2025");
    }

    #[test]
    fn test_outcome_points() {
        assert_eq!(Score { home: 2, away: 1 }.outcome().points(), (3, 0));
        assert_eq!(Score { home: 0, away: 0 }.outcome().points(), (1, 1));
        assert_eq!(Score { home: 0, away: 4 }.outcome().points(), (0, 3));
    }

    #[test]
    fn test_stat_lookup_is_case_insensitive() {
        let mut row = StatRow {
            player: "Joan García".to_string(),
            ..StatRow::default()
        };
        row.stats.insert("Shot Stopping_PSxG".to_string(), 1.4);

        assert_eq!(row.stat("shot stopping_psxg"), Some(1.4));
        assert_eq!(row.stat_or_zero("missing"), 0.0);
    }

    #[test]
    fn test_schedule_row_played() {
        let row: ScheduleRow = serde_json::from_str(
            r#"{"season": "2425", "home_team": "Gent", "away_team": "Genk", "score": null}"#,
        )
        .unwrap();
        assert!(!row.is_played());
        assert!(row.involves("Genk"));
    }
}
