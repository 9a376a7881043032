//! Test utilities and shared fixtures for fbviz.
//!
//! Provides schedule, stat and lineup fixtures used by unit and integration
//! tests across the workspace.

use crate::types::{LineupRow, ScheduleRow, SeasonId, StatRow};
use std::collections::BTreeMap;

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Schedule fixtures.
pub mod schedule_fixtures {
    use super::*;

    /// Builds one schedule row. `score` of `None` makes it a future fixture.
    pub fn fixture(
        season: &str,
        week: u32,
        home: &str,
        away: &str,
        score: Option<&str>,
        xg: Option<(f64, f64)>,
    ) -> ScheduleRow {
        ScheduleRow {
            league: "TST-Test League".to_string(),
            season: SeasonId::new(season),
            game_id: Some(format!("{season}-{week}-{home}-{away}")),
            week: Some(week),
            round: Some("Regular season".to_string()),
            date: None,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_xg: xg.map(|(h, _)| h),
            away_xg: xg.map(|(_, a)| a),
            score: score.map(str::to_string),
            venue: Some(format!("{home} Stadium")),
            referee: None,
        }
    }

    /// A four-team double round robin with results, for strength tests.
    ///
    /// "Alpha" scores the most and concedes the least, "Delta" the reverse.
    pub fn four_team_season(season: &str) -> Vec<ScheduleRow> {
        let results = [
            (1, "Alpha", "Delta", "3–0"),
            (1, "Beta", "Gamma", "1–1"),
            (2, "Gamma", "Alpha", "0–2"),
            (2, "Delta", "Beta", "1–2"),
            (3, "Alpha", "Beta", "2–1"),
            (3, "Gamma", "Delta", "2–1"),
            (4, "Delta", "Alpha", "0–4"),
            (4, "Gamma", "Beta", "1–0"),
            (5, "Beta", "Alpha", "1–1"),
            (5, "Delta", "Gamma", "1–1"),
            (6, "Alpha", "Gamma", "3–1"),
            (6, "Beta", "Delta", "2–0"),
        ];
        results
            .iter()
            .map(|&(week, home, away, score)| {
                fixture(season, week, home, away, Some(score), Some((1.5, 1.0)))
            })
            .collect()
    }

    /// Future fixtures for the four-team league.
    pub fn four_team_future(season: &str) -> Vec<ScheduleRow> {
        let fixtures = [
            (7, "Alpha", "Delta"),
            (7, "Beta", "Gamma"),
            (8, "Delta", "Beta"),
            (8, "Gamma", "Alpha"),
            (9, "Alpha", "Delta"),
            (9, "Gamma", "Beta"),
        ];
        fixtures
            .iter()
            .map(|&(week, home, away)| fixture(season, week, home, away, None, None))
            .collect()
    }
}

/// Player stat fixtures.
pub mod stat_fixtures {
    use super::*;

    /// Builds a stat row from `(column, value)` pairs.
    pub fn stat_row(player: &str, team: &str, columns: &[(&str, f64)]) -> StatRow {
        StatRow {
            player: player.to_string(),
            team: team.to_string(),
            position: Some("DF".to_string()),
            game_id: None,
            season: None,
            stats: columns
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    /// Lineup entry helper.
    pub fn lineup(game_id: &str, team: &str, player: &str, starter: bool) -> LineupRow {
        LineupRow {
            game_id: game_id.to_string(),
            team: team.to_string(),
            player: player.to_string(),
            position: Some("MF".to_string()),
            is_starter: starter,
        }
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// Create a minimal valid test configuration as YAML string.
    pub fn minimal_config_yaml() -> &'static str {
        r#"
data_source:
  base_url: "http://localhost:8080/api"

cache:
  directory: "fbrefData"

output:
  directory: "imgs"
"#
    }

    /// Create a full test configuration as YAML string.
    pub fn full_config_yaml() -> &'static str {
        concat!(
            "data_source:\n",
            "  base_url: \"http://localhost:8080/api\"\n",
            "  api_key: \"secret\"\n",
            "  timeout_seconds: 10\n",
            "\n",
            "cache:\n",
            "  directory: \"/tmp/fbviz-cache\"\n",
            "  ttl_hours: 12\n",
            "  memory_capacity: 64\n",
            "\n",
            "output:\n",
            "  directory: \"/tmp/fbviz-out\"\n",
            "\n",
            "style:\n",
            "  font_family: \"DejaVu Sans Mono\"\n",
            "  background: \"#eceff4\"\n",
            "  width_in: 12.0\n",
            "  height_in: 16.0\n",
            "  dpi: 150\n",
            "\n",
            "analysis:\n",
            "  percentile_threshold: 60.0\n",
            "  min_good_gameweeks: 5\n",
            "  rolling_window: 10\n",
            "  max_goals: 5\n",
            "  highlight_quantile: 0.85\n",
            "\n",
            "logging:\n",
            "  level: \"debug\"\n",
        )
    }
}
