//! Table-shaping helpers shared by every pipeline.

use crate::error::{FbvizError, Result};
use crate::types::{ScheduleRow, Score, TeamMatch};
use serde_json::Value;
use std::collections::BTreeMap;

/// Leagues whose schedules include play-off rounds after the regular season.
const PLAYOFF_LEAGUES: &[&str] = &["BEL-Belgian Pro League"];

/// Round label of regular-season fixtures.
pub const REGULAR_SEASON_ROUND: &str = "Regular season";

/// Replaces en-dash, em-dash and minus sign with an ASCII hyphen.
pub fn normalize_score_dashes(score: &str) -> String {
    score
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            other => other,
        })
        .collect()
}

/// Parses a score string such as `"2–1"` into a [`Score`].
pub fn parse_score(score: &str) -> Result<Score> {
    let normalized = normalize_score_dashes(score);
    let mut parts = normalized.split('-').map(str::trim);

    let (Some(home), Some(away), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FbvizError::validation_field(
            format!("malformed score '{score}'"),
            "score",
        ));
    };

    let parse = |part: &str| {
        // Penalty shoot-outs are delivered as "(4) 1-1 (3)"; keep the regulation score.
        let digits: String = part
            .split_whitespace()
            .find(|token| !token.starts_with('('))
            .unwrap_or(part)
            .to_string();
        digits.parse::<u32>().map_err(|_| {
            FbvizError::validation_field(format!("malformed score '{score}'"), "score")
        })
    };

    Ok(Score {
        home: parse(home)?,
        away: parse(away)?,
    })
}

/// Joins the levels of a multi-level column name with `_`.
///
/// Empty levels are dropped and leading/trailing underscores stripped, so
/// `["", "player"]` becomes `"player"` and `["Tackles", "Tkl"]` becomes
/// `"Tackles_Tkl"`.
pub fn flatten_column<S: AsRef<str>>(levels: &[S]) -> String {
    levels
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("_")
        .trim_matches('_')
        .to_string()
}

/// Flattens every column of a header, optionally lower-casing the result.
pub fn flatten_columns<S: AsRef<str>>(columns: &[Vec<S>], lowercase: bool) -> Vec<String> {
    columns
        .iter()
        .map(|levels| {
            let name = flatten_column(levels);
            if lowercase {
                name.to_lowercase()
            } else {
                name
            }
        })
        .collect()
}

/// Flattens a nested JSON object of statistics into `group_stat` columns.
///
/// Numbers are kept, numeric strings are parsed, everything else is skipped.
pub fn flatten_stat_object(value: &Value) -> BTreeMap<String, f64> {
    let mut out = BTreeMap::new();
    flatten_into(&mut out, &mut Vec::new(), value);
    out
}

fn flatten_into<'a>(out: &mut BTreeMap<String, f64>, path: &mut Vec<&'a str>, value: &'a Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                path.push(key.as_str());
                flatten_into(out, path, nested);
                path.pop();
            }
        }
        Value::Number(number) => {
            if let Some(number) = number.as_f64() {
                out.insert(flatten_column(path), number);
            }
        }
        Value::String(text) => {
            if let Ok(number) = text.trim().replace(',', "").parse::<f64>() {
                out.insert(flatten_column(path), number);
            }
        }
        _ => {}
    }
}

/// Drops played play-off fixtures for leagues that have play-off rounds.
///
/// Unplayed fixtures are kept whatever their round, so future play-off
/// weeks still count as upcoming fixtures.
pub fn filter_regular_season(rows: Vec<ScheduleRow>, league: &str) -> Vec<ScheduleRow> {
    if !PLAYOFF_LEAGUES.contains(&league) {
        return rows;
    }
    rows.into_iter()
        .filter(|row| !row.is_played() || row.round.as_deref() == Some(REGULAR_SEASON_ROUND))
        .collect()
}

/// Splits every fixture into a home-side row and an away-side row.
///
/// Played fixtures carry parsed goals; unplayed ones leave them `None`.
pub fn normalize_schedule(rows: &[ScheduleRow]) -> Result<Vec<TeamMatch>> {
    let mut out = Vec::with_capacity(rows.len() * 2);

    for row in rows {
        let score = match row.score.as_deref() {
            Some(score) if !score.trim().is_empty() => Some(parse_score(score)?),
            _ => None,
        };

        out.push(TeamMatch {
            team: row.home_team.clone(),
            opponent: row.away_team.clone(),
            at_home: true,
            season: row.season.clone(),
            week: row.week,
            game_id: row.game_id.clone(),
            goals: score.map(|s| s.home),
            opponent_goals: score.map(|s| s.away),
            xg: row.home_xg,
            opponent_xg: row.away_xg,
        });
        out.push(TeamMatch {
            team: row.away_team.clone(),
            opponent: row.home_team.clone(),
            at_home: false,
            season: row.season.clone(),
            week: row.week,
            game_id: row.game_id.clone(),
            goals: score.map(|s| s.away),
            opponent_goals: score.map(|s| s.home),
            xg: row.away_xg,
            opponent_xg: row.home_xg,
        });
    }

    Ok(out)
}

/// Turns a display name into a file-name friendly stem.
pub fn file_stem(input: &str) -> String {
    let stem: String = input
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || "-_.".contains(c) {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    stem.split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Rounds to `decimals` decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
