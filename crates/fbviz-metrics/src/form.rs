//! Match-by-match team series: the cumulative points race and rolling form.

use crate::stats::{mean, rolling_mean};
use crate::xpts::expected_points;
use fbviz_common::{FbvizError, Result, Score, SeasonId, TeamMatch};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Running totals after one match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RacePoint {
    /// 1-based match number.
    pub matchday: usize,
    /// Cumulative league points.
    pub actual: u32,
    /// Cumulative expected points.
    pub expected: f64,
}

/// One team's points race.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsRace {
    /// Team name.
    pub team: String,
    /// Totals after each played match, in order.
    pub points: Vec<RacePoint>,
}

impl PointsRace {
    /// Final actual minus final expected points.
    pub fn over_performance(&self) -> f64 {
        self.points
            .last()
            .map_or(0.0, |p| f64::from(p.actual) - p.expected)
    }
}

fn points_for(row: &TeamMatch) -> Option<u32> {
    let score = Score {
        home: row.goals?,
        away: row.opponent_goals?,
    };
    Some(score.outcome().points().0)
}

/// Cumulative actual and expected points of each selected team.
///
/// `rows` are team-perspective rows in match order; unplayed ones are
/// ignored. A played match without xG adds nothing to the expected total.
pub fn points_race(rows: &[TeamMatch], teams: &[String], max_goals: u32) -> Result<Vec<PointsRace>> {
    teams
        .iter()
        .map(|team| {
            let mut race = PointsRace {
                team: team.clone(),
                points: Vec::new(),
            };
            let (mut actual, mut expected) = (0u32, 0.0f64);

            for row in rows.iter().filter(|row| &row.team == team) {
                let Some(points) = points_for(row) else {
                    continue;
                };
                actual += points;
                match (row.xg, row.opponent_xg) {
                    (Some(xg), Some(opponent_xg)) => {
                        expected += expected_points(xg, opponent_xg, max_goals)?.home;
                    }
                    _ => warn!("Match {:?} of {} has no xG", row.game_id, team),
                }
                race.points.push(RacePoint {
                    matchday: race.points.len() + 1,
                    actual,
                    expected,
                });
            }

            if race.points.is_empty() {
                return Err(FbvizError::validation_field(
                    format!("No played matches for team '{team}'"),
                    "team",
                ));
            }
            debug!("{}: {} matches, {:+.2} over xPts", team, race.points.len(), race.over_performance());
            Ok(race)
        })
        .collect()
}

/// Metrics tracked by [`team_form`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormMetric {
    /// League points per match.
    Points,
    /// Goals scored.
    Goals,
    /// Expected goals.
    Xg,
    /// Goals conceded.
    GoalsAgainst,
    /// Expected goals against.
    XgAgainst,
}

impl FormMetric {
    /// Every metric, in panel order.
    pub const ALL: [Self; 5] = [Self::Points, Self::Goals, Self::Xg, Self::GoalsAgainst, Self::XgAgainst];

    /// Axis label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Points => "Points",
            Self::Goals => "Goals Scored",
            Self::Xg => "xG",
            Self::GoalsAgainst => "Goals Conceded",
            Self::XgAgainst => "xGA",
        }
    }

    fn value(self, row: &TeamMatch) -> f64 {
        let goals = |g: Option<u32>| g.map_or(f64::NAN, f64::from);
        match self {
            Self::Points => points_for(row).map_or(f64::NAN, f64::from),
            Self::Goals => goals(row.goals),
            Self::Xg => row.xg.unwrap_or(f64::NAN),
            Self::GoalsAgainst => goals(row.opponent_goals),
            Self::XgAgainst => row.opponent_xg.unwrap_or(f64::NAN),
        }
    }
}

impl fmt::Display for FormMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One metric's raw and smoothed series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSeries {
    /// Which metric.
    pub metric: FormMetric,
    /// Per-match values, NaN where unknown.
    pub raw: Vec<f64>,
    /// Strict rolling mean, `None` until the window is full.
    pub rolling: Vec<Option<f64>>,
    /// Mean of the defined rolling values.
    pub mean: Option<f64>,
}

/// Rolling form of one team across the given matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamForm {
    /// Team name.
    pub team: String,
    /// Index of the first match of each season.
    pub season_starts: Vec<(usize, SeasonId)>,
    /// One series per metric, in [`FormMetric::ALL`] order.
    pub series: Vec<FormSeries>,
}

impl TeamForm {
    /// Number of matches covered.
    pub fn matches(&self) -> usize {
        self.series.first().map_or(0, |s| s.raw.len())
    }

    /// Series of one metric.
    pub fn series(&self, metric: FormMetric) -> Option<&FormSeries> {
        self.series.iter().find(|s| s.metric == metric)
    }
}

/// Positions where the season changes, the first row included.
pub fn season_starts<'a>(seasons: impl IntoIterator<Item = &'a SeasonId>) -> Vec<(usize, SeasonId)> {
    let mut starts: Vec<(usize, SeasonId)> = Vec::new();
    for (index, season) in seasons.into_iter().enumerate() {
        if starts.last().map_or(true, |(_, last)| last != season) {
            starts.push((index, season.clone()));
        }
    }
    starts
}

/// Points, goals and xG for and against, smoothed with a strict rolling mean.
pub fn team_form(rows: &[TeamMatch], team: &str, window: usize) -> Result<TeamForm> {
    let played: Vec<&TeamMatch> = rows
        .iter()
        .filter(|row| row.team == team && row.goals.is_some())
        .collect();
    if played.is_empty() {
        return Err(FbvizError::validation_field(
            format!("No played matches for team '{team}'"),
            "team",
        ));
    }
    if played.len() < window {
        warn!(
            "{} has {} matches, fewer than the rolling window of {}",
            team,
            played.len(),
            window
        );
    }

    let series = FormMetric::ALL
        .iter()
        .map(|&metric| {
            let raw: Vec<f64> = played.iter().map(|row| metric.value(row)).collect();
            let rolling = rolling_mean(&raw, window, window);
            let defined: Vec<f64> = rolling.iter().flatten().copied().collect();
            FormSeries {
                metric,
                raw,
                mean: mean(&defined),
                rolling,
            }
        })
        .collect();

    Ok(TeamForm {
        team: team.to_string(),
        season_starts: season_starts(played.iter().map(|row| &row.season)),
        series,
    })
}
