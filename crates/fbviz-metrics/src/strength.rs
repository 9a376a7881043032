//! Offensive and defensive team strength, and the strong/weak classification
//! built on top of it.

use crate::stats::percentile;
use fbviz_common::{round_to, FbvizError, Result, SeasonId, TeamMatch};
use fbviz_config::TeamOverrides;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Offence and defence score of one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamScore {
    /// Team name.
    pub team: String,
    /// Goals scored per match, two decimals.
    pub offence: f64,
    /// Goals conceded per match, two decimals.
    pub defence: f64,
    /// Matches the scores were computed from.
    pub matches: usize,
    /// Whether the team was missing from the previous season.
    pub promoted: bool,
}

/// Strong and weak team sets. Strong and weak never overlap on the same axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamClassification {
    /// Score the most.
    pub off_strong: BTreeSet<String>,
    /// Score the least.
    pub off_weak: BTreeSet<String>,
    /// Concede the least.
    pub def_strong: BTreeSet<String>,
    /// Concede the most.
    pub def_weak: BTreeSet<String>,
}

impl From<&TeamOverrides> for TeamClassification {
    fn from(overrides: &TeamOverrides) -> Self {
        Self {
            off_strong: overrides.off_strong.clone(),
            off_weak: overrides.off_weak.clone(),
            def_strong: overrides.def_strong.clone(),
            def_weak: overrides.def_weak.clone(),
        }
    }
}

/// Inputs to [`team_scores`].
#[derive(Debug, Clone, Copy)]
pub struct StrengthSeasons<'a> {
    /// Season being analysed.
    pub current: &'a SeasonId,
    /// Season before it, used for promotion detection and as fallback data.
    pub previous: Option<&'a SeasonId>,
    /// Played current-season matches needed before the previous season is ignored.
    pub min_current_season_matches: usize,
}

fn played(row: &TeamMatch) -> Option<(u32, u32)> {
    Some((row.goals?, row.opponent_goals?))
}

/// Offence and defence scores of every team appearing in the current season.
///
/// The current season alone is used once it has more than
/// `min_current_season_matches` played matches; before that every played
/// match in `rows` counts. Teams that did not play in the previous season
/// take the third-worst offence and defence of the others. Without
/// previous-season rows nobody is treated as promoted.
pub fn team_scores(rows: &[TeamMatch], seasons: StrengthSeasons<'_>) -> Vec<TeamScore> {
    let current_played = rows
        .iter()
        .filter(|row| row.at_home && &row.season == seasons.current && played(row).is_some())
        .count();
    let current_only = current_played > seasons.min_current_season_matches;
    debug!(
        "{} played matches in {}, using {}",
        current_played,
        seasons.current,
        if current_only { "current season only" } else { "all seasons" }
    );

    let current_teams: BTreeSet<&str> = rows
        .iter()
        .filter(|row| &row.season == seasons.current)
        .map(|row| row.team.as_str())
        .collect();
    let previous_teams: BTreeSet<&str> = seasons
        .previous
        .map(|previous| {
            rows.iter()
                .filter(|row| &row.season == previous && played(row).is_some())
                .map(|row| row.team.as_str())
                .collect()
        })
        .unwrap_or_default();
    let has_previous = !previous_teams.is_empty();

    let mut totals: BTreeMap<&str, (u32, u32, usize)> = BTreeMap::new();
    for row in rows {
        if current_only && &row.season != seasons.current {
            continue;
        }
        let Some((goals, conceded)) = played(row) else {
            continue;
        };
        let entry = totals.entry(row.team.as_str()).or_default();
        entry.0 += goals;
        entry.1 += conceded;
        entry.2 += 1;
    }

    let mut scores = Vec::new();
    let mut promoted = Vec::new();
    for team in current_teams {
        if has_previous && !previous_teams.contains(team) {
            promoted.push(team);
            continue;
        }
        let Some(&(goals, conceded, matches)) = totals.get(team).filter(|t| t.2 > 0) else {
            debug!("No played matches for {}, skipping", team);
            continue;
        };
        scores.push(TeamScore {
            team: team.to_string(),
            offence: round_to(f64::from(goals) / matches as f64, 2),
            defence: round_to(f64::from(conceded) / matches as f64, 2),
            matches,
            promoted: false,
        });
    }

    if !promoted.is_empty() && !scores.is_empty() {
        let mut offences: Vec<f64> = scores.iter().map(|s| s.offence).collect();
        let mut defences: Vec<f64> = scores.iter().map(|s| s.defence).collect();
        offences.sort_by(f64::total_cmp);
        defences.sort_by(|a, b| b.total_cmp(a));
        let index = 2.min(scores.len() - 1);
        let (offence, defence) = (offences[index], defences[index]);

        info!("Promoted teams {:?} get offence {} and defence {}", promoted, offence, defence);
        for team in promoted {
            scores.push(TeamScore {
                team: team.to_string(),
                offence,
                defence,
                matches: totals.get(team).map_or(0, |t| t.2),
                promoted: true,
            });
        }
        scores.sort_by(|a, b| a.team.cmp(&b.team));
    }

    scores
}

/// Splits teams into strong and weak sets at the `threshold` percentile.
///
/// Offensively strong teams score at least the `threshold` percentile,
/// offensively weak teams at most the `100 - threshold` percentile.
/// Defence is read the other way round, on goals conceded.
pub fn classify(scores: &[TeamScore], threshold: f64) -> Result<TeamClassification> {
    if !(threshold > 50.0 && threshold < 100.0) {
        return Err(FbvizError::validation_field(
            format!("Percentile threshold must lie in (50, 100), got {threshold}"),
            "percentile_threshold",
        ));
    }

    let offences: Vec<f64> = scores.iter().map(|s| s.offence).collect();
    let defences: Vec<f64> = scores.iter().map(|s| s.defence).collect();
    let (Some(off_high), Some(off_low), Some(def_low), Some(def_high)) = (
        percentile(&offences, threshold),
        percentile(&offences, 100.0 - threshold),
        percentile(&defences, 100.0 - threshold),
        percentile(&defences, threshold),
    ) else {
        return Ok(TeamClassification::default());
    };
    debug!(
        "Thresholds: offence {}/{}, defence {}/{}",
        off_high, off_low, def_low, def_high
    );

    let mut classes = TeamClassification::default();
    for score in scores {
        if score.offence >= off_high {
            classes.off_strong.insert(score.team.clone());
        } else if score.offence <= off_low {
            classes.off_weak.insert(score.team.clone());
        }
        if score.defence <= def_low {
            classes.def_strong.insert(score.team.clone());
        } else if score.defence >= def_high {
            classes.def_weak.insert(score.team.clone());
        }
    }
    Ok(classes)
}
