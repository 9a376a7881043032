//! Player rankings: tackling, chance creation and on/off splits.

use crate::stats::{above_quantile, median, per_nineties, weighted_composite, zscores};
use fbviz_common::{round_to, FbvizError, LineupRow, Result, StatRow, TeamMatch};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Number of full 90s played.
pub const NINETIES_COLUMN: &str = "90s";
/// Tackles attempted.
pub const TACKLES_COLUMN: &str = "Tackles_Tkl";
/// Tackles won.
pub const TACKLES_WON_COLUMN: &str = "Tackles_TklW";
/// Assists.
pub const ASSISTS_COLUMN: &str = "ast";
/// Expected assists.
pub const EXPECTED_ASSISTS_COLUMN: &str = "expected_xa";

/// One player in the tackling ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TacklingRow {
    /// Player name.
    pub player: String,
    /// Team name.
    pub team: String,
    /// Position string.
    pub position: Option<String>,
    /// Full 90s played.
    pub nineties: f64,
    /// Tackles attempted per 90.
    pub tackles_per90: f64,
    /// Tackles won per 90.
    pub won_per90: f64,
    /// Share of tackles won, two decimals.
    pub win_rate: f64,
    /// Equal-weight composite of the tackle-rate and win-rate z-scores.
    pub score: f64,
    /// Whether the score is above the highlight quantile.
    pub highlighted: bool,
}

/// Players who tackle often and win their tackles.
///
/// Only players at or above the median of both playing time and tackles per
/// 90 are kept. Rows are sorted by tackles per 90, highest first.
pub fn tackling_ranking(rows: &[StatRow], highlight_quantile: f64) -> Result<Vec<TacklingRow>> {
    let candidates: Vec<TacklingRow> = rows
        .iter()
        .filter_map(|row| {
            let nineties = row.stat(NINETIES_COLUMN)?;
            let tackles_per90 = per_nineties(row.stat_or_zero(TACKLES_COLUMN), nineties)?;
            let won_per90 = per_nineties(row.stat_or_zero(TACKLES_WON_COLUMN), nineties)?;
            Some(TacklingRow {
                player: row.player.clone(),
                team: row.team.clone(),
                position: row.position.clone(),
                nineties,
                tackles_per90,
                won_per90,
                win_rate: 0.0,
                score: 0.0,
                highlighted: false,
            })
        })
        .collect();

    let nineties: Vec<f64> = candidates.iter().map(|r| r.nineties).collect();
    let tackle_rates: Vec<f64> = candidates.iter().map(|r| r.tackles_per90).collect();
    let (Some(min_nineties), Some(min_rate)) = (median(&nineties), median(&tackle_rates)) else {
        return Ok(Vec::new());
    };

    let mut ranking: Vec<TacklingRow> = candidates
        .into_iter()
        .filter(|r| r.nineties >= min_nineties && r.tackles_per90 >= min_rate && r.tackles_per90 > 0.0)
        .map(|mut r| {
            r.win_rate = round_to(r.won_per90 / r.tackles_per90, 2);
            r
        })
        .collect();
    ranking.sort_by(|a, b| b.tackles_per90.total_cmp(&a.tackles_per90));

    let rates: Vec<f64> = ranking.iter().map(|r| r.tackles_per90).collect();
    let wins: Vec<f64> = ranking.iter().map(|r| r.win_rate).collect();
    let scores = weighted_composite(&[(&rates[..], 0.5), (&wins[..], 0.5)])?;
    let flags = above_quantile(&scores, highlight_quantile);
    for ((row, score), highlighted) in ranking.iter_mut().zip(scores).zip(flags) {
        row.score = score;
        row.highlighted = highlighted;
    }

    info!(
        "{} of {} players pass the tackling filters",
        ranking.len(),
        rows.len()
    );
    Ok(ranking)
}

/// One player in the assists-versus-xA ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatorRow {
    /// Player name.
    pub player: String,
    /// Assists.
    pub assists: f64,
    /// Expected assists.
    pub expected_assists: f64,
    /// Assists minus expected assists.
    pub difference: f64,
}

/// A team's main chance creators ranked by assists over expected assists.
///
/// Players with zero xA are dropped, the `limit` highest xA are kept and
/// sorted by the difference, largest first.
pub fn creator_ranking(rows: &[StatRow], team: &str, limit: usize) -> Vec<CreatorRow> {
    let mut creators: Vec<CreatorRow> = rows
        .iter()
        .filter(|row| row.team == team)
        .filter_map(|row| {
            let expected_assists = row.stat(EXPECTED_ASSISTS_COLUMN).filter(|xa| *xa != 0.0)?;
            let assists = row.stat_or_zero(ASSISTS_COLUMN);
            Some(CreatorRow {
                player: row.player.clone(),
                assists,
                expected_assists,
                difference: assists - expected_assists,
            })
        })
        .collect();

    creators.sort_by(|a, b| b.expected_assists.total_cmp(&a.expected_assists));
    creators.truncate(limit);
    creators.sort_by(|a, b| b.difference.total_cmp(&a.difference));
    creators
}

/// Team output while a player starts or does not start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SplitRates {
    /// Goals scored per match.
    pub goals: f64,
    /// xG per match.
    pub xg: f64,
    /// Goals conceded per match.
    pub goals_against: f64,
    /// xGA per match.
    pub xga: f64,
}

impl SplitRates {
    fn per_match(totals: Self, matches: usize) -> Self {
        let n = matches as f64;
        Self {
            goals: totals.goals / n,
            xg: totals.xg / n,
            goals_against: totals.goals_against / n,
            xga: totals.xga / n,
        }
    }

    fn add(&mut self, row: &TeamMatch) {
        self.goals += row.goals.map_or(0.0, f64::from);
        self.xg += row.xg.unwrap_or(0.0);
        self.goals_against += row.opponent_goals.map_or(0.0, f64::from);
        self.xga += row.opponent_xg.unwrap_or(0.0);
    }
}

/// The four team metrics split by start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SplitMetric {
    /// Goals scored.
    Goals,
    /// Expected goals.
    Xg,
    /// Goals conceded.
    GoalsAgainst,
    /// Expected goals against.
    Xga,
}

impl SplitMetric {
    /// Panel order.
    pub const ALL: [Self; 4] = [Self::Goals, Self::Xg, Self::GoalsAgainst, Self::Xga];

    /// Panel label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Goals => "Goals scored",
            Self::Xg => "xG",
            Self::GoalsAgainst => "Goals conceded",
            Self::Xga => "xGA",
        }
    }

    /// Whether a higher value is better for the team.
    pub const fn higher_is_better(self) -> bool {
        matches!(self, Self::Goals | Self::Xg)
    }

    fn pick(self, rates: SplitRates) -> f64 {
        match self {
            Self::Goals => rates.goals,
            Self::Xg => rates.xg,
            Self::GoalsAgainst => rates.goals_against,
            Self::Xga => rates.xga,
        }
    }
}

/// One player's on/off split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnOffRow {
    /// Player name.
    pub player: String,
    /// Matches started.
    pub starts: usize,
    /// Matches not started.
    pub non_starts: usize,
    /// Per-match rates when starting.
    pub on: SplitRates,
    /// Per-match rates when not starting.
    pub off: SplitRates,
    /// Sum of the z-scores of the four improvements.
    pub total: f64,
}

impl OnOffRow {
    /// Starting minus not starting.
    pub fn difference(&self, metric: SplitMetric) -> f64 {
        metric.pick(self.on) - metric.pick(self.off)
    }

    /// Difference signed so that positive always helps the team.
    pub fn improvement(&self, metric: SplitMetric) -> f64 {
        if metric.higher_is_better() {
            self.difference(metric)
        } else {
            -self.difference(metric)
        }
    }
}

/// Team output per match with each player starting versus not starting.
///
/// `team_rows` are the team's played matches; `lineup_team` is the team's
/// name as lineups spell it. Matches without a lineup are left out.
/// Goalkeepers are excluded, as are players with fewer than `min_starts`
/// starts or without a single non-start. Rows come back sorted by total,
/// best first.
pub fn on_off_split(
    team_rows: &[TeamMatch],
    lineups: &[LineupRow],
    lineup_team: &str,
    min_starts: usize,
) -> Result<Vec<OnOffRow>> {
    let mut starters_by_match: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    let mut squad: BTreeSet<&str> = BTreeSet::new();
    for entry in lineups
        .iter()
        .filter(|entry| entry.team == lineup_team && !entry.is_goalkeeper())
    {
        squad.insert(entry.player.as_str());
        let starters = starters_by_match.entry(entry.game_id.as_str()).or_default();
        if entry.is_starter {
            starters.insert(entry.player.as_str());
        }
    }
    if squad.is_empty() {
        return Err(FbvizError::validation_field(
            format!("No lineup entries for team '{lineup_team}'"),
            "lineup_team",
        ));
    }

    let mut on: BTreeMap<&str, (usize, SplitRates)> = BTreeMap::new();
    let mut off: BTreeMap<&str, (usize, SplitRates)> = BTreeMap::new();
    let mut matches = 0usize;
    for row in team_rows.iter().filter(|row| row.goals.is_some()) {
        let Some(starters) = row
            .game_id
            .as_deref()
            .and_then(|id| starters_by_match.get(id))
        else {
            warn!("No lineup for match {:?}, leaving it out", row.game_id);
            continue;
        };
        matches += 1;
        for player in &squad {
            let side = if starters.contains(player) { &mut on } else { &mut off };
            let entry = side.entry(*player).or_default();
            entry.0 += 1;
            entry.1.add(row);
        }
    }
    debug!("{} matches with lineups, squad of {}", matches, squad.len());

    let mut rows: Vec<OnOffRow> = squad
        .iter()
        .filter_map(|player| {
            let (starts, on_totals) = on.get(player).copied()?;
            let (non_starts, off_totals) = off.get(player).copied()?;
            (starts >= min_starts && non_starts > 0).then(|| OnOffRow {
                player: (*player).to_string(),
                starts,
                non_starts,
                on: SplitRates::per_match(on_totals, starts),
                off: SplitRates::per_match(off_totals, non_starts),
                total: 0.0,
            })
        })
        .collect();

    let columns: Vec<Vec<f64>> = SplitMetric::ALL
        .iter()
        .map(|&metric| zscores(&rows.iter().map(|r| r.improvement(metric)).collect::<Vec<_>>()))
        .collect();
    for (i, row) in rows.iter_mut().enumerate() {
        row.total = columns.iter().map(|column| column[i]).sum();
    }
    rows.sort_by(|a, b| b.total.total_cmp(&a.total));

    info!("{} players qualify for the on/off split", rows.len());
    Ok(rows)
}
