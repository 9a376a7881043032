//! Fixture-pairing search over future gameweeks.
//!
//! A team has an easy defensive fixture when it is defensively strong and
//! its opponent offensively weak, and an easy offensive fixture when it is
//! offensively strong against a defensively weak opponent. For every week,
//! each easy-defence team is paired with every other team holding an easy
//! offensive fixture that week, and the pairs are counted over all weeks.

use crate::strength::TeamClassification;
use fbviz_common::TeamMatch;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// One partner of a target team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pairing {
    /// Team with an easy offensive fixture.
    pub partner: String,
    /// Weeks shared with the target.
    pub count: usize,
}

/// A target team with its partners, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairingTarget {
    /// Team with easy defensive fixtures.
    pub team: String,
    /// Partners sorted by count, then name.
    pub pairings: Vec<Pairing>,
}

impl PairingTarget {
    /// Count of the best pairing.
    pub fn best_count(&self) -> usize {
        self.pairings.first().map_or(0, |p| p.count)
    }
}

/// Result of [`find_pairings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PairingReport {
    /// Targets whose best pairing reaches the minimum.
    pub targets: Vec<PairingTarget>,
    /// Highest count seen across every target, surfaced or not.
    pub max_count: usize,
}

/// Whether the fixture is easy for `row.team` in defence.
pub fn is_easy_defence(row: &TeamMatch, classes: &TeamClassification) -> bool {
    classes.def_strong.contains(&row.team) && classes.off_weak.contains(&row.opponent)
}

/// Whether the fixture is easy for `row.team` in attack.
pub fn is_easy_offence(row: &TeamMatch, classes: &TeamClassification) -> bool {
    classes.off_strong.contains(&row.team) && classes.def_weak.contains(&row.opponent)
}

/// Counts easy-defence/easy-offence co-occurrences over the future rows.
///
/// Rows without a week are ignored. Targets are returned in order of their
/// best count, then by name.
pub fn find_pairings(
    future: &[TeamMatch],
    classes: &TeamClassification,
    min_good_gameweeks: usize,
) -> PairingReport {
    let mut defence_by_week: BTreeMap<u32, BTreeSet<&str>> = BTreeMap::new();
    let mut offence_by_week: BTreeMap<u32, BTreeSet<&str>> = BTreeMap::new();
    for row in future {
        let Some(week) = row.week else { continue };
        if is_easy_defence(row, classes) {
            defence_by_week.entry(week).or_default().insert(row.team.as_str());
        }
        if is_easy_offence(row, classes) {
            offence_by_week.entry(week).or_default().insert(row.team.as_str());
        }
    }

    let mut counts: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for (week, targets) in &defence_by_week {
        let Some(partners) = offence_by_week.get(week) else {
            continue;
        };
        for target in targets {
            for partner in partners.iter().filter(|p| *p != target) {
                *counts.entry(*target).or_default().entry(*partner).or_default() += 1;
            }
        }
    }

    let mut report = PairingReport::default();
    for (team, partners) in counts {
        let mut pairings: Vec<Pairing> = partners
            .into_iter()
            .map(|(partner, count)| Pairing {
                partner: partner.to_string(),
                count,
            })
            .collect();
        pairings.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.partner.cmp(&b.partner)));

        let target = PairingTarget {
            team: team.to_string(),
            pairings,
        };
        report.max_count = report.max_count.max(target.best_count());
        if target.best_count() >= min_good_gameweeks {
            report.targets.push(target);
        } else {
            debug!("{} best pairing {} below minimum", team, target.best_count());
        }
    }

    report
        .targets
        .sort_by(|a, b| b.best_count().cmp(&a.best_count()).then_with(|| a.team.cmp(&b.team)));
    report
}
