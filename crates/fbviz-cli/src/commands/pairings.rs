//! `fixture-pairings`: teams whose easy fixtures fall in the same weeks.

use super::default_request;
use crate::app::FbvizApp;
use crate::args::{ChartArgs, SeasonArgs};
use crate::error::CliResult;
use fbviz_common::{normalize_schedule, Result, ScheduleRow, SeasonId};
use fbviz_config::AnalysisConfig;
use fbviz_data::DataSource;
use fbviz_graphs::{LogoSource, PairingChart};
use fbviz_metrics::{classify, find_pairings, team_scores, PairingReport, StrengthSeasons, TeamClassification};
use std::path::PathBuf;
use tracing::info;

/// Strength classification of the current season's teams, unless the
/// configuration names the sets explicitly.
pub fn classification(
    schedule: &[ScheduleRow],
    current: &SeasonId,
    previous: Option<&SeasonId>,
    analysis: &AnalysisConfig,
) -> Result<TeamClassification> {
    if let Some(overrides) = &analysis.team_overrides {
        info!("Using team classification from configuration");
        return Ok(TeamClassification::from(overrides));
    }

    let rows = normalize_schedule(schedule)?;
    let scores = team_scores(
        &rows,
        StrengthSeasons {
            current,
            previous,
            min_current_season_matches: analysis.min_current_season_matches,
        },
    );
    classify(&scores, analysis.percentile_threshold)
}

/// Pairings over the unplayed fixtures of the current season.
pub fn prepare(
    schedule: &[ScheduleRow],
    current: &SeasonId,
    previous: Option<&SeasonId>,
    analysis: &AnalysisConfig,
    min_count: usize,
) -> Result<PairingReport> {
    let classes = classification(schedule, current, previous, analysis)?;
    let future: Vec<_> = normalize_schedule(schedule)?
        .into_iter()
        .filter(|row| &row.season == current && row.goals.is_none())
        .collect();
    info!("{} remaining team fixtures", future.len() / 2);
    Ok(find_pairings(&future, &classes, min_count))
}

/// Loads both seasons and draws one table per target team. Returns `None`
/// when no pairing reaches `min_count`.
pub async fn run<S: DataSource, L: LogoSource>(
    app: &FbvizApp<S, L>,
    season: &SeasonArgs,
    previous: Option<&SeasonId>,
    min_count: usize,
    chart: &ChartArgs,
) -> CliResult<Option<PathBuf>> {
    let seasons: Vec<SeasonId> = previous.into_iter().chain([&season.season]).cloned().collect();
    let schedule = app.loader().schedule(&season.league, &seasons).await?;
    let report = prepare(&schedule, &season.season, previous, &app.config().analysis, min_count)?;

    if report.targets.is_empty() {
        println!(
            "No pairing shares {} or more weeks (best is {})",
            min_count, report.max_count
        );
        return Ok(None);
    }

    let defaults = default_request(
        &season.league,
        format!("Fixture pairings, {} {}", season.league, season.season.label()),
        format!(
            "Weeks where the first team has an easy clean-sheet fixture while the partner has an easy attacking one, at least {} shared weeks",
            min_count
        ),
        &format!("fixture_pairings {}", season.season),
    );
    Ok(Some(app.write_chart(&PairingChart, &report, chart, defaults).await?))
}
