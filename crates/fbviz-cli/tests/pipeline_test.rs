//! End-to-end pipeline runs against an in-memory provider.

use async_trait::async_trait;
use fbviz_cli::args::{CacheCommand, ChartArgs, Command, SeasonArgs, SeasonsArgs};
use fbviz_cli::commands;
use fbviz_cli::{CliError, FbvizApp};
use fbviz_common::test_utils::create_temp_dir;
use fbviz_common::test_utils::schedule_fixtures::{four_team_future, four_team_season};
use fbviz_common::test_utils::stat_fixtures::stat_row;
use fbviz_common::{FbvizError, LineupRow, Result, ScheduleRow, SeasonId, StatRow};
use fbviz_config::Config;
use fbviz_data::{DataSource, SnapshotCache};
use fbviz_graphs::LogoSource;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Default)]
struct FakeProvider {
    schedule_reads: Arc<AtomicUsize>,
}

#[async_trait]
impl DataSource for FakeProvider {
    async fn read_schedule(&self, _league: &str, season: &SeasonId) -> Result<Vec<ScheduleRow>> {
        self.schedule_reads.fetch_add(1, Ordering::SeqCst);
        let mut rows = four_team_season(&season.0);
        if season.0 == "2425" {
            rows.extend(four_team_future(&season.0));
        }
        Ok(rows)
    }

    async fn read_player_season_stats(
        &self,
        _league: &str,
        _season: &SeasonId,
        _stat_type: &str,
    ) -> Result<Vec<StatRow>> {
        Ok(vec![
            stat_row("A", "Alpha", &[("90s", 20.0), ("Tackles_Tkl", 60.0), ("Tackles_TklW", 40.0)]),
            stat_row("B", "Beta", &[("90s", 10.0), ("Tackles_Tkl", 10.0), ("Tackles_TklW", 5.0)]),
        ])
    }

    async fn read_player_match_stats(
        &self,
        _league: &str,
        _season: &SeasonId,
        match_id: &str,
        _stat_type: &str,
    ) -> Result<Vec<StatRow>> {
        Err(FbvizError::data_source(format!("no stats for {match_id}")))
    }

    async fn read_lineup(&self, _league: &str, _season: &SeasonId, match_id: &str) -> Result<Vec<LineupRow>> {
        Err(FbvizError::data_source(format!("no lineup for {match_id}")))
    }
}

struct NoLogos;

#[async_trait]
impl LogoSource for NoLogos {
    async fn fetch_logo(&self, url: &str) -> Result<Vec<u8>> {
        Err(FbvizError::data_source(format!("unexpected logo fetch of {url}")))
    }
}

fn app(dir: &TempDir) -> (FbvizApp<FakeProvider, NoLogos>, Arc<AtomicUsize>) {
    let mut config = Config::default();
    config.output.directory = dir.path().join("imgs");
    let provider = FakeProvider::default();
    let reads = provider.schedule_reads.clone();
    let cache = SnapshotCache::new(dir.path().join("cache"), None, 64);
    (FbvizApp::new(config, provider, cache, NoLogos), reads)
}

fn seasons(ids: &[&str]) -> SeasonsArgs {
    SeasonsArgs {
        league: "TST-Test League".to_string(),
        seasons: ids.iter().map(|id| SeasonId::new(*id)).collect(),
    }
}

#[tokio::test]
async fn test_clean_wins_table_only_uses_the_cache() {
    let dir = create_temp_dir();
    let (app, reads) = app(&dir);

    for _ in 0..2 {
        let saved = commands::clean_wins::run(&app, &seasons(&["2324", "2425"]), true, &ChartArgs::default())
            .await
            .unwrap();
        assert!(saved.is_none());
    }

    assert_eq!(reads.load(Ordering::SeqCst), 2);
    assert!(!dir.path().join("imgs").exists());
    assert_eq!(app.loader().cache().entries().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_pairings_without_targets_write_nothing() {
    let dir = create_temp_dir();
    let (app, _) = app(&dir);
    let season = SeasonArgs {
        league: "TST-Test League".to_string(),
        season: SeasonId::new("2425"),
    };

    let saved = commands::pairings::run(&app, &season, Some(&SeasonId::new("2324")), 50, &ChartArgs::default())
        .await
        .unwrap();
    assert!(saved.is_none());
}

#[tokio::test]
async fn test_missing_lineups_fail_the_split() {
    let dir = create_temp_dir();
    let (app, _) = app(&dir);
    let command = Command::OnOff {
        season: SeasonArgs {
            league: "TST-Test League".to_string(),
            season: SeasonId::new("2425"),
        },
        team: "Alpha".to_string(),
        lineup_team: None,
        min_starts: 1,
        chart: ChartArgs::default(),
    };

    let result = app.run(command).await;
    assert!(matches!(result, Err(CliError::Pipeline(FbvizError::Validation { .. }))));
}

#[tokio::test]
async fn test_unknown_team_is_reported_before_rendering() {
    let dir = create_temp_dir();
    let (app, _) = app(&dir);
    let command = Command::TeamForm {
        seasons: seasons(&["2425"]),
        team: "Nobody".to_string(),
        window: None,
        chart: ChartArgs::default(),
    };

    assert!(app.run(command).await.is_err());
    assert!(!dir.path().join("imgs").exists());
}

#[tokio::test]
async fn test_cache_clear_after_run() {
    let dir = create_temp_dir();
    let (app, reads) = app(&dir);
    commands::clean_wins::run(&app, &seasons(&["2425"]), true, &ChartArgs::default())
        .await
        .unwrap();

    app.run(Command::Cache {
        action: CacheCommand::Clear,
    })
    .await
    .unwrap();
    assert!(app.loader().cache().entries().await.unwrap().is_empty());

    commands::clean_wins::run(&app, &seasons(&["2425"]), true, &ChartArgs::default())
        .await
        .unwrap();
    assert_eq!(reads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
#[ignore = "needs system fonts"]
async fn test_tackling_chart_is_written() {
    let dir = create_temp_dir();
    let (app, _) = app(&dir);
    let season = SeasonArgs {
        league: "TST-Test League".to_string(),
        season: SeasonId::new("2425"),
    };

    let path = commands::tackling::run(&app, &season, None, "defense", &ChartArgs::default())
        .await
        .unwrap();
    assert!(path.starts_with(dir.path().join("imgs").join("TST-Test League")));
    assert!(path.exists());
}
