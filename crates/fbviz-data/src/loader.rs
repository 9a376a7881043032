//! Cached provider reads used by the chart pipelines.

use crate::cache::{cache_or_fetch, CacheKey, CacheKind, SnapshotCache};
use crate::source::DataSource;
use fbviz_common::{filter_regular_season, LineupRow, Result, ScheduleRow, SeasonId, StatRow};
use tracing::{info, instrument, warn};

/// Rows gathered by a per-match loop, with the matches that were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchBatch<T> {
    /// Rows from every match that loaded.
    pub rows: Vec<T>,
    /// Match identifiers whose fetch failed.
    pub skipped: Vec<String>,
}

impl<T> Default for MatchBatch<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Routes every provider read through the snapshot cache.
pub struct DataLoader<S> {
    source: S,
    cache: SnapshotCache,
}

impl<S: DataSource> DataLoader<S> {
    /// Create a loader over a source and a cache.
    pub const fn new(source: S, cache: SnapshotCache) -> Self {
        Self { source, cache }
    }

    /// The snapshot cache.
    pub const fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// The underlying source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Schedules for every season, concatenated in season order.
    ///
    /// Played play-off rounds are dropped for leagues that have them;
    /// unplayed fixtures are all kept.
    #[instrument(skip(self))]
    pub async fn schedule(&self, league: &str, seasons: &[SeasonId]) -> Result<Vec<ScheduleRow>> {
        let mut rows = Vec::new();
        for season in seasons {
            let key = CacheKey::schedule(league, season);
            let season_rows: Vec<ScheduleRow> =
                cache_or_fetch(&self.cache, &key, || self.source.read_schedule(league, season)).await?;
            rows.extend(season_rows);
        }
        Ok(filter_regular_season(rows, league))
    }

    /// Player season totals for every season. Rows without a season get the
    /// season they were requested for.
    #[instrument(skip(self))]
    pub async fn player_season_stats(
        &self,
        league: &str,
        seasons: &[SeasonId],
        stat_type: &str,
    ) -> Result<Vec<StatRow>> {
        let mut rows = Vec::new();
        for season in seasons {
            let key = CacheKey::new(CacheKind::PlayerSeasonStats, league, std::slice::from_ref(season))
                .with_stat_type(stat_type);
            let season_rows: Vec<StatRow> = cache_or_fetch(&self.cache, &key, || {
                self.source.read_player_season_stats(league, season, stat_type)
            })
            .await?;
            rows.extend(season_rows.into_iter().map(|mut row| {
                row.season.get_or_insert_with(|| season.clone());
                row
            }));
        }
        Ok(rows)
    }

    /// Player stats for each match. A match that fails to load is logged and skipped.
    #[instrument(skip(self, match_ids), fields(matches = match_ids.len()))]
    pub async fn player_match_stats(
        &self,
        league: &str,
        season: &SeasonId,
        match_ids: &[String],
        stat_type: &str,
    ) -> MatchBatch<StatRow> {
        let mut batch = MatchBatch::default();

        for match_id in match_ids {
            let key = CacheKey::new(CacheKind::PlayerMatchStats, league, std::slice::from_ref(season))
                .with_stat_type(stat_type)
                .with_match_id(match_id.as_str());
            let fetched: Result<Vec<StatRow>> = cache_or_fetch(&self.cache, &key, || {
                self.source
                    .read_player_match_stats(league, season, match_id, stat_type)
            })
            .await;

            match fetched {
                Ok(rows) => batch.rows.extend(rows.into_iter().map(|mut row| {
                    row.game_id.get_or_insert_with(|| match_id.clone());
                    row.season.get_or_insert_with(|| season.clone());
                    row
                })),
                Err(e) => {
                    warn!("Skipping match {} ({} stats): {}", match_id, stat_type, e);
                    batch.skipped.push(match_id.clone());
                }
            }
        }

        info!(
            "Loaded {} stat rows from {} matches, skipped {}",
            batch.rows.len(),
            match_ids.len() - batch.skipped.len(),
            batch.skipped.len()
        );
        batch
    }

    /// Lineups for each match. A match that fails to load is logged and skipped.
    #[instrument(skip(self, match_ids), fields(matches = match_ids.len()))]
    pub async fn lineups(&self, league: &str, season: &SeasonId, match_ids: &[String]) -> MatchBatch<LineupRow> {
        let mut batch = MatchBatch::default();

        for match_id in match_ids {
            let key = CacheKey::new(CacheKind::Lineup, league, std::slice::from_ref(season))
                .with_match_id(match_id.as_str());
            let fetched: Result<Vec<LineupRow>> = cache_or_fetch(&self.cache, &key, || {
                self.source.read_lineup(league, season, match_id)
            })
            .await;

            match fetched {
                Ok(rows) => batch.rows.extend(rows),
                Err(e) => {
                    warn!("Skipping lineup of match {}: {}", match_id, e);
                    batch.skipped.push(match_id.clone());
                }
            }
        }

        info!(
            "Loaded {} lineup rows, skipped {} matches",
            batch.rows.len(),
            batch.skipped.len()
        );
        batch
    }
}

/// Identifiers of played matches, in schedule order, without duplicates.
pub fn played_match_ids(rows: &[ScheduleRow]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    rows.iter()
        .filter(|row| row.is_played())
        .filter_map(|row| row.game_id.clone())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockDataSource;
    use fbviz_common::test_utils::{schedule_fixtures, stat_fixtures};
    use fbviz_common::FbvizError;

    fn loader(source: MockDataSource) -> (DataLoader<MockDataSource>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), None, 32);
        (DataLoader::new(source, cache), dir)
    }

    #[tokio::test]
    async fn test_schedule_is_fetched_once_per_season() {
        let mut source = MockDataSource::new();
        source
            .expect_read_schedule()
            .times(2)
            .returning(|_, season| Ok(schedule_fixtures::four_team_season(&season.0)));

        let (loader, _dir) = loader(source);
        let seasons = [SeasonId::new("2324"), SeasonId::new("2425")];

        let first = loader.schedule("TST-Test League", &seasons).await.unwrap();
        let second = loader.schedule("TST-Test League", &seasons).await.unwrap();

        assert_eq!(first.len(), 24);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_playoff_filter_spares_future_fixtures() {
        let mut source = MockDataSource::new();
        source.expect_read_schedule().times(1).returning(|_, season| {
            let mut rows = schedule_fixtures::four_team_season(&season.0);
            rows.extend(schedule_fixtures::four_team_future(&season.0));
            for row in rows.iter_mut().filter(|row| row.week >= Some(6)) {
                row.round = Some("Championship round".to_string());
            }
            Ok(rows)
        });

        let (loader, _dir) = loader(source);
        let rows = loader
            .schedule("BEL-Belgian Pro League", &[SeasonId::new("2425")])
            .await
            .unwrap();

        assert_eq!(rows.iter().filter(|row| row.is_played()).count(), 10);
        assert_eq!(rows.iter().filter(|row| !row.is_played()).count(), 6);
    }

    #[tokio::test]
    async fn test_schedule_error_propagates() {
        let mut source = MockDataSource::new();
        source
            .expect_read_schedule()
            .returning(|_, _| Err(FbvizError::data_source_with_status("gone", 404)));

        let (loader, _dir) = loader(source);
        let result = loader.schedule("TST-Test League", &[SeasonId::new("2425")]).await;
        assert!(matches!(result, Err(FbvizError::DataSource { status_code: Some(404), .. })));
    }

    #[tokio::test]
    async fn test_season_stats_are_tagged_with_season() {
        let mut source = MockDataSource::new();
        source
            .expect_read_player_season_stats()
            .withf(|_, _, stat_type| stat_type == "defense")
            .returning(|_, _, _| Ok(vec![stat_fixtures::stat_row("A", "Alpha", &[("Tkl", 3.0)])]));

        let (loader, _dir) = loader(source);
        let rows = loader
            .player_season_stats("TST-Test League", &[SeasonId::new("2425")], "defense")
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].season, Some(SeasonId::new("2425")));
    }

    #[tokio::test]
    async fn test_failed_match_is_skipped() {
        let mut source = MockDataSource::new();
        source
            .expect_read_player_match_stats()
            .returning(|_, _, match_id, _| {
                if match_id == "m2" {
                    Err(FbvizError::data_source("timeout"))
                } else {
                    Ok(vec![stat_fixtures::stat_row("A", "Alpha", &[("Fls", 2.0)])])
                }
            });

        let (loader, _dir) = loader(source);
        let ids = vec!["m1".to_string(), "m2".to_string(), "m3".to_string()];
        let batch = loader
            .player_match_stats("TST-Test League", &SeasonId::new("2425"), &ids, "misc")
            .await;

        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.skipped, vec!["m2".to_string()]);
        assert_eq!(batch.rows[1].game_id.as_deref(), Some("m3"));
    }

    #[tokio::test]
    async fn test_failed_lineup_is_skipped() {
        let mut source = MockDataSource::new();
        source.expect_read_lineup().returning(|_, _, match_id| {
            if match_id == "m1" {
                Ok(vec![stat_fixtures::lineup("m1", "Alpha", "A", true)])
            } else {
                Err(FbvizError::data_source("missing"))
            }
        });

        let (loader, _dir) = loader(source);
        let ids = vec!["m1".to_string(), "m2".to_string()];
        let batch = loader.lineups("TST-Test League", &SeasonId::new("2425"), &ids).await;

        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.skipped, vec!["m2".to_string()]);
    }

    #[test]
    fn test_played_match_ids_skips_future_fixtures() {
        let mut rows = schedule_fixtures::four_team_season("2425");
        rows.extend(schedule_fixtures::four_team_future("2425"));
        let ids = played_match_ids(&rows);
        assert_eq!(ids.len(), 12);
    }
}
