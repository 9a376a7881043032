//! Snapshot cache for provider query results.
//!
//! Each query result is stored as one JSON envelope named after the SHA-256
//! of its canonical key. Entries older than the configured TTL are treated as
//! misses. An in-process moka layer avoids re-reading files within a run.

use chrono::{DateTime, Utc};
use fbviz_common::{FbvizError, Result, SeasonId};
use fbviz_config::CacheConfig;
use moka::future::Cache;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Kind of provider query a cache entry holds.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKind {
    /// League schedule for one season.
    Schedule,
    /// Player season totals.
    PlayerSeasonStats,
    /// Player stats for one match.
    PlayerMatchStats,
    /// Lineup for one match.
    Lineup,
}

impl CacheKind {
    /// Every kind, in listing order.
    pub const ALL: [Self; 4] = [
        Self::Schedule,
        Self::PlayerSeasonStats,
        Self::PlayerMatchStats,
        Self::Lineup,
    ];

    /// Stable name used in file names and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::PlayerSeasonStats => "player_season_stats",
            Self::PlayerMatchStats => "player_match_stats",
            Self::Lineup => "lineup",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheKind {
    type Err = FbvizError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| FbvizError::validation_field(format!("Unknown cache kind '{s}'"), "kind"))
    }
}

/// Parameters identifying one provider query.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    /// Query kind.
    pub kind: CacheKind,
    /// League name.
    pub league: String,
    /// Seasons covered, in request order.
    pub seasons: Vec<SeasonId>,
    /// Stat table name for stat queries.
    pub stat_type: Option<String>,
    /// Match identifier for per-match queries.
    pub match_id: Option<String>,
}

impl CacheKey {
    /// Create a key for a league-wide query.
    pub fn new(kind: CacheKind, league: impl Into<String>, seasons: &[SeasonId]) -> Self {
        Self {
            kind,
            league: league.into(),
            seasons: seasons.to_vec(),
            stat_type: None,
            match_id: None,
        }
    }

    /// Key for one season of a league schedule.
    pub fn schedule(league: &str, season: &SeasonId) -> Self {
        Self::new(CacheKind::Schedule, league, std::slice::from_ref(season))
    }

    /// Add a stat table name.
    pub fn with_stat_type(mut self, stat_type: impl Into<String>) -> Self {
        self.stat_type = Some(stat_type.into());
        self
    }

    /// Add a match identifier.
    pub fn with_match_id(mut self, match_id: impl Into<String>) -> Self {
        self.match_id = Some(match_id.into());
        self
    }

    /// Canonical JSON encoding. Object keys are emitted in sorted order.
    pub fn canonical(&self) -> String {
        let seasons: Vec<&str> = self.seasons.iter().map(|s| s.0.as_str()).collect();
        serde_json::json!({
            "kind": self.kind.as_str(),
            "league": self.league,
            "seasons": seasons,
            "stat_type": self.stat_type,
            "match_id": self.match_id,
        })
        .to_string()
    }

    /// Lowercase hex SHA-256 of the canonical encoding.
    pub fn digest(&self) -> String {
        format!("{:x}", Sha256::digest(self.canonical().as_bytes()))
    }

    /// File name of this entry: `<kind>_<first 16 hex digits>.json`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.json", self.kind, &self.digest()[..16])
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.league)?;
        if !self.seasons.is_empty() {
            let seasons: Vec<&str> = self.seasons.iter().map(|s| s.0.as_str()).collect();
            write!(f, ":{}", seasons.join(","))?;
        }
        if let Some(stat_type) = &self.stat_type {
            write!(f, ":stat={stat_type}")?;
        }
        if let Some(match_id) = &self.match_id {
            write!(f, ":match={match_id}")?;
        }
        Ok(())
    }
}

/// On-disk representation of one cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEnvelope {
    /// Key the payload was stored under.
    pub key: CacheKey,
    /// Write time.
    pub created_at: DateTime<Utc>,
    /// Serialized query result.
    pub payload: serde_json::Value,
}

impl CacheEnvelope {
    /// Whether the entry is still usable at `now`. Entries from the future
    /// (clock skew) count as fresh.
    pub fn is_fresh(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        ttl.map_or(true, |ttl| {
            (now - self.created_at)
                .to_std()
                .map_or(true, |age| age <= ttl)
        })
    }
}

/// Summary of one file in the cache directory.
#[derive(Debug, Clone)]
pub struct CacheEntryInfo {
    /// File name inside the cache directory.
    pub file_name: String,
    /// Key stored in the envelope.
    pub key: CacheKey,
    /// Write time.
    pub created_at: DateTime<Utc>,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Whether the entry is within its TTL.
    pub fresh: bool,
}

/// Cache counters for one run.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Lookups answered from memory or disk.
    pub hits: AtomicU64,
    /// Lookups that required a fetch.
    pub misses: AtomicU64,
    /// Entries written.
    pub writes: AtomicU64,
    /// Entries removed.
    pub invalidations: AtomicU64,
}

impl CacheMetrics {
    fn record(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    /// Fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let total = hits + self.misses.load(Ordering::Relaxed) as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

/// Disk snapshot cache with an in-memory front layer.
pub struct SnapshotCache {
    directory: PathBuf,
    ttl: Option<Duration>,
    memory: Cache<String, Arc<CacheEnvelope>>,
    metrics: Arc<CacheMetrics>,
}

impl SnapshotCache {
    /// Create a cache rooted at `directory`.
    pub fn new(directory: impl Into<PathBuf>, ttl: Option<Duration>, memory_capacity: u64) -> Self {
        Self {
            directory: directory.into(),
            ttl,
            memory: Cache::builder().max_capacity(memory_capacity).build(),
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    /// Create a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.directory.clone(), config.ttl(), config.memory_capacity)
    }

    /// Cache directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.directory.join(key.file_name())
    }

    /// Run counters.
    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Look up a fresh entry and decode its payload.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>> {
        let file_name = key.file_name();
        let now = Utc::now();

        if let Some(envelope) = self.memory.get(&file_name).await {
            if envelope.is_fresh(self.ttl, now) {
                if let Some(payload) = self.decode(key, &envelope) {
                    debug!("Memory cache hit for {}", key);
                    CacheMetrics::record(&self.metrics.hits, 1);
                    return Ok(Some(payload));
                }
                self.memory.invalidate(&file_name).await;
                return Ok(None);
            }
            self.memory.invalidate(&file_name).await;
        }

        let path = self.directory.join(&file_name);
        let Some(envelope) = read_envelope(&path).await? else {
            debug!("Cache miss for {}", key);
            CacheMetrics::record(&self.metrics.misses, 1);
            return Ok(None);
        };

        if envelope.key != *key {
            warn!("Cache file {} holds a different key, ignoring it", path.display());
            CacheMetrics::record(&self.metrics.misses, 1);
            return Ok(None);
        }
        if !envelope.is_fresh(self.ttl, now) {
            debug!("Cache entry for {} is stale (written {})", key, envelope.created_at);
            CacheMetrics::record(&self.metrics.misses, 1);
            return Ok(None);
        }

        let Some(payload) = self.decode(key, &envelope) else {
            return Ok(None);
        };
        debug!("Disk cache hit for {}", key);
        CacheMetrics::record(&self.metrics.hits, 1);
        self.memory.insert(file_name, Arc::new(envelope)).await;
        Ok(Some(payload))
    }

    /// Payload of `envelope` as `T`. A payload of another shape is a miss,
    /// so the caller refetches and overwrites it.
    fn decode<T: DeserializeOwned>(&self, key: &CacheKey, envelope: &CacheEnvelope) -> Option<T> {
        match serde_json::from_value(envelope.payload.clone()) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!("Cached payload for {} no longer decodes, refetching: {}", key, e);
                CacheMetrics::record(&self.metrics.misses, 1);
                None
            }
        }
    }

    /// Store a payload under `key`, replacing any previous entry atomically.
    #[instrument(skip(self, value), fields(key = %key))]
    pub async fn put<T: Serialize + Sync>(&self, key: &CacheKey, value: &T) -> Result<()> {
        let envelope = CacheEnvelope {
            key: key.clone(),
            created_at: Utc::now(),
            payload: serde_json::to_value(value)?,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)?;
        let path = self.path_for(key);

        write_atomic(&self.directory, &path, &bytes)?;
        self.memory.insert(key.file_name(), Arc::new(envelope)).await;
        CacheMetrics::record(&self.metrics.writes, 1);

        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(())
    }

    /// Remove one entry. Returns whether a file was deleted.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn invalidate(&self, key: &CacheKey) -> Result<bool> {
        self.memory.invalidate(&key.file_name()).await;
        let removed = remove_if_exists(&self.path_for(key)).await?;
        if removed {
            CacheMetrics::record(&self.metrics.invalidations, 1);
            info!("Invalidated cache entry {}", key);
        }
        Ok(removed)
    }

    /// Remove every entry whose key satisfies `predicate`.
    pub async fn invalidate_matching<P>(&self, predicate: P) -> Result<usize>
    where
        P: Fn(&CacheKey) -> bool,
    {
        let mut removed = 0;
        for entry in self.entries().await? {
            if predicate(&entry.key) {
                self.memory.invalidate(&entry.file_name).await;
                if remove_if_exists(&self.directory.join(&entry.file_name)).await? {
                    removed += 1;
                }
            }
        }
        CacheMetrics::record(&self.metrics.invalidations, removed as u64);
        info!("Invalidated {} cache entries", removed);
        Ok(removed)
    }

    /// Remove every cache file.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<usize> {
        self.memory.invalidate_all();
        let mut removed = 0;
        for path in self.cache_files().await? {
            if remove_if_exists(&path).await? {
                removed += 1;
            }
        }
        CacheMetrics::record(&self.metrics.invalidations, removed as u64);
        info!("Cleared {} cache entries from {}", removed, self.directory.display());
        Ok(removed)
    }

    /// List readable entries, sorted by file name. Unreadable files are skipped.
    pub async fn entries(&self) -> Result<Vec<CacheEntryInfo>> {
        let now = Utc::now();
        let mut entries = Vec::new();

        for path in self.cache_files().await? {
            let size_bytes = tokio::fs::metadata(&path).await?.len();
            let Some(envelope) = read_envelope(&path).await? else {
                continue;
            };
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            entries.push(CacheEntryInfo {
                file_name,
                fresh: envelope.is_fresh(self.ttl, now),
                created_at: envelope.created_at,
                key: envelope.key,
                size_bytes,
            });
        }

        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }

    async fn cache_files(&self) -> Result<Vec<PathBuf>> {
        let mut dir = match tokio::fs::read_dir(&self.directory).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

/// Return the cached value for `key`, or run `fetch`, store its result and return it.
pub async fn cache_or_fetch<T, F, Fut>(cache: &SnapshotCache, key: &CacheKey, fetch: F) -> Result<T>
where
    T: Serialize + DeserializeOwned + Sync,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if let Some(hit) = cache.get(key).await? {
        return Ok(hit);
    }

    info!("Fetching {}", key);
    let value = fetch().await?;
    cache.put(key, &value).await?;
    Ok(value)
}

async fn read_envelope(path: &Path) -> Result<Option<CacheEnvelope>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice(&bytes) {
        Ok(envelope) => Ok(Some(envelope)),
        Err(e) => {
            warn!("Ignoring unreadable cache file {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

async fn remove_if_exists(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn write_atomic(directory: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::create_dir_all(directory)?;
    let mut tmp = tempfile::NamedTempFile::new_in(directory)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| {
        FbvizError::cache_with_source(format!("Failed to persist {}", path.display()), e.error)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season_key() -> CacheKey {
        CacheKey::new(
            CacheKind::PlayerSeasonStats,
            "ITA-Serie A",
            &[SeasonId::new("2324"), SeasonId::new("2425")],
        )
        .with_stat_type("defense")
    }

    #[test]
    fn test_cache_key_digest_is_stable() {
        let key = season_key();
        assert_eq!(key.digest(), season_key().digest());
        assert_eq!(key.digest().len(), 64);
        assert!(key.file_name().starts_with("player_season_stats_"));
        assert!(key.file_name().ends_with(".json"));
        assert_eq!(key.file_name().len(), "player_season_stats_".len() + 16 + 5);
    }

    #[test]
    fn test_cache_key_digest_depends_on_every_field() {
        let base = season_key();
        let variants = [
            CacheKey { kind: CacheKind::Schedule, ..base.clone() },
            CacheKey { league: "ENG-Premier League".into(), ..base.clone() },
            CacheKey { seasons: vec![SeasonId::new("2425")], ..base.clone() },
            base.clone().with_stat_type("passing"),
            base.clone().with_match_id("abc123"),
        ];
        for variant in variants {
            assert_ne!(variant.digest(), base.digest(), "{variant}");
        }
    }

    #[test]
    fn test_cache_key_display() {
        let key = CacheKey::schedule("ITA-Serie A", &SeasonId::new("2425")).with_match_id("m1");
        assert_eq!(key.to_string(), "schedule:ITA-Serie A:2425:match=m1");
    }

    #[test]
    fn test_cache_kind_from_str() {
        assert_eq!("lineup".parse::<CacheKind>().unwrap(), CacheKind::Lineup);
        assert_eq!(
            "player-match-stats".parse::<CacheKind>().unwrap(),
            CacheKind::PlayerMatchStats
        );
        assert!("fixtures".parse::<CacheKind>().is_err());
    }

    #[test]
    fn test_envelope_freshness() {
        let now = Utc::now();
        let envelope = CacheEnvelope {
            key: season_key(),
            created_at: now - chrono::Duration::hours(3),
            payload: serde_json::Value::Null,
        };
        assert!(envelope.is_fresh(None, now));
        assert!(envelope.is_fresh(Some(Duration::from_secs(4 * 3600)), now));
        assert!(!envelope.is_fresh(Some(Duration::from_secs(2 * 3600)), now));
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), None, 16);
        let key = season_key();

        assert!(cache.get::<Vec<u32>>(&key).await.unwrap().is_none());
        cache.put(&key, &vec![1u32, 2, 3]).await.unwrap();
        assert_eq!(cache.get::<Vec<u32>>(&key).await.unwrap(), Some(vec![1, 2, 3]));
        assert!(cache.path_for(&key).exists());

        let metrics = cache.metrics();
        assert_eq!(metrics.hits.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.misses.load(Ordering::Relaxed), 1);
        assert!(metrics.hit_rate() > 0.0);
    }

    #[tokio::test]
    async fn test_cache_or_fetch_only_fetches_once() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), None, 16);
        let key = season_key();
        let calls = AtomicU64::new(0);

        for _ in 0..3 {
            let value: Vec<String> = cache_or_fetch(&cache, &key, || async {
                calls.fetch_add(1, Ordering::Relaxed);
                Ok(vec!["row".to_string()])
            })
            .await
            .unwrap();
            assert_eq!(value, vec!["row".to_string()]);
        }
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_payload_of_another_shape_is_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let key = season_key();
        let old = SnapshotCache::new(dir.path(), None, 16);
        old.put(&key, &vec!["old".to_string()]).await.unwrap();

        // Same instance: the entry is also in memory.
        assert!(old.get::<Vec<u32>>(&key).await.unwrap().is_none());

        let cache = SnapshotCache::new(dir.path(), None, 16);
        let value: Vec<u32> = cache_or_fetch(&cache, &key, || async { Ok(vec![7u32]) })
            .await
            .unwrap();
        assert_eq!(value, vec![7]);
        assert_eq!(cache.metrics().misses.load(Ordering::Relaxed), 1);
        assert_eq!(cache.metrics().writes.load(Ordering::Relaxed), 1);

        let reopened = SnapshotCache::new(dir.path(), None, 16);
        assert_eq!(reopened.get::<Vec<u32>>(&key).await.unwrap(), Some(vec![7]));
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(dir.path(), None, 16);
        let key = season_key();

        let result: Result<Vec<u32>> =
            cache_or_fetch(&cache, &key, || async { Err(FbvizError::data_source("down")) }).await;
        assert!(result.is_err());
        assert!(!cache.path_for(&key).exists());
    }
}
