//! `cache`: list, clear and invalidate snapshot files.

use crate::args::CacheCommand;
use crate::error::{CliError, CliResult};
use fbviz_common::SeasonId;
use fbviz_data::{CacheEntryInfo, CacheKey, CacheKind, SnapshotCache};

/// Filters for `cache invalidate`; unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFilter {
    /// Query kind.
    pub kind: Option<CacheKind>,
    /// League.
    pub league: Option<String>,
    /// Season contained in the key.
    pub season: Option<SeasonId>,
    /// Match identifier.
    pub match_id: Option<String>,
}

impl KeyFilter {
    /// Whether no filter is set.
    pub const fn is_empty(&self) -> bool {
        self.kind.is_none() && self.league.is_none() && self.season.is_none() && self.match_id.is_none()
    }

    /// Whether `key` satisfies every set filter.
    pub fn matches(&self, key: &CacheKey) -> bool {
        self.kind.map_or(true, |kind| key.kind == kind)
            && self.league.as_ref().map_or(true, |league| &key.league == league)
            && self.season.as_ref().map_or(true, |season| key.seasons.contains(season))
            && self
                .match_id
                .as_ref()
                .map_or(true, |id| key.match_id.as_ref() == Some(id))
    }
}

/// One line of `cache list`.
pub fn describe(entry: &CacheEntryInfo) -> String {
    format!(
        "{}  {}  {:>9} B  {}  {}",
        entry.created_at.format("%Y-%m-%d %H:%M"),
        if entry.fresh { "fresh" } else { "stale" },
        entry.size_bytes,
        entry.key,
        entry.file_name
    )
}

/// Runs a cache subcommand, printing its result.
pub async fn run(cache: &SnapshotCache, action: CacheCommand) -> CliResult<()> {
    match action {
        CacheCommand::List => {
            let entries = cache.entries().await?;
            for entry in &entries {
                println!("{}", describe(entry));
            }
            let bytes: u64 = entries.iter().map(|e| e.size_bytes).sum();
            println!(
                "{} entries, {} bytes in {}",
                entries.len(),
                bytes,
                cache.directory().display()
            );
        }
        CacheCommand::Clear => {
            let removed = cache.clear().await?;
            println!("Removed {} entries", removed);
        }
        CacheCommand::Invalidate {
            kind,
            league,
            season,
            match_id,
        } => {
            let filter = KeyFilter {
                kind: kind.as_deref().map(str::parse::<CacheKind>).transpose()?,
                league,
                season,
                match_id,
            };
            if filter.is_empty() {
                return Err(CliError::Usage(
                    "give at least one filter, or use `cache clear`".to_string(),
                ));
            }
            let removed = cache.invalidate_matching(|key| filter.matches(key)).await?;
            println!("Removed {} entries", removed);
        }
    }
    Ok(())
}
