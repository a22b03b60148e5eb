//! The update cycle: fetch each configured feed, keep the entries that mention
//! a tracked platform, and append the ones not seen before to the record store.
//!
//! Sources are processed one after another. A source that cannot be fetched
//! is skipped with a warning; a store that cannot be read or written aborts
//! the whole run.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::feed::filter::PlatformFilter;
use crate::feed::{Entry, FeedSource};
use crate::storage::{novel, render_dump, RecordStore};

/// How processing of a single source ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    FetchFailed(String),
    EmptyFeed,
    NoArticles,
    NoNewEntries,
    Persisted { added: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub url: String,
    pub outcome: SourceOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub sources: Vec<SourceReport>,
}

impl CycleReport {
    pub fn total_added(&self) -> usize {
        self.sources
            .iter()
            .map(|s| match s.outcome {
                SourceOutcome::Persisted { added } => added,
                _ => 0,
            })
            .sum()
    }

    pub fn failed(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| matches!(s.outcome, SourceOutcome::FetchFailed(_)))
            .count()
    }
}

pub struct Watcher<S: FeedSource> {
    feeds: Vec<String>,
    filter: PlatformFilter,
    store: RecordStore,
    source: S,
}

impl<S: FeedSource> Watcher<S> {
    pub fn new(config: &Config, source: S) -> Result<Self> {
        Ok(Self {
            feeds: config.feeds.clone(),
            filter: PlatformFilter::new(&config.platforms)?,
            store: RecordStore::new(config.store_path.clone()),
            source,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Run one cycle over every configured source.
    pub async fn run(&self) -> Result<CycleReport> {
        info!("Starting getting the feed ...");
        debug!("Tracked platforms: {:?}", self.filter.patterns());
        let mut report = CycleReport::default();

        for url in &self.feeds {
            let outcome = self.process_source(url).await?;
            report.sources.push(SourceReport {
                url: url.clone(),
                outcome,
            });
        }

        info!(
            "Cycle finished: {} new entries, {} sources failed",
            report.total_added(),
            report.failed()
        );
        Ok(report)
    }

    async fn process_source(&self, url: &str) -> Result<SourceOutcome> {
        let entries = match self.source.fetch_entries(url).await {
            Ok(entries) => entries,
            Err(e) if e.is_source_failure() => {
                warn!("Failed to fetch {}: {}", url, e);
                return Ok(SourceOutcome::FetchFailed(e.to_string()));
            }
            Err(e) => return Err(e),
        };

        if entries.is_empty() {
            warn!("Feed {} has no entries", url);
            return Ok(SourceOutcome::EmptyFeed);
        }

        info!("Checking {} entries from {}", entries.len(), url);
        let matched = self.filter.filter(entries);
        self.record(&matched)
    }

    /// Merge already-filtered entries into the store. The store file is only
    /// rewritten when at least one title is new.
    pub fn record(&self, matched: &[Entry]) -> Result<SourceOutcome> {
        if matched.is_empty() {
            warn!("There were no articles found.");
            return Ok(SourceOutcome::NoArticles);
        }

        let mut stored = self.store.load()?;
        let fresh = novel(&stored, matched);

        if fresh.is_empty() {
            warn!("There were no new entries.");
            return Ok(SourceOutcome::NoNewEntries);
        }

        let added = fresh.len();
        stored.extend(fresh);
        self.store.save(&stored)?;
        Ok(SourceOutcome::Persisted { added })
    }

    /// Full listing of the store as it stands now.
    pub fn dump(&self) -> Result<String> {
        Ok(render_dump(&self.store.load()?))
    }
}
