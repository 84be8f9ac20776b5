//! Data access: fetch each configured source through the TTL cache and
//! hand the parsed table to the normalizer.

pub mod cache;
pub mod fetch;
pub mod table;

pub use cache::SourceCache;
pub use fetch::{DefaultFetcher, Fetcher};
pub use table::RawTable;

use crate::config::SourcesConfig;
use crate::core::normalize::{
    QuantityPolicy, normalize_cte_log, normalize_occurrences, normalize_operations,
    normalize_toll_plazas,
};
use crate::errors::{AppError, AppResult};
use crate::models::{CteEntry, OccurrenceRecord, OperationSet, TollPlaza};
use log::{info, warn};

/// Per-request view over the configured datasets.
pub struct DataSources<'a> {
    sources: &'a SourcesConfig,
    cache: &'a SourceCache,
    fetcher: &'a dyn Fetcher,
}

impl<'a> DataSources<'a> {
    pub fn new(sources: &'a SourcesConfig, cache: &'a SourceCache, fetcher: &'a dyn Fetcher) -> Self {
        Self {
            sources,
            cache,
            fetcher,
        }
    }

    pub fn table(&self, location: &str) -> AppResult<RawTable> {
        self.load(location, |t| Ok(t.clone()))
    }

    /// Parse and normalize one source. A source that fails either step is
    /// dropped from the cache so the next request fetches it again.
    fn load<T>(
        &self,
        location: &str,
        normalize: impl FnOnce(&RawTable) -> AppResult<T>,
    ) -> AppResult<T> {
        let text = self.cache.get_or_fetch(location, self.fetcher)?;
        let result = RawTable::parse(&text).and_then(|t| normalize(&t));
        if let Err(e) = &result {
            warn!("discarding cached source {location}: {e}");
            self.cache.invalidate(location);
        }
        result
    }

    fn load_optional<T: Default>(
        &self,
        location: Option<&str>,
        normalize: impl FnOnce(&RawTable) -> AppResult<T>,
    ) -> AppResult<T> {
        match location.map(str::trim).filter(|l| !l.is_empty()) {
            Some(l) => self.load(l, normalize),
            None => Ok(T::default()),
        }
    }

    pub fn operations(&self, policy: QuantityPolicy) -> AppResult<OperationSet> {
        let location = self.sources.operations.trim();
        if location.is_empty() {
            return Err(AppError::config(
                "no operations source configured (sources.operations)",
            ));
        }
        let set = self.load(location, |t| normalize_operations(t, policy))?;
        info!(
            "loaded {} operation rows ({} dropped)",
            set.len(),
            set.dropped
        );
        Ok(set)
    }

    /// Empty when no CT-e log is configured.
    pub fn cte_log(&self) -> AppResult<Vec<CteEntry>> {
        self.load_optional(self.sources.cte_log.as_deref(), normalize_cte_log)
    }

    /// Empty when no occurrence log is configured.
    pub fn occurrences(&self) -> AppResult<Vec<OccurrenceRecord>> {
        self.load_optional(self.sources.occurrences.as_deref(), normalize_occurrences)
    }

    pub fn toll_plazas(&self) -> AppResult<Vec<TollPlaza>> {
        self.load_optional(self.sources.toll_plazas.as_deref(), normalize_toll_plazas)
    }
}
