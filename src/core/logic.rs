use crate::config::Config;
use crate::core::aggregate::Filter;
use crate::core::export::{ExportSources, report_tables};
use crate::errors::AppResult;
use crate::export::ExportTable;
use crate::models::{CteEntry, OccurrenceRecord, OperationSet, TollPlaza};
use crate::report::chart::ensure_chart_font;
use crate::report::{ChartRenderer, Report, ReportContext, ReportSettings, compose};
use crate::source::{DataSources, DefaultFetcher, Fetcher, RawTable, SourceCache};
use crate::utils::date::today;
use crate::utils::path::expand_tilde;
use crate::utils::range::DateRange;
use log::{debug, warn};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// What the user picked for one report run.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub range: DateRange,
    pub collaborator: Option<String>,
    pub shift: Option<String>,
    pub notes: Option<String>,
}

impl ReportOptions {
    pub fn for_range(range: DateRange) -> Self {
        Self {
            range,
            collaborator: None,
            shift: None,
            notes: None,
        }
    }

    pub fn filter(&self) -> Filter {
        Filter {
            range: Some(self.range),
            collaborator: self.collaborator.clone(),
            ..Default::default()
        }
    }
}

/// Configuration plus source cache for one invocation. Every load goes
/// through the cache, so asking twice for the same source within the TTL
/// fetches it once.
pub struct Core<'a> {
    cfg: &'a Config,
    cache: SourceCache,
    fetcher: Box<dyn Fetcher + 'a>,
}

impl<'a> Core<'a> {
    pub fn new(cfg: &'a Config) -> AppResult<Self> {
        Ok(Self::with_fetcher(cfg, Box::new(DefaultFetcher::new()?)))
    }

    pub fn with_fetcher(cfg: &'a Config, fetcher: Box<dyn Fetcher + 'a>) -> Self {
        Self {
            cfg,
            cache: SourceCache::new(Duration::from_secs(cfg.cache_ttl_secs)),
            fetcher,
        }
    }

    pub fn cache(&self) -> &SourceCache {
        &self.cache
    }

    fn sources(&self) -> DataSources<'_> {
        DataSources::new(&self.cfg.sources, &self.cache, self.fetcher.as_ref())
    }

    /// Any CSV location (route files, alternate plaza tables).
    pub fn table(&self, location: &str) -> AppResult<RawTable> {
        self.sources().table(location)
    }

    pub fn operations(&self) -> AppResult<OperationSet> {
        self.sources().operations(self.cfg.invalid_quantity)
    }

    pub fn cte_log(&self) -> AppResult<Vec<CteEntry>> {
        self.sources().cte_log()
    }

    pub fn occurrences(&self) -> AppResult<Vec<OccurrenceRecord>> {
        self.sources().occurrences()
    }

    pub fn toll_plazas(&self) -> AppResult<Vec<TollPlaza>> {
        self.sources().toll_plazas()
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            title: self.cfg.title.clone(),
            subject: self.cfg.mail.subject.clone(),
            home_base: self.cfg.home_base.clone(),
            expected_hours: self.cfg.expected_work_hours,
            charts: self.cfg.charts.clone(),
        }
    }

    /// Signature image bytes; a configured but unreadable file only costs
    /// the image, not the report.
    pub fn signature(&self) -> Option<Vec<u8>> {
        let path = self.cfg.signature.as_deref()?;
        match fs::read(expand_tilde(path)) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("signature '{path}' not readable: {e}");
                None
            }
        }
    }

    /// Load everything, then compose. Nothing is sent here.
    pub fn build_report(&self, opts: &ReportOptions) -> AppResult<Report> {
        let operations = self.operations()?;
        let cte_log = self.cte_log()?;
        let occurrences = self.occurrences()?;
        debug!(
            "report inputs: {} operations, {} CT-e entries, {} occurrences",
            operations.len(),
            cte_log.len(),
            occurrences.len()
        );

        let ctx = ReportContext {
            operations: &operations,
            range: opts.range,
            collaborator: opts.collaborator.clone(),
            cte_log: &cte_log,
            occurrences: &occurrences,
            shift: opts.shift.clone(),
            notes: opts.notes.clone(),
            report_date: today(),
            signature: self.signature(),
        };

        if !ensure_chart_font(self.cfg.chart_font.as_deref().map(Path::new)) {
            warn!("no chart font available: charts are drawn without labels (set chart_font)");
        }

        compose(&ctx, &self.report_settings(), &ChartRenderer::new())
    }

    pub fn export_tables(&self, opts: &ReportOptions) -> AppResult<Vec<ExportTable>> {
        let operations = self.operations()?;
        let cte_log = self.cte_log()?;
        let occurrences = self.occurrences()?;
        let sources = ExportSources {
            operations: &operations,
            cte_log: &cte_log,
            occurrences: &occurrences,
        };
        report_tables(
            &sources,
            &opts.filter(),
            &opts.range,
            opts.shift.as_deref(),
            &self.cfg.home_base,
            self.cfg.expected_work_hours,
        )
    }
}
