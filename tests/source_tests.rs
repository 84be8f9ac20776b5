mod common;
use common::{CTE_LOG_CSV, OPERATIONS_CSV, day};
use rfechamento::config::{Config, SourcesConfig};
use rfechamento::core::{Core, ReportOptions};
use rfechamento::errors::{AppError, AppResult};
use rfechamento::source::{Fetcher, SourceCache};
use rfechamento::utils::range::DateRange;
use std::cell::Cell;
use std::collections::HashMap;
use std::time::Duration;

/// In-memory sources that count how often each location is read.
#[derive(Default)]
struct CountingFetcher {
    files: HashMap<String, String>,
    calls: Cell<usize>,
}

impl CountingFetcher {
    fn with(mut self, location: &str, text: &str) -> Self {
        self.files.insert(location.to_string(), text.to_string());
        self
    }
}

impl Fetcher for CountingFetcher {
    fn fetch(&self, location: &str) -> AppResult<String> {
        self.calls.set(self.calls.get() + 1);
        self.files.get(location).cloned().ok_or_else(|| AppError::Http {
            location: location.to_string(),
            message: "404 Not Found".into(),
        })
    }
}

#[test]
fn test_cache_hit_within_ttl() {
    let fetcher = CountingFetcher::default().with("ops", "a,b\n1,2\n");
    let cache = SourceCache::new(Duration::from_secs(600));

    let first = cache.get_or_fetch("ops", &fetcher).expect("fetch");
    let second = cache.get_or_fetch("ops", &fetcher).expect("fetch");

    assert_eq!(first, second);
    assert_eq!(fetcher.calls.get(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_expired_entry_is_fetched_again() {
    let fetcher = CountingFetcher::default().with("ops", "a,b\n1,2\n");
    let cache = SourceCache::new(Duration::ZERO);

    cache.get_or_fetch("ops", &fetcher).expect("fetch");
    cache.get_or_fetch("ops", &fetcher).expect("fetch");
    assert_eq!(fetcher.calls.get(), 2);
}

#[test]
fn test_cache_invalidate_and_failures() {
    let fetcher = CountingFetcher::default().with("ops", "a,b\n1,2\n");
    let cache = SourceCache::new(Duration::from_secs(600));

    cache.get_or_fetch("ops", &fetcher).expect("fetch");
    cache.invalidate("ops");
    assert!(cache.is_empty());
    cache.get_or_fetch("ops", &fetcher).expect("fetch");
    assert_eq!(fetcher.calls.get(), 2);

    // A failed fetch leaves nothing behind
    assert!(cache.get_or_fetch("missing", &fetcher).is_err());
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

fn config() -> Config {
    Config {
        sources: SourcesConfig {
            operations: "ops".into(),
            cte_log: Some("cte".into()),
            occurrences: None,
            toll_plazas: None,
        },
        ..Config::default()
    }
}

#[test]
fn test_core_loads_each_source_once() {
    let cfg = config();
    let fetcher = CountingFetcher::default()
        .with("ops", OPERATIONS_CSV)
        .with("cte", CTE_LOG_CSV);
    let core = Core::with_fetcher(&cfg, Box::new(fetcher));

    let opts = ReportOptions::for_range(DateRange::single(day(2026, 10, 19)));
    let first = core.export_tables(&opts).expect("tables");
    let second = core.export_tables(&opts).expect("tables");
    assert_eq!(first, second);
    assert_eq!(core.cache().len(), 2);
    assert_eq!(core.cache().ttl(), Duration::from_secs(600));

    assert!(core.occurrences().expect("occurrences").is_empty());
    assert!(core.toll_plazas().expect("plazas").is_empty());
}

#[test]
fn test_core_without_operations_source() {
    let cfg = Config::default();
    let core = Core::with_fetcher(&cfg, Box::new(CountingFetcher::default()));
    assert!(core.operations().unwrap_err().is_config());
}

#[test]
fn test_core_fetch_error_is_reported() {
    let cfg = config();
    let core = Core::with_fetcher(&cfg, Box::new(CountingFetcher::default()));
    let err = core.operations().unwrap_err();
    assert!(matches!(err, AppError::Http { .. }));
}

#[test]
fn test_export_tables_content() {
    let cfg = config();
    let fetcher = CountingFetcher::default()
        .with("ops", OPERATIONS_CSV)
        .with("cte", CTE_LOG_CSV);
    let core = Core::with_fetcher(&cfg, Box::new(fetcher));

    let opts = ReportOptions::for_range(DateRange::single(day(2026, 10, 19)));
    let tables = core.export_tables(&opts).expect("tables");
    let titles: Vec<&str> = tables.iter().map(|t| t.title.as_str()).collect();

    assert_eq!(
        titles,
        vec![
            "Operações por tipo",
            "CT-e por colaborador",
            "CT-e digitados",
            "Dias com mais CT-e",
            "Tempo médio por tipo",
            "Viagens fechadas",
            "Ociosidade",
            "Ocorrências por tipo de erro",
            "Ocorrências por turno",
            "Ocorrências por dia",
        ]
    );

    let by_type = &tables[0];
    assert_eq!(by_type.rows[0], vec!["Lançamento".to_string(), "3".to_string()]);

    let busiest = &tables[3];
    assert_eq!(busiest.rows, vec![vec!["19/10/2026".to_string(), "40".to_string()]]);

    let trips = &tables[5];
    assert!(trips.rows.iter().all(|r| r[0] != "Itapecerica da Serra"));

    // No occurrence source configured: the tables are there but empty
    assert!(tables[7..].iter().all(|t| t.is_empty()));
}

#[test]
fn test_source_with_broken_columns_is_not_cached() {
    let cfg = config();
    let fetcher = CountingFetcher::default()
        .with("ops", OPERATIONS_CSV)
        .with("cte", "Quando,Quem\n19/10/2026,Ana\n");
    let core = Core::with_fetcher(&cfg, Box::new(fetcher));

    assert!(core.cte_log().unwrap_err().is_config());
    assert!(core.cache().is_empty());

    core.operations().expect("operations");
    assert_eq!(core.cache().len(), 1);
    assert!(core.cte_log().is_err());
    assert_eq!(core.cache().len(), 1);
}
