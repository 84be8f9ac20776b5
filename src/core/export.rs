use crate::core::aggregate::{
    Aggregator, Filter, OccurrenceFilter, OccurrenceStats, cte_by_day, cte_by_responsible,
};
use crate::core::calculator::idle::idle_report;
use crate::errors::AppResult;
use crate::export::ExportTable;
use crate::models::{CteEntry, Field, OccurrenceRecord, OperationKind, OperationSet};
use crate::utils::formatting::{hours, number};
use crate::utils::range::DateRange;
use crate::utils::time::{format_hours_label, format_hours_minutes};

/// Rows kept in the busiest-days table.
const TOP_DAYS: usize = 3;

/// Loaded datasets the export tables are computed from.
pub struct ExportSources<'a> {
    pub operations: &'a OperationSet,
    pub cte_log: &'a [CteEntry],
    pub occurrences: &'a [OccurrenceRecord],
}

/// The aggregate tables of the daily report, for file export.
///
/// Tables whose source column is not loaded are skipped; the ones that are
/// always computable (counts, CT-e log, occurrences) are always present,
/// possibly empty.
pub fn report_tables(
    sources: &ExportSources<'_>,
    filter: &Filter,
    range: &DateRange,
    shift: Option<&str>,
    home_base: &str,
    expected_hours: f64,
) -> AppResult<Vec<ExportTable>> {
    let set = sources.operations;
    let cte_log = sources.cte_log;
    let agg = Aggregator::new(set, filter);
    let schema = agg.schema();
    let mut tables = vec![ExportTable::from_aggregate(
        "Operações por tipo",
        &agg.count_by_type(),
        number,
    )];

    if schema.contains(Field::CteQuantity) {
        let closeouts = Aggregator::new(set, &filter.with_kind(OperationKind::Closeout));
        let by_collab = closeouts
            .sum_by_dimension(Field::CteQuantity, Field::Collaborator)?
            .sorted_desc();
        tables.push(ExportTable::from_aggregate(
            "CT-e por colaborador",
            &by_collab,
            number,
        ));
    }

    tables.push(ExportTable::from_aggregate(
        "CT-e digitados",
        &cte_by_responsible(cte_log, range, shift),
        number,
    ));
    tables.push(ExportTable::from_aggregate(
        "Dias com mais CT-e",
        &cte_by_day(cte_log, range, shift).truncated(TOP_DAYS),
        number,
    ));

    if schema.contains(Field::Duration) {
        tables.push(ExportTable::from_aggregate(
            "Tempo médio por tipo",
            &agg.mean_duration(Field::Kind)?.sorted_desc(),
            format_hours_label,
        ));

        if schema.contains(Field::Destination) && schema.contains(Field::Plate) {
            tables.push(ExportTable::from_aggregate(
                "Viagens fechadas",
                &agg.closed_trips(home_base)?.map_values("Tempo total", |v| v),
                format_hours_minutes,
            ));
        }

        let mut idle = ExportTable::new(
            "Ociosidade",
            &["Colaborador", "Data", "Trabalhado", "Ocioso", "Ociosidade (%)"],
            2,
        );
        for r in idle_report(&agg, expected_hours)? {
            idle.push(vec![
                r.collaborator,
                r.date,
                hours(r.worked_hours),
                hours(r.idle_hours),
                format!("{:.1}", r.idle_pct),
            ]);
        }
        tables.push(idle);
    }

    let stats = OccurrenceStats::new(
        sources.occurrences,
        &OccurrenceFilter {
            range: Some(*range),
            shift: shift.map(str::to_string),
            error_type: None,
        },
    );
    for (title, data) in [
        ("Ocorrências por tipo de erro", stats.by_error_type()),
        ("Ocorrências por turno", stats.by_shift()),
        ("Ocorrências por dia", stats.per_day()),
    ] {
        tables.push(ExportTable::from_aggregate(title, &data, number));
    }

    Ok(tables)
}
