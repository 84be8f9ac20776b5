//! Metric aggregator over a normalized operation set.
//!
//! Aggregates keep first-encountered group order until they are sorted;
//! sorting is stable, so ties stay in that order.

use crate::errors::{AppError, AppResult};
use crate::models::cte_entry::normalize_shift;
use crate::models::{
    CteEntry, Field, OccurrenceRecord, OperationKind, OperationRecord, OperationSet, Schema,
};
use crate::utils::date::format_br;
use crate::utils::range::DateRange;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

// ---------------------------
// Filter
// ---------------------------

/// Row selection applied before any aggregation.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub range: Option<DateRange>,
    pub collaborator: Option<String>,
    pub kind: Option<OperationKind>,
    pub shift: Option<String>,
}

impl Filter {
    pub fn for_range(range: DateRange) -> Self {
        Self {
            range: Some(range),
            ..Default::default()
        }
    }

    pub fn with_kind(&self, kind: OperationKind) -> Self {
        Self {
            kind: Some(kind),
            ..self.clone()
        }
    }

    pub fn matches(&self, r: &OperationRecord) -> bool {
        if let Some(range) = &self.range
            && !range.contains(r.date)
        {
            return false;
        }
        if let Some(c) = &self.collaborator
            && !r.collaborator.trim().eq_ignore_ascii_case(c.trim())
        {
            return false;
        }
        if let Some(k) = &self.kind
            && &r.kind != k
        {
            return false;
        }
        if let Some(s) = &self.shift
            && r.shift != normalize_shift(s)
        {
            return false;
        }
        true
    }
}

// ---------------------------
// Aggregate
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub keys: Vec<String>,
    pub value: f64,
}

impl AggregateRow {
    pub fn label(&self) -> String {
        self.keys.join(" / ")
    }
}

/// Ordered group → value table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate {
    /// Column names of the grouping keys.
    pub dimensions: Vec<String>,
    /// Column name of the value.
    pub measure: String,
    pub rows: Vec<AggregateRow>,
}

impl Aggregate {
    pub fn new(dimensions: Vec<String>, measure: &str) -> Self {
        Self {
            dimensions,
            measure: measure.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Value of a single-key group.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.keys.len() == 1 && r.keys[0] == key)
            .map(|r| r.value)
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.value).sum()
    }

    pub fn max(&self) -> Option<f64> {
        self.rows.iter().map(|r| r.value).reduce(f64::max)
    }

    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(AggregateRow::label).collect()
    }

    /// Descending by value; ties keep their current relative order.
    pub fn sorted_desc(mut self) -> Self {
        self.rows
            .sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        self
    }

    pub fn truncated(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    pub fn map_values(mut self, measure: &str, f: impl Fn(f64) -> f64) -> Self {
        for r in &mut self.rows {
            r.value = f(r.value);
        }
        self.measure = measure.to_string();
        self
    }
}

/// Accumulates sums and counts per composite key, in insertion order.
#[derive(Default)]
struct Grouper {
    index: HashMap<Vec<String>, usize>,
    groups: Vec<(Vec<String>, f64, usize)>,
}

impl Grouper {
    fn add(&mut self, keys: Vec<String>, value: f64) {
        match self.index.get(&keys) {
            Some(&i) => {
                self.groups[i].1 += value;
                self.groups[i].2 += 1;
            }
            None => {
                self.index.insert(keys.clone(), self.groups.len());
                self.groups.push((keys, value, 1));
            }
        }
    }

    fn into_sums(self, mut agg: Aggregate) -> Aggregate {
        agg.rows = self
            .groups
            .into_iter()
            .map(|(keys, sum, _)| AggregateRow { keys, value: sum })
            .collect();
        agg
    }

    fn into_means(self, mut agg: Aggregate) -> Aggregate {
        agg.rows = self
            .groups
            .into_iter()
            .map(|(keys, sum, n)| AggregateRow {
                keys,
                value: sum / n as f64,
            })
            .collect();
        agg
    }
}

// ---------------------------
// CT-e issuance log
// ---------------------------

const CTE_MEASURE: &str = "Quantidade de CTe";

fn cte_in_window<'e>(
    entries: &'e [CteEntry],
    range: &DateRange,
    shift: Option<&str>,
) -> impl Iterator<Item = &'e CteEntry> {
    let range = *range;
    let shift = shift.map(normalize_shift);
    entries.iter().filter(move |e| {
        range.contains(e.date) && shift.as_ref().is_none_or(|s| &e.shift == s)
    })
}

/// CT-e typed per responsible from the issuance log, for the given window
/// and shift (`None` = all shifts), sorted descending.
pub fn cte_by_responsible(
    entries: &[CteEntry],
    range: &DateRange,
    shift: Option<&str>,
) -> Aggregate {
    let mut g = Grouper::default();
    for e in cte_in_window(entries, range, shift) {
        let who = e.responsible.trim();
        if !who.is_empty() {
            g.add(vec![who.to_string()], e.quantity as f64);
        }
    }
    g.into_sums(Aggregate::new(vec!["Responsável".to_string()], CTE_MEASURE))
        .sorted_desc()
}

/// CT-e typed per day, busiest first; ties keep calendar order.
pub fn cte_by_day(entries: &[CteEntry], range: &DateRange, shift: Option<&str>) -> Aggregate {
    let mut days: Vec<&CteEntry> = cte_in_window(entries, range, shift).collect();
    days.sort_by_key(|e| e.date);

    let mut g = Grouper::default();
    for e in days {
        g.add(vec![format_br(e.date)], e.quantity as f64);
    }
    g.into_sums(Aggregate::new(vec!["Data".to_string()], CTE_MEASURE))
        .sorted_desc()
}

/// Total CT-e typed in the window.
pub fn cte_total(entries: &[CteEntry], range: &DateRange, shift: Option<&str>) -> u64 {
    cte_in_window(entries, range, shift)
        .map(|e| u64::from(e.quantity))
        .sum()
}

// ---------------------------
// Occurrences
// ---------------------------

/// Occurrence selection. Blank criteria select everything.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceFilter {
    pub range: Option<DateRange>,
    pub shift: Option<String>,
    pub error_type: Option<String>,
}

impl OccurrenceFilter {
    pub fn matches(&self, o: &OccurrenceRecord) -> bool {
        if let Some(range) = &self.range
            && !range.contains(o.date)
        {
            return false;
        }
        if let Some(s) = &self.shift
            && normalize_shift(&o.shift) != normalize_shift(s)
        {
            return false;
        }
        if let Some(t) = &self.error_type
            && !o.error_type.trim().eq_ignore_ascii_case(t.trim())
        {
            return false;
        }
        true
    }
}

/// Counts over the filtered occurrence log.
pub struct OccurrenceStats<'a> {
    rows: Vec<&'a OccurrenceRecord>,
}

impl<'a> OccurrenceStats<'a> {
    pub fn new(records: &'a [OccurrenceRecord], filter: &OccurrenceFilter) -> Self {
        let rows = records.iter().filter(|o| filter.matches(o)).collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn resolved(&self) -> usize {
        self.rows.iter().filter(|o| o.is_resolved()).count()
    }

    /// Number of distinct non-blank clients affected.
    pub fn clients(&self) -> usize {
        let mut clients: Vec<&str> = self
            .rows
            .iter()
            .map(|o| o.client.trim())
            .filter(|c| !c.is_empty())
            .collect();
        clients.sort_unstable();
        clients.dedup();
        clients.len()
    }

    fn count_by(&self, dimension: &str, key: impl Fn(&OccurrenceRecord) -> String) -> Aggregate {
        let mut g = Grouper::default();
        for o in &self.rows {
            let k = key(*o);
            if !k.is_empty() {
                g.add(vec![k], 1.0);
            }
        }
        g.into_sums(Aggregate::new(vec![dimension.to_string()], "Ocorrências"))
    }

    /// Occurrences per error type, most frequent first.
    pub fn by_error_type(&self) -> Aggregate {
        self.count_by("Tipo de Erro", |o| o.error_type.trim().to_string())
            .sorted_desc()
    }

    /// Occurrences per shift, in first-seen order.
    pub fn by_shift(&self) -> Aggregate {
        self.count_by("Turno", |o| normalize_shift(&o.shift))
    }

    /// Occurrences per day, in calendar order.
    pub fn per_day(&self) -> Aggregate {
        let mut dated = self.rows.clone();
        dated.sort_by_key(|o| o.date);
        Self { rows: dated }.count_by("Data", |o| format_br(o.date))
    }
}

// ---------------------------
// Aggregator
// ---------------------------

pub struct Aggregator<'a> {
    set: &'a OperationSet,
    rows: Vec<&'a OperationRecord>,
}

impl<'a> Aggregator<'a> {
    pub fn new(set: &'a OperationSet, filter: &Filter) -> Self {
        let rows = set.records.iter().filter(|r| filter.matches(r)).collect();
        Self { set, rows }
    }

    pub fn schema(&self) -> &'a Schema {
        &self.set.schema
    }

    pub fn rows(&self) -> &[&'a OperationRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn dimension(&self, field: Field) -> AppResult<Field> {
        let f = field.expect_dimension()?;
        self.set.schema.require(f)?;
        Ok(f)
    }

    fn numeric(&self, field: Field) -> AppResult<Field> {
        let f = field.expect_numeric()?;
        self.set.schema.require(f)?;
        Ok(f)
    }

    fn keys_of(r: &OperationRecord, groups: &[Field]) -> Option<Vec<String>> {
        groups.iter().map(|g| r.dimension(*g)).collect()
    }

    /// Rows per operation type, in first-encountered order.
    pub fn count_by_type(&self) -> Aggregate {
        let mut g = Grouper::default();
        for r in &self.rows {
            g.add(vec![r.kind.label().to_string()], 1.0);
        }
        g.into_sums(Aggregate::new(vec![Field::Kind.column().to_string()], "Registros"))
    }

    /// Rows of one type (0 when absent).
    pub fn count_of(&self, kind: &OperationKind) -> usize {
        self.rows.iter().filter(|r| &r.kind == kind).count()
    }

    pub fn count_by_dimension(&self, group: Field) -> AppResult<Aggregate> {
        let group = self.dimension(group)?;
        let mut g = Grouper::default();
        for r in &self.rows {
            if let Some(k) = r.dimension(group) {
                g.add(vec![k], 1.0);
            }
        }
        Ok(g.into_sums(Aggregate::new(vec![group.column().to_string()], "Registros")))
    }

    pub fn sum_by_dimension(&self, value: Field, group: Field) -> AppResult<Aggregate> {
        self.sum_by_dimensions(value, &[group])
    }

    /// Sum of `value` per composite key. Rows with an undefined value or a
    /// blank key are left out.
    pub fn sum_by_dimensions(&self, value: Field, groups: &[Field]) -> AppResult<Aggregate> {
        if groups.is_empty() {
            return Err(AppError::config("at least one grouping field is required"));
        }
        let value = self.numeric(value)?;
        let groups = groups
            .iter()
            .map(|g| self.dimension(*g))
            .collect::<AppResult<Vec<_>>>()?;

        let mut g = Grouper::default();
        for r in &self.rows {
            if let (Some(keys), Some(v)) = (Self::keys_of(r, &groups), r.numeric(value)) {
                g.add(keys, v);
            }
        }

        let dims = groups.iter().map(|f| f.column().to_string()).collect();
        Ok(g.into_sums(Aggregate::new(dims, value.column())))
    }

    /// Mean duration (minutes) per group, over rows with a defined duration.
    pub fn mean_duration(&self, group: Field) -> AppResult<Aggregate> {
        let group = self.dimension(group)?;
        let value = self.numeric(Field::Duration)?;

        let mut g = Grouper::default();
        for r in &self.rows {
            if let (Some(k), Some(v)) = (r.dimension(group), r.numeric(value)) {
                g.add(vec![k], v);
            }
        }
        Ok(g.into_means(Aggregate::new(
            vec![group.column().to_string()],
            "Tempo médio (min)",
        )))
    }

    /// Fraction of filtered rows where the flag holds; 0 for no rows.
    pub fn percentage_true(&self, flag: Field) -> AppResult<f64> {
        let flag = flag.expect_flag()?;
        self.set.schema.require(flag)?;

        if self.rows.is_empty() {
            return Ok(0.0);
        }
        let hits = self.rows.iter().filter(|r| r.flag(flag)).count();
        Ok(hits as f64 / self.rows.len() as f64)
    }

    /// The `n` groups with the largest summed value, descending.
    pub fn top_n(&self, group: Field, value: Field, n: usize) -> AppResult<Aggregate> {
        Ok(self.sum_by_dimension(value, group)?.sorted_desc().truncated(n))
    }

    /// Total duration per (destination, plate), descending, leaving out the
    /// home base (compared case-insensitively).
    pub fn closed_trips(&self, home_base: &str) -> AppResult<Aggregate> {
        let home = home_base.trim().to_lowercase();
        let mut trips = self
            .sum_by_dimensions(Field::Duration, &[Field::Destination, Field::Plate])?
            .sorted_desc();
        trips
            .rows
            .retain(|r| r.keys.first().is_none_or(|d| d.trim().to_lowercase() != home));
        Ok(trips)
    }

    /// Distinct non-blank values, sorted alphabetically.
    pub fn distinct(&self, group: Field) -> AppResult<Vec<String>> {
        let group = self.dimension(group)?;
        let mut out: Vec<String> = Vec::new();
        for r in &self.rows {
            if let Some(k) = r.dimension(group)
                && !out.contains(&k)
            {
                out.push(k);
            }
        }
        out.sort();
        Ok(out)
    }
}
