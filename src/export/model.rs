// src/export/model.rs

use crate::core::aggregate::Aggregate;
use crate::report::compose::ALL_SHIFTS;
use crate::utils::date::format_br;
use chrono::NaiveDate;
use serde::Serialize;

/// What the exported document covers; heads the PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportHeading {
    pub title: String,
    pub period: String,
    pub shift: Option<String>,
    pub generated_on: NaiveDate,
}

impl ReportHeading {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Período: {}", self.period),
            format!("Turno: {}", self.shift.as_deref().unwrap_or(ALL_SHIFTS)),
            format!("Gerado em {}", format_br(self.generated_on)),
        ]
    }
}

/// One named table of the report, already formatted as text.
/// The first `keys` columns identify the row; the rest are measures.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub keys: usize,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn new(title: &str, headers: &[&str], keys: usize) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            keys,
            rows: Vec::new(),
        }
    }

    /// Keys become columns, the value goes last through `fmt`.
    pub fn from_aggregate(title: &str, data: &Aggregate, fmt: impl Fn(f64) -> String) -> Self {
        let mut headers = data.dimensions.clone();
        headers.push(data.measure.clone());

        let rows = data
            .rows
            .iter()
            .map(|r| {
                let mut row = r.keys.clone();
                row.push(fmt(r.value));
                row
            })
            .collect();

        Self {
            title: title.to_string(),
            keys: data.dimensions.len(),
            headers,
            rows,
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Flat row for CSV / JSON exports.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MetricExport {
    pub table: String,
    pub group: String,
    pub measure: String,
    pub value: String,
}

/// Long format: one record per measure cell, `group` being the key cells
/// joined with " / ".
pub fn flatten(tables: &[ExportTable]) -> Vec<MetricExport> {
    let mut out = Vec::new();
    for t in tables {
        let keys = t.keys.min(t.headers.len());
        for row in &t.rows {
            let group = row[..keys.min(row.len())].join(" / ");
            for (i, measure) in t.headers.iter().enumerate().skip(keys) {
                out.push(MetricExport {
                    table: t.title.clone(),
                    group: group.clone(),
                    measure: measure.clone(),
                    value: row.get(i).cloned().unwrap_or_default(),
                });
            }
        }
    }
    out
}
