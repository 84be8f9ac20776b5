//! Row normalizer: raw spreadsheet rows → typed records.
//!
//! Row-level problems never fail the load:
//! - unparsable or missing date → row dropped
//! - unparsable duration → `duration_minutes = None`
//! - unparsable CT-e quantity → 0 (or row dropped, per `QuantityPolicy`)
//!
//! Only a missing *required column* is an error.

use crate::errors::{AppError, AppResult};
use crate::models::cte_entry::normalize_shift;
use crate::models::{
    CteEntry, Field, GeoPoint, OccurrenceRecord, OperationKind, OperationRecord, OperationSet,
    Schema, TollPlaza,
};
use crate::source::table::{RawTable, cell};
use crate::utils::date::parse_sheet_date;
use crate::utils::time::parse_elapsed_minutes;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// Literal set accepted as `true` (compared trimmed, case-insensitive).
pub const TRUTHY: [&str; 4] = ["true", "1", "sim", "verdadeiro"];

/// What to do with a CT-e quantity cell that is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityPolicy {
    /// Count it as zero and keep the row (historical behavior).
    #[default]
    ZeroFill,
    /// Drop the row, the same way unparsable dates are handled.
    DropRow,
}

pub fn parse_truthy(raw: &str) -> bool {
    let v = raw.trim().to_lowercase();
    TRUTHY.contains(&v.as_str())
}

/// Non-negative CT-e count; decimals from the sheet ("12.0") are accepted.
pub fn parse_quantity(raw: &str) -> Option<u32> {
    let s = raw.trim().replace(',', ".");
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f <= u32::MAX as f64 {
        Some(f.round() as u32)
    } else {
        None
    }
}

// ---------------------------
// Operations log
// ---------------------------

/// Column positions of the operations log, resolved once per table.
#[derive(Debug, Clone, Default)]
pub struct OperationColumns {
    date: Option<usize>,
    plate: Option<usize>,
    kind: Option<usize>,
    destination: Option<usize>,
    duration: Option<usize>,
    collaborator: Option<usize>,
    cte_issued: Option<usize>,
    nf_receipt: Option<usize>,
    toll: Option<usize>,
    cte_quantity: Option<usize>,
    shift: Option<usize>,
}

impl OperationColumns {
    /// Locate every known column. Missing required columns are a
    /// configuration error; the others just shrink the schema.
    pub fn resolve(table: &RawTable) -> AppResult<(Self, Schema)> {
        for f in Field::REQUIRED {
            table.require(f.column())?;
        }

        let cols = Self {
            date: table.column(Field::Date.column()),
            plate: table.column(Field::Plate.column()),
            kind: table.column(Field::Kind.column()),
            destination: table.column(Field::Destination.column()),
            duration: table.column(Field::Duration.column()),
            collaborator: table.column(Field::Collaborator.column()),
            cte_issued: table.column(Field::CteIssued.column()),
            nf_receipt: table.column(Field::NfReceipt.column()),
            toll: table.column(Field::Toll.column()),
            cte_quantity: table.column(Field::CteQuantity.column()),
            shift: table.column(Field::Shift.column()),
        };

        let schema = Schema::new(
            Field::ALL
                .into_iter()
                .filter(|f| table.column(f.column()).is_some()),
        );

        Ok((cols, schema))
    }

    /// Normalize a single row. `None` means the row is excluded.
    pub fn normalize(&self, row: &[String], policy: QuantityPolicy) -> Option<OperationRecord> {
        let date = parse_sheet_date(cell(row, self.date))?;
        let kind = OperationKind::from_label(cell(row, self.kind));

        // Only closeouts carry a count; a blank cell elsewhere is not garbage.
        let qty_raw = cell(row, self.cte_quantity);
        let cte_quantity = match parse_quantity(qty_raw) {
            Some(q) => q,
            None if policy == QuantityPolicy::DropRow
                && self.cte_quantity.is_some()
                && (kind.is_closeout() || !qty_raw.trim().is_empty()) =>
            {
                return None;
            }
            None => 0,
        };

        Some(OperationRecord {
            date,
            plate: cell(row, self.plate).trim().to_uppercase(),
            kind,
            destination: cell(row, self.destination).trim().to_string(),
            duration_minutes: parse_elapsed_minutes(cell(row, self.duration)),
            collaborator: cell(row, self.collaborator).trim().to_string(),
            cte_issued: parse_truthy(cell(row, self.cte_issued)),
            nf_receipt: parse_truthy(cell(row, self.nf_receipt)),
            toll: parse_truthy(cell(row, self.toll)),
            cte_quantity,
            shift: normalize_shift(cell(row, self.shift)),
        })
    }
}

pub fn normalize_operations(table: &RawTable, policy: QuantityPolicy) -> AppResult<OperationSet> {
    let (cols, schema) = OperationColumns::resolve(table)?;

    let mut records = Vec::with_capacity(table.len());
    let mut dropped = 0;
    for row in &table.rows {
        match cols.normalize(row, policy) {
            Some(r) => records.push(r),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("operations: dropped {dropped} of {} rows", table.len());
    }

    let mut set = OperationSet::new(records, schema);
    set.dropped = dropped;
    Ok(set)
}

// ---------------------------
// CT-e issuance log
// ---------------------------

pub fn normalize_cte_log(table: &RawTable) -> AppResult<Vec<CteEntry>> {
    let date = table.require("Data")?;
    let responsible = table.require("Responsável")?;
    let quantity = table.require("Quantidade de CTe")?;
    let shift = table.column("Turno");

    let entries: Vec<CteEntry> = table
        .rows
        .iter()
        .filter_map(|row| {
            Some(CteEntry {
                date: parse_sheet_date(cell(row, Some(date)))?,
                shift: normalize_shift(cell(row, shift)),
                responsible: cell(row, Some(responsible)).trim().to_string(),
                quantity: parse_quantity(cell(row, Some(quantity))).unwrap_or(0),
            })
        })
        .collect();

    debug!("cte log: kept {} of {} rows", entries.len(), table.len());
    Ok(entries)
}

// ---------------------------
// Occurrence log
// ---------------------------

pub fn normalize_occurrences(table: &RawTable) -> AppResult<Vec<OccurrenceRecord>> {
    let date = table
        .column_any(&["Data da ocorrência", "Data"])
        .ok_or_else(|| AppError::config("occurrence log has no 'Data da ocorrência' column"))?;

    let shift = table.column("Turno");
    let plate = table.column_any(&["Placa do veículo", "Placa"]);
    let sector = table.column("Setor responsável");
    let description = table.column("Descritivo do ocorrido");
    let error_type = table.column("Tipo de Erro");
    let status = table.column("Status");
    let client = table.column("Cliente (CNPJ)");
    let evidence = table.last_column();

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            Some(OccurrenceRecord {
                date: parse_sheet_date(cell(row, Some(date)))?,
                shift: normalize_shift(cell(row, shift)),
                plate: cell(row, plate).trim().to_string(),
                sector: cell(row, sector).trim().to_string(),
                description: cell(row, description).trim().to_string(),
                error_type: cell(row, error_type).trim().to_string(),
                status: cell(row, status).trim().to_string(),
                client: cell(row, client).trim().to_string(),
                evidence: cell(row, evidence).trim().to_string(),
            })
        })
        .collect())
}

/// Occurrences logged on `day` (the report date).
pub fn occurrences_on(occurrences: &[OccurrenceRecord], day: NaiveDate) -> Vec<OccurrenceRecord> {
    occurrences
        .iter()
        .filter(|o| o.date == day)
        .cloned()
        .collect()
}

// ---------------------------
// Toll plazas and routes
// ---------------------------

fn parse_coord(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse::<f64>().ok()
}

pub fn normalize_toll_plazas(table: &RawTable) -> AppResult<Vec<TollPlaza>> {
    let name = table.require("praca")?;
    let lat = table.require("lat")?;
    let lon = table.require("lon")?;
    let highway = table.column("rodovia");
    let fee = table.column("valor_leve");

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            Some(TollPlaza {
                name: cell(row, Some(name)).trim().to_string(),
                highway: cell(row, highway).trim().to_string(),
                location: GeoPoint::new(
                    parse_coord(cell(row, Some(lat)))?,
                    parse_coord(cell(row, Some(lon)))?,
                ),
                light_fee: parse_coord(cell(row, fee)).unwrap_or(0.0),
            })
        })
        .collect())
}

pub fn normalize_route(table: &RawTable) -> AppResult<Vec<GeoPoint>> {
    let lat = table.require("lat")?;
    let lon = table.require("lon")?;

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            Some(GeoPoint::new(
                parse_coord(cell(row, Some(lat)))?,
                parse_coord(cell(row, Some(lon)))?,
            ))
        })
        .collect())
}
