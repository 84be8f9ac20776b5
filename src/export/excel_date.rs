// src/export/excel_date.rs

use chrono::NaiveDate;

/// Report dates are `dd/mm/yyyy`; returns the Excel serial and the cell
/// number format for such a string.
pub(crate) fn parse_to_excel_date(s: &str) -> Option<(&'static str, f64)> {
    let d = NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()?;
    Some(("dd/mm/yyyy", excel_serial(d)?))
}

fn excel_serial(d: NaiveDate) -> Option<f64> {
    let excel_epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    Some((d - excel_epoch).num_days() as f64)
}
