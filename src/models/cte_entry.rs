use chrono::NaiveDate;
use serde::Serialize;

/// Row of the CT-e issuance log (CT-e typed per responsible and shift).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CteEntry {
    pub date: NaiveDate,
    pub shift: String,
    pub responsible: String,
    pub quantity: u32,
}

/// Shift labels are typed by hand: "1°" and "1º" are the same shift.
pub fn normalize_shift(raw: &str) -> String {
    raw.replace('°', "º").trim().to_string()
}
