use super::{
    field::{Field, Schema},
    operation_kind::OperationKind,
};
use chrono::NaiveDate;
use serde::Serialize;

/// One normalized row of the operations log.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OperationRecord {
    pub date: NaiveDate,
    pub plate: String,
    pub kind: OperationKind,
    pub destination: String,
    /// Minutes; `None` when the source value was missing or unparsable.
    pub duration_minutes: Option<f64>,
    pub collaborator: String,
    pub cte_issued: bool,
    pub nf_receipt: bool,
    pub toll: bool,
    pub cte_quantity: u32,
    pub shift: String,
}

impl OperationRecord {
    /// Minimal record, mostly useful to build fixtures.
    pub fn new(date: NaiveDate, kind: OperationKind, collaborator: &str) -> Self {
        Self {
            date,
            plate: String::new(),
            kind,
            destination: String::new(),
            duration_minutes: None,
            collaborator: collaborator.to_string(),
            cte_issued: false,
            nf_receipt: false,
            toll: false,
            cte_quantity: 0,
            shift: String::new(),
        }
    }

    /// Text value of a dimension field. Blank values count as missing
    /// and keep the row out of that grouping.
    pub fn dimension(&self, field: Field) -> Option<String> {
        let value = match field {
            Field::Date => return Some(self.date.format("%d/%m/%Y").to_string()),
            Field::Kind => return Some(self.kind.label().to_string()),
            Field::Plate => &self.plate,
            Field::Destination => &self.destination,
            Field::Collaborator => &self.collaborator,
            Field::Shift => &self.shift,
            _ => return None,
        };
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn numeric(&self, field: Field) -> Option<f64> {
        match field {
            Field::Duration => self.duration_minutes,
            Field::CteQuantity => Some(self.cte_quantity as f64),
            _ => None,
        }
    }

    pub fn flag(&self, field: Field) -> bool {
        match field {
            Field::CteIssued => self.cte_issued,
            Field::NfReceipt => self.nf_receipt,
            Field::Toll => self.toll,
            _ => false,
        }
    }
}

/// Normalized operations log together with the columns it was loaded from.
#[derive(Debug, Clone, Default)]
pub struct OperationSet {
    pub records: Vec<OperationRecord>,
    pub schema: Schema,
    /// Rows discarded because of an unusable date (or quantity, by policy).
    pub dropped: usize,
}

impl OperationSet {
    pub fn new(records: Vec<OperationRecord>, schema: Schema) -> Self {
        Self {
            records,
            schema,
            dropped: 0,
        }
    }

    /// In-memory set where every column counts as loaded.
    pub fn from_records(records: Vec<OperationRecord>) -> Self {
        Self::new(records, Schema::full())
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
