use chrono::NaiveDate;
use serde::Serialize;

/// Incident logged against a shift ("ocorrência").
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OccurrenceRecord {
    pub date: NaiveDate,
    pub shift: String,
    pub plate: String,
    pub sector: String,
    pub description: String,
    pub error_type: String,
    pub status: String,
    pub client: String,
    /// Last column of the sheet; usually a link to the evidence upload.
    pub evidence: String,
}

impl OccurrenceRecord {
    pub fn evidence_link(&self) -> Option<&str> {
        let e = self.evidence.trim();
        if e.starts_with("http") { Some(e) } else { None }
    }

    pub fn is_resolved(&self) -> bool {
        self.status.to_lowercase().contains("resolvido")
    }
}
