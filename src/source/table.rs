use crate::errors::{AppError, AppResult};
use csv::{ReaderBuilder, Trim};

/// Untyped CSV table as exported by the spreadsheet.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn parse(text: &str) -> AppResult<Self> {
        let text = text.trim_start_matches('\u{feff}');
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(text.as_bytes());

        let headers = rdr.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            // Sheets exports keep trailing empty lines as rows of commas.
            if record.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Index of a column, matched case-insensitively on trimmed names.
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }

    /// First of the candidate names that is present.
    pub fn column_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|n| self.column(n))
    }

    pub fn require(&self, name: &str) -> AppResult<usize> {
        self.column(name).ok_or_else(|| {
            AppError::config(format!("expected column '{}' is missing from the source", name))
        })
    }

    pub fn last_column(&self) -> Option<usize> {
        self.headers.len().checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cell text for an optional column; short rows and absent columns read as "".
pub fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(|s| s.as_str()).unwrap_or("")
}
