use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn non_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\D+").expect("static regex"))
}

/// Parse a spreadsheet date cell.
///
/// Day-first dates with any separator (`19/10/2026`, `19-10-2026`,
/// `19.10.2026`) and ISO dates (`2026-10-19`) are accepted. A two-digit
/// year (`19/10/26`) is read as 20yy. A trailing time component
/// (`19/10/2026 08:15:00`) is ignored.
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    let first = raw.split_whitespace().next()?;
    let cleaned = non_digits().replace_all(first, "/");
    let parts: Vec<&str> = cleaned.split('/').filter(|p| !p.is_empty()).collect();

    match parts.as_slice() {
        [y, m, d] if y.len() == 4 => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
        }
        [d, m, y] if y.len() == 4 => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
        }
        [d, m, y] if y.len() == 2 && d.len() <= 2 => {
            let yy: i32 = y.parse().ok()?;
            NaiveDate::from_ymd_opt(2000 + yy, m.parse().ok()?, d.parse().ok()?)
        }
        _ => None,
    }
}

pub fn format_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
