//! `--range` parsing shared by every reporting command.

use crate::errors::{AppError, AppResult};
use crate::utils::date::today;
use chrono::NaiveDate;

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// Human label for headers, e.g. `19/10/2026` or `01/10/2026 a 19/10/2026`.
    pub fn label(&self) -> String {
        if self.is_single_day() {
            self.start.format("%d/%m/%Y").to_string()
        } else {
            format!(
                "{} a {}",
                self.start.format("%d/%m/%Y"),
                self.end.format("%d/%m/%Y")
            )
        }
    }
}

fn invalid(msg: &str) -> AppError {
    AppError::InvalidRange(msg.to_string())
}

/// Parse `--range`; `None` means today.
///
/// Supports:
/// - today
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn resolve_range(range: Option<&str>) -> AppResult<DateRange> {
    match range {
        None => Ok(DateRange::single(today())),
        Some(r) => parse_range(r),
    }
}

pub fn parse_range(r: &str) -> AppResult<DateRange> {
    let r = r.trim();
    if r.eq_ignore_ascii_case("today") {
        return Ok(DateRange::single(today()));
    }

    let range = if let Some((start_raw, end_raw)) = r.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.len() != end.len() {
            return Err(invalid("start and end must have same format"));
        }

        let (d1, _) = period_bounds(start)?;
        let (_, d2) = period_bounds(end)?;
        DateRange::new(d1, d2)
    } else {
        let (d1, d2) = period_bounds(r)?;
        DateRange::new(d1, d2)
    };

    if range.start > range.end {
        return Err(invalid("range start is after range end"));
    }

    Ok(range)
}

/// First and last day of a `YYYY`, `YYYY-MM` or `YYYY-MM-DD` period.
fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if !p.is_ascii() {
        return Err(invalid("unsupported --range format"));
    }
    match p.len() {
        // YYYY
        4 => {
            let y: i32 = p.parse().map_err(|_| invalid("invalid year"))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid("invalid year"))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid("invalid year"))?;
            Ok((d1, d2))
        }
        // YYYY-MM
        7 => {
            let y: i32 = p[0..4].parse().map_err(|_| invalid("invalid year"))?;
            let m: u32 = p[5..7].parse().map_err(|_| invalid("invalid month"))?;
            let last = month_last_day(y, m).ok_or_else(|| invalid("invalid month"))?;

            let d1 = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| invalid("invalid month"))?;
            let d2 =
                NaiveDate::from_ymd_opt(y, m, last).ok_or_else(|| invalid("invalid month"))?;
            Ok((d1, d2))
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| invalid("invalid date"))?;
            Ok((d, d))
        }
        _ => Err(invalid("unsupported --range format")),
    }
}

fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => {
            let leap = (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0);
            Some(if leap { 29 } else { 28 })
        }
        _ => None,
    }
}
