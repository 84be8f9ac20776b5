//! Idle time: shortfall between expected and worked hours per
//! collaborator per day.

use crate::core::aggregate::{Aggregate, Aggregator};
use crate::errors::{AppError, AppResult};
use crate::models::Field;
use serde::Serialize;

pub const DEFAULT_EXPECTED_HOURS: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdleRow {
    pub collaborator: String,
    /// `dd/mm/yyyy`
    pub date: String,
    pub worked_hours: f64,
    pub idle_hours: f64,
    /// Rounded to one decimal.
    pub idle_pct: f64,
}

/// (worked hours, idle hours, idle %) for one collaborator-day.
/// Idle time is clamped at zero: overtime never yields negative idle.
pub fn idle_for(worked_minutes: f64, expected_hours: f64) -> (f64, f64, f64) {
    let worked = worked_minutes / 60.0;
    let idle = (expected_hours - worked).max(0.0);
    let pct = (idle / expected_hours * 100.0 * 10.0).round() / 10.0;
    (worked, idle, pct)
}

/// Turn a worked-minutes aggregate keyed by (collaborator, date) into idle rows.
pub fn calculate_idle(worked: &Aggregate, expected_hours: f64) -> AppResult<Vec<IdleRow>> {
    if !(expected_hours.is_finite() && expected_hours > 0.0) {
        return Err(AppError::config(format!(
            "expected_work_hours must be positive, got {expected_hours}"
        )));
    }

    Ok(worked
        .rows
        .iter()
        .filter(|r| r.keys.len() == 2)
        .map(|r| {
            let (worked_hours, idle_hours, idle_pct) = idle_for(r.value, expected_hours);
            IdleRow {
                collaborator: r.keys[0].clone(),
                date: r.keys[1].clone(),
                worked_hours,
                idle_hours,
                idle_pct,
            }
        })
        .collect())
}

/// Worked minutes per (collaborator, date) over the filtered rows,
/// followed by the idle transform.
pub fn idle_report(agg: &Aggregator<'_>, expected_hours: f64) -> AppResult<Vec<IdleRow>> {
    let worked = agg.sum_by_dimensions(Field::Duration, &[Field::Collaborator, Field::Date])?;
    calculate_idle(&worked, expected_hours)
}
