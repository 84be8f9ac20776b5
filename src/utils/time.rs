//! Time utilities: elapsed-time parsing and minute formatting.

/// Parse an elapsed-time cell into minutes.
///
/// Accepts `H:MM:SS`, `H:MM` (hours may exceed 24) or a plain number,
/// which is already a minute count. Returns `None` for anything else,
/// including negative values.
pub fn parse_elapsed_minutes(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if !s.contains(':') {
        let minutes = s.replace(',', ".").parse::<f64>().ok()?;
        return (minutes.is_finite() && minutes >= 0.0).then_some(minutes);
    }

    let parts: Vec<&str> = s.split(':').collect();
    let (h, m, sec) = match parts.as_slice() {
        [h, m] => (*h, *m, "0"),
        [h, m, sec] => (*h, *m, *sec),
        _ => return None,
    };

    let hours: u64 = h.trim().parse().ok()?;
    let minutes: u64 = m.trim().parse().ok()?;
    let seconds: f64 = sec.trim().parse().ok()?;

    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    Some(hours as f64 * 60.0 + minutes as f64 + seconds / 60.0)
}

/// `HHH:MMM` style used by the trip-closing table, e.g. `02H:05M`.
pub fn format_hours_minutes(total_minutes: f64) -> String {
    let total = total_minutes.max(0.0);
    let hours = (total / 60.0).floor() as i64;
    let minutes = (total % 60.0).floor() as i64;
    format!("{:02}H:{:02}M", hours, minutes)
}

/// Short label used on bar charts, e.g. `1h 45m`.
pub fn format_hours_label(total_minutes: f64) -> String {
    let hours_f = total_minutes.max(0.0) / 60.0;
    let hours = hours_f.floor() as i64;
    let minutes = ((hours_f % 1.0) * 60.0).floor() as i64;
    format!("{}h {}m", hours, minutes)
}
