//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Fraction in [0, 1] rendered as a percentage with one decimal, e.g. `42.5%`.
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Aggregate values are either counts, sums of CT-e or minute totals:
/// print integers without decimals and everything else with two.
pub fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Hours with one decimal, e.g. `6.5h`.
pub fn hours(value: f64) -> String {
    format!("{:.1}h", value)
}
