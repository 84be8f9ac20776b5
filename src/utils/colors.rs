/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";

/// Idle percentage color:
/// 0 → green
/// up to 30% → yellow
/// above → red
pub fn color_for_idle(idle_pct: f64) -> &'static str {
    if idle_pct <= 0.0 {
        GREEN
    } else if idle_pct <= 30.0 {
        YELLOW
    } else {
        RED
    }
}

