//! User-facing terminal messages.
//!
//! Diagnostics go through `log`; these are the lines the operator is meant
//! to read (what was loaded, what was sent, what failed).

use ansi_term::{Colour, Style};
use std::fmt;

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";
const ICON_MAIL: &str = "📧";

fn icon(colour: Colour, icon: &str) -> String {
    colour.bold().paint(icon).to_string()
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", icon(Colour::Blue, ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", icon(Colour::Green, ICON_OK), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {}", icon(Colour::Yellow, ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", icon(Colour::Red, ICON_ERR), msg);
}

/// Delivery confirmation, one line per recipient list.
pub fn sent<T: fmt::Display>(subject: T, recipients: &[String]) {
    println!(
        "{} '{}' → {}",
        icon(Colour::Green, ICON_MAIL),
        subject,
        recipients.join(", ")
    );
}

/// Section header above a terminal table.
pub fn header<T: fmt::Display>(msg: T) {
    let line = format!("==================== {msg}");
    println!("{}\n", Style::new().bold().fg(Colour::Blue).paint(line));
}
