//! Unified application error type.
//! Every layer (source, core, report, mail, cli) returns AppError so the
//! CLI can surface configuration and transport failures the same way.
//!
//! Row-level parse failures and empty results never reach this type:
//! they are absorbed where they happen (dropped rows, placeholders).

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error while fetching '{location}': {message}")]
    Http { location: String, message: String },

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid vehicle class: {0}")]
    InvalidVehicle(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    /// A step referenced a field or column the loaded data does not carry,
    /// or a setting is unusable. Fatal for the current invocation.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Rendering / delivery
    // ---------------------------
    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("Mail transport error: {0}")]
    Transport(String),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Shorthand used by the aggregator and composer for schema mismatches.
    pub fn config<T: Into<String>>(msg: T) -> Self {
        AppError::Config(msg.into())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, AppError::Config(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
