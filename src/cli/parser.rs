use crate::core::freight::VehicleClass;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for rFechamento
/// Daily logistics closing report: summaries, idle time, charts and e-mail
#[derive(Parser)]
#[command(
    name = "rfechamento",
    version = env!("CARGO_PKG_VERSION"),
    about = "Daily logistics closing report: operation summaries, idle time, charts and e-mail delivery",
    long_about = None
)]
pub struct Cli {
    /// Use this configuration file instead of ~/.rfechamento/rfechamento.conf
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Print the indicators of the selected period
    Summary {
        /// Date range.
        ///
        /// Supported formats:
        /// - today                 → current day (default)
        /// - YYYY                  → entire year (e.g. "2025")
        /// - YYYY-MM               → entire month (e.g. "2025-06")
        /// - YYYY-MM-DD            → specific day (e.g. "2025-06-18")
        ///
        /// Ranges (start:end) in the same format:
        /// - YYYY-MM:YYYY-MM       → month range (e.g. "2025-06:2025-08")
        /// - YYYY-MM-DD:YYYY-MM-DD → day range (e.g. "2025-06-01:2025-06-10")
        #[arg(long, short, value_name = "RANGE")]
        range: Option<String>,

        #[arg(long, help = "Only rows of this collaborator")]
        collaborator: Option<String>,

        #[arg(
            long = "type",
            value_name = "TYPE",
            help = "Only rows of this operation type (Lançamento, Baixa, Abastecimento)"
        )]
        kind: Option<String>,

        #[arg(long, help = "Only rows of this shift (e.g. 1º Turno)")]
        shift: Option<String>,

        #[arg(
            long = "error-type",
            value_name = "TYPE",
            help = "Only occurrences of this error type"
        )]
        error_type: Option<String>,

        #[arg(long, default_value_t = 5, help = "How many collaborators to rank")]
        top: usize,
    },

    /// Print worked and idle hours per collaborator per day
    Idle {
        #[arg(long, short, value_name = "RANGE", help = "Date range (default: today)")]
        range: Option<String>,

        #[arg(long, help = "Only rows of this collaborator")]
        collaborator: Option<String>,
    },

    /// Compose the daily report and send it by e-mail
    Report {
        #[arg(long, short, value_name = "RANGE", help = "Date range (default: today)")]
        range: Option<String>,

        #[arg(long, help = "Shift for the CT-e table (default: all shifts)")]
        shift: Option<String>,

        #[arg(long, help = "Only rows of this collaborator")]
        collaborator: Option<String>,

        #[arg(long, help = "Free text for the notes section")]
        notes: Option<String>,

        #[arg(
            long = "to",
            value_name = "ADDR",
            help = "Recipient (repeatable); overrides the configured list"
        )]
        to: Vec<String>,

        #[arg(long, value_name = "FILE", help = "Also write the HTML document to FILE")]
        html: Option<PathBuf>,

        #[arg(long = "dry-run", help = "Compose only, do not send")]
        dry_run: bool,
    },

    /// Export the report tables in various formats
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (absolute path required)
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_name = "RANGE", help = "Date range (default: today)")]
        range: Option<String>,

        #[arg(long, help = "Shift for the CT-e table (default: all shifts)")]
        shift: Option<String>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Minimum freight for a trip, plus tolls when a route is given
    Freight {
        #[arg(long, value_enum)]
        vehicle: VehicleClass,

        /// Trip distance in km (defaults to the route length)
        #[arg(long, required_unless_present = "route")]
        km: Option<f64>,

        /// CSV with `lat,lon` route points
        #[arg(long, value_name = "FILE")]
        route: Option<String>,

        /// Toll plaza table (defaults to sources.toll_plazas)
        #[arg(long, value_name = "FILE", requires = "route")]
        plazas: Option<String>,
    },
}
