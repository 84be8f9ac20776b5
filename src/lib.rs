//! rFechamento library root.
//! Exposes the CLI parser, the high-level run() function and the pipeline
//! modules (source → normalize → aggregate → report → mail).

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod mail;
pub mod models;
pub mod report;
pub mod source;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(cli, cfg),
        Commands::Summary { .. } => cli::commands::summary::handle(&cli.command, cfg),
        Commands::Idle { .. } => cli::commands::idle::handle(&cli.command, cfg),
        Commands::Report { .. } => cli::commands::report::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Freight { .. } => cli::commands::freight::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // `init` must work before any configuration exists.
    let cfg = match cli.command {
        Commands::Init => Config::default(),
        _ => Config::load(cli.config.as_deref())?,
    };

    dispatch(&cli, &cfg)
}
