use crate::cli::parser::Cli;
use crate::config::{Config, PASSWORD_ENV};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// Writes a default configuration (sources empty, default charts, Gmail
/// relay) at `--config` or `~/.rfechamento/rfechamento.conf`.
pub fn handle(cli: &Cli) -> AppResult<()> {
    println!("⚙️  Initializing rFechamento…");

    let path = Config::init_all(cli.config.as_deref())?;

    success(format!("Config file: {}", path.display()));
    info("Set sources.operations (and optionally cte_log, occurrences, toll_plazas).");
    info(format!(
        "The SMTP password is read from ${PASSWORD_ENV}, never from the file."
    ));
    Ok(())
}
