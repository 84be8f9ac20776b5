use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{Core, ReportOptions};
use crate::errors::AppResult;
use crate::export::{ExportLogic, ReportHeading};
use crate::utils::date::today;
use crate::utils::range::resolve_range;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        shift,
        force,
    } = cmd
    {
        let mut opts = ReportOptions::for_range(resolve_range(range.as_deref())?);
        opts.shift = shift.clone();

        let core = Core::new(cfg)?;
        let tables = core.export_tables(&opts)?;
        let heading = ReportHeading {
            title: cfg.title.clone(),
            period: opts.range.label(),
            shift: opts.shift.clone(),
            generated_on: today(),
        };

        ExportLogic::export(&tables, format, file, &heading, *force)?;
    }
    Ok(())
}
