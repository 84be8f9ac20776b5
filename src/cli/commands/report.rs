use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{Core, ReportOptions};
use crate::errors::{AppError, AppResult};
use crate::mail::{Envelope, SmtpRelay, dispatch};
use crate::ui::messages::{info, sent, success, warning};
use crate::utils::range::resolve_range;
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        range,
        shift,
        collaborator,
        notes,
        to,
        html,
        dry_run,
    } = cmd
    {
        let opts = ReportOptions {
            range: resolve_range(range.as_deref())?,
            collaborator: collaborator.clone(),
            shift: shift.clone(),
            notes: notes.clone(),
        };

        let core = Core::new(cfg)?;
        let report = core.build_report(&opts)?;
        info(format!(
            "Report composed for {} ({} inline image(s))",
            opts.range.label(),
            report.images.len()
        ));

        if let Some(path) = html {
            fs::write(path, &report.html)?;
            success(format!("HTML written to {}", path.display()));
        }

        if *dry_run {
            warning("Dry run: nothing was sent.");
            return Ok(());
        }

        let recipients = if to.is_empty() {
            cfg.mail.recipients.clone()
        } else {
            to.clone()
        };
        if cfg.mail.sender.trim().is_empty() {
            return Err(AppError::config("mail.sender is not set"));
        }

        let envelope = Envelope::new(&cfg.mail.sender, recipients);
        let relay = SmtpRelay::new(
            &cfg.mail.relay,
            cfg.mail.port,
            cfg.mail.login(),
            &cfg.mail.password()?,
        );

        dispatch(&report, &envelope, &relay)?;
        sent(&report.subject, &envelope.recipients);
    }
    Ok(())
}
