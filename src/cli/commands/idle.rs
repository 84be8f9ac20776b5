use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::Core;
use crate::core::aggregate::{Aggregator, Filter};
use crate::core::calculator::idle::idle_report;
use crate::errors::AppResult;
use crate::ui::messages::{header, warning};
use crate::utils::colors::{RESET, color_for_idle};
use crate::utils::formatting::hours;
use crate::utils::range::resolve_range;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Idle {
        range,
        collaborator,
    } = cmd
    {
        let range = resolve_range(range.as_deref())?;
        let core = Core::new(cfg)?;
        let operations = core.operations()?;

        let filter = Filter {
            range: Some(range),
            collaborator: collaborator.clone(),
            ..Default::default()
        };
        let agg = Aggregator::new(&operations, &filter);
        let rows = idle_report(&agg, cfg.expected_work_hours)?;

        header(format!(
            "Ociosidade {} (jornada de {})",
            range.label(),
            hours(cfg.expected_work_hours)
        ));

        if rows.is_empty() {
            warning("No durations recorded in the selected period.");
            return Ok(());
        }

        let mut table =
            Table::with_headers(&["Colaborador", "Data", "Trabalhado", "Ocioso", "Ociosidade"]);
        for r in &rows {
            table.add_row(vec![
                r.collaborator.clone(),
                r.date.clone(),
                hours(r.worked_hours),
                hours(r.idle_hours),
                // last column: escapes do not upset the alignment
                format!("{}{:.1}%{}", color_for_idle(r.idle_pct), r.idle_pct, RESET),
            ]);
        }
        print!("{}", table.render());
    }
    Ok(())
}
