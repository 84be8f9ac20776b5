use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::Core;
use crate::core::aggregate::{
    Aggregate, Aggregator, Filter, OccurrenceFilter, OccurrenceStats, cte_by_day,
    cte_by_responsible, cte_total,
};
use crate::errors::AppResult;
use crate::models::{CteEntry, Field, OperationKind};
use crate::ui::messages::{header, info, warning};
use crate::utils::formatting::{bold, number, percent};
use crate::utils::range::{DateRange, resolve_range};
use crate::utils::table::Table;

/// Rows shown in the CT-e rankings.
const CTE_RANKING: usize = 3;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary {
        range,
        collaborator,
        kind,
        shift,
        error_type,
        top,
    } = cmd
    {
        let range = resolve_range(range.as_deref())?;
        let core = Core::new(cfg)?;
        let operations = core.operations()?;

        let filter = Filter {
            range: Some(range),
            collaborator: collaborator.clone(),
            kind: kind.as_deref().map(OperationKind::from_label),
            shift: shift.clone(),
        };
        let agg = Aggregator::new(&operations, &filter);

        header(format!("Resumo {}", range.label()));

        if agg.is_empty() {
            warning("No operations in the selected period.");
        } else {
            print_indicators(&agg)?;
            print_types(&agg);
            print_top(&agg, *top)?;
        }

        print_cte_log(&core.cte_log()?, &range, shift.as_deref());

        let occurrences = core.occurrences()?;
        let stats = OccurrenceStats::new(
            &occurrences,
            &OccurrenceFilter {
                range: Some(range),
                shift: shift.clone(),
                error_type: error_type.clone(),
            },
        );
        print_occurrences(&stats);
    }
    Ok(())
}

fn print_indicators(agg: &Aggregator<'_>) -> AppResult<()> {
    let collaborators = agg.distinct(Field::Collaborator)?;

    println!("{} {}", bold("Total de registros:"), agg.len());
    for kind in OperationKind::known() {
        println!("{} {}", bold(&format!("{}:", kind.plural())), agg.count_of(&kind));
    }
    println!(
        "{} {}",
        bold("Colaboradores ativos:"),
        collaborators.len()
    );
    println!(
        "{}\n",
        textwrap::indent(&textwrap::fill(&collaborators.join(", "), 72), "  ")
    );

    let schema = agg.schema();
    for (field, label) in [
        (Field::CteIssued, "CT-e emitido:"),
        (Field::NfReceipt, "Recepção de NFs:"),
        (Field::Toll, "Com pedágio:"),
    ] {
        if schema.contains(field) {
            println!("{} {}", bold(label), percent(agg.percentage_true(field)?));
        }
    }
    println!();
    Ok(())
}

fn print_types(agg: &Aggregator<'_>) {
    let mut table = Table::with_headers(&["Tipo", "Registros"]);
    for row in agg.count_by_type().sorted_desc().rows {
        table.add_row(vec![row.label(), number(row.value)]);
    }
    print!("{}", table.render());
    println!();
}

/// Collaborators ranked by CT-e closed when that column is loaded,
/// otherwise by number of rows.
fn print_top(agg: &Aggregator<'_>, n: usize) -> AppResult<()> {
    let data = if agg.schema().contains(Field::CteQuantity) {
        agg.top_n(Field::Collaborator, Field::CteQuantity, n)?
    } else {
        agg.count_by_dimension(Field::Collaborator)?
            .sorted_desc()
            .truncated(n)
    };

    let mut table = Table::with_headers(&["#", "Colaborador", data.measure.as_str()]);
    for (i, row) in data.rows.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), row.label(), number(row.value)]);
    }
    print!("{}", table.render());
    println!();
    Ok(())
}

fn print_aggregate(data: &Aggregate) {
    let mut headers: Vec<&str> = data.dimensions.iter().map(String::as_str).collect();
    headers.push(data.measure.as_str());

    let mut table = Table::with_headers(&headers);
    for row in &data.rows {
        let mut cells = row.keys.clone();
        cells.push(number(row.value));
        table.add_row(cells);
    }
    print!("{}", table.render());
    println!();
}

/// Issuance log totals with the busiest days and responsibles.
fn print_cte_log(entries: &[CteEntry], range: &DateRange, shift: Option<&str>) {
    let total = cte_total(entries, range, shift);
    if total == 0 {
        return;
    }

    info(format!("CT-e emitidos: {total}"));
    println!();
    print_aggregate(&cte_by_day(entries, range, shift).truncated(CTE_RANKING));
    print_aggregate(&cte_by_responsible(entries, range, shift).truncated(CTE_RANKING));
}

fn print_occurrences(stats: &OccurrenceStats<'_>) {
    if stats.is_empty() {
        return;
    }

    info(format!(
        "Ocorrências: {} ({} resolvidas, {} clientes)",
        stats.len(),
        stats.resolved(),
        stats.clients()
    ));
    println!();
    print_aggregate(&stats.by_error_type());
    print_aggregate(&stats.by_shift());
    print_aggregate(&stats.per_day());
}
