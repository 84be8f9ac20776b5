//! Report composer: aggregates → HTML document with inline charts.
//!
//! Every section is always emitted. When its data is empty the section
//! body is a placeholder sentence; only configuration errors abort.

use super::chart::ChartRenderer;
use super::html::{self, Cell};
use super::slots::ChartSlot;
use super::{PNG, Report, ReportBuilder};
use crate::core::aggregate::{Aggregate, Aggregator, Filter, cte_by_responsible};
use crate::core::calculator::idle::idle_report;
use crate::core::normalize::occurrences_on;
use crate::errors::AppResult;
use crate::models::{CteEntry, Field, OccurrenceRecord, OperationKind, OperationSet};
use crate::utils::date::format_br;
use crate::utils::formatting::{hours, number, percent};
use crate::utils::range::DateRange;
use crate::utils::time::format_hours_minutes;
use chrono::NaiveDate;
use log::{debug, error};

pub const NO_DATA: &str = "Nenhum dado disponível para gerar o relatório no período selecionado.";
pub const NO_CTE: &str = "Nenhum CT-e registrado para o turno selecionado na data selecionada.";
pub const NO_TRIPS: &str = "Nenhuma viagem fechada no período selecionado.";
pub const NO_IDLE: &str = "Sem durações registradas para calcular a ociosidade.";
pub const NO_CHARTS: &str = "Nenhum gráfico foi gerado por falta de dados.";
pub const NO_OCCURRENCES: &str = "Nenhuma ocorrência registrada para a data selecionada.";
pub const NO_NOTES: &str = "Nenhuma observação informada.";
pub const CHART_FAILED: &str = "Não foi possível gerar este gráfico.";

pub const ALL_SHIFTS: &str = "Todos os turnos";

/// Static part of the report, taken from the configuration.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub title: String,
    pub subject: String,
    /// Destination excluded from the trip-closing table (the depot itself).
    pub home_base: String,
    pub expected_hours: f64,
    pub charts: Vec<ChartSlot>,
}

/// Per-invocation inputs.
pub struct ReportContext<'a> {
    pub operations: &'a OperationSet,
    pub range: DateRange,
    pub collaborator: Option<String>,
    pub cte_log: &'a [CteEntry],
    pub occurrences: &'a [OccurrenceRecord],
    /// `None` means all shifts.
    pub shift: Option<String>,
    pub notes: Option<String>,
    pub report_date: NaiveDate,
    pub signature: Option<Vec<u8>>,
}

impl ReportContext<'_> {
    pub fn filter(&self) -> Filter {
        Filter {
            range: Some(self.range),
            collaborator: self.collaborator.clone(),
            ..Default::default()
        }
    }
}

pub fn compose(
    ctx: &ReportContext<'_>,
    settings: &ReportSettings,
    renderer: &ChartRenderer,
) -> AppResult<Report> {
    let filter = ctx.filter();
    let agg = Aggregator::new(ctx.operations, &filter);
    debug!("composing report over {} rows", agg.len());

    let mut builder = ReportBuilder::new(&settings.title);
    header(&mut builder, ctx);

    builder.section("Resumo das operações", indicators(&agg)?);
    builder.section("Quantidade de CT-e digitados", cte_section(ctx));
    builder.section("🚚 Viagens fechadas", trips_section(&agg, &settings.home_base)?);
    builder.section("⏱️ Ociosidade", idle_section(&agg, settings.expected_hours)?);

    let charts = charts_section(&mut builder, ctx, &filter, &settings.charts, renderer)?;
    builder.section("📈 Gráficos", charts);

    builder.section("⚠️ Ocorrências", occurrences_section(ctx));
    builder.section("📌 Observações", notes_section(ctx.notes.as_deref()));

    let closing = closing_section(&mut builder, ctx.signature.clone());
    builder.closing(closing);

    Ok(builder.build(&settings.subject))
}

// ---------------------------
// Sections
// ---------------------------

fn header(builder: &mut ReportBuilder, ctx: &ReportContext<'_>) {
    builder.header_line(format!(
        "<p><b>Período:</b> {} &nbsp; <b>Turno:</b> {} &nbsp; <b>Colaborador:</b> {}</p>\n",
        html::escape(&ctx.range.label()),
        html::escape(ctx.shift.as_deref().unwrap_or(ALL_SHIFTS)),
        html::escape(ctx.collaborator.as_deref().unwrap_or("Todos")),
    ));
}

fn indicators(agg: &Aggregator<'_>) -> AppResult<String> {
    if agg.is_empty() {
        return Ok(html::placeholder(NO_DATA));
    }

    let collaborators = agg.distinct(Field::Collaborator)?;
    let mut items = vec![format!("<li><b>Total de registros:</b> {}</li>", agg.len())];

    for kind in OperationKind::known() {
        items.push(format!(
            "<li><b>{}:</b> {}</li>",
            html::escape(kind.plural()),
            agg.count_of(&kind)
        ));
    }

    items.push(format!(
        "<li><b>Colaboradores ativos ({}):</b> {}</li>",
        collaborators.len(),
        html::escape(&collaborators.join(", "))
    ));

    // Optional columns: shown only when the sheet carries them.
    let schema = agg.schema();
    if schema.contains(Field::CteQuantity) {
        let closed = agg
            .rows()
            .iter()
            .filter(|r| r.kind.is_closeout())
            .map(|r| r.cte_quantity as u64)
            .sum::<u64>();
        items.push(format!("<li><b>CT-e baixados:</b> {closed}</li>"));
    }
    for (field, label) in [
        (Field::CteIssued, "CT-e emitido"),
        (Field::NfReceipt, "Recepção de NFs"),
        (Field::Toll, "Com pedágio"),
    ] {
        if schema.contains(field) {
            items.push(format!(
                "<li><b>{}:</b> {}</li>",
                html::escape(label),
                percent(agg.percentage_true(field)?)
            ));
        }
    }

    Ok(format!("<ul>\n{}\n</ul>\n", items.join("\n")))
}

fn cte_section(ctx: &ReportContext<'_>) -> String {
    let data = cte_by_responsible(ctx.cte_log, &ctx.range, ctx.shift.as_deref());
    if data.is_empty() {
        return html::placeholder(NO_CTE);
    }
    aggregate_table(&data, number)
}

fn trips_section(agg: &Aggregator<'_>, home_base: &str) -> AppResult<String> {
    let trips = agg.closed_trips(home_base)?.map_values("Tempo total", |v| v);
    if trips.is_empty() {
        return Ok(html::placeholder(NO_TRIPS));
    }
    Ok(aggregate_table(&trips, format_hours_minutes))
}

fn idle_section(agg: &Aggregator<'_>, expected_hours: f64) -> AppResult<String> {
    let rows = idle_report(agg, expected_hours)?;
    if rows.is_empty() {
        return Ok(html::placeholder(NO_IDLE));
    }

    let body: Vec<Vec<Cell>> = rows
        .iter()
        .map(|r| {
            vec![
                r.collaborator.as_str().into(),
                r.date.as_str().into(),
                hours(r.worked_hours).into(),
                hours(r.idle_hours).into(),
                format!("{:.1}%", r.idle_pct).into(),
            ]
        })
        .collect();

    Ok(html::table(
        &["Colaborador", "Data", "Trabalhado", "Ocioso", "Ociosidade"],
        &body,
    ))
}

fn charts_section(
    builder: &mut ReportBuilder,
    ctx: &ReportContext<'_>,
    filter: &Filter,
    slots: &[ChartSlot],
    renderer: &ChartRenderer,
) -> AppResult<String> {
    if slots.is_empty() {
        return Ok(html::placeholder(NO_CHARTS));
    }

    let mut out = String::new();
    for slot in slots {
        let data = slot.aggregate(ctx.operations, filter)?;
        let png = renderer.render(
            &slot.title,
            slot.style,
            &data,
            slot.value_label(),
            &slot.empty_caption,
        );

        match png {
            Ok(bytes) => {
                let cid = builder.attach("grafico", PNG, bytes);
                out.push_str(&html::image(&cid, &slot.title, 600));
            }
            Err(e) => {
                error!("chart '{}' failed: {e}", slot.title);
                out.push_str(&html::placeholder(CHART_FAILED));
            }
        }
    }
    Ok(out)
}

fn occurrences_section(ctx: &ReportContext<'_>) -> String {
    let today = occurrences_on(ctx.occurrences, ctx.report_date);
    if today.is_empty() {
        return html::placeholder(NO_OCCURRENCES);
    }

    let rows: Vec<Vec<Cell>> = today
        .iter()
        .map(|o| {
            let evidence = match o.evidence_link() {
                Some(url) => Cell::Html(html::link(url, "Abrir Anexo 📎")),
                None => Cell::Text(o.evidence.clone()),
            };
            vec![
                format_br(o.date).into(),
                o.plate.as_str().into(),
                o.sector.as_str().into(),
                o.description.as_str().into(),
                evidence,
            ]
        })
        .collect();

    html::table(
        &[
            "Data da ocorrência",
            "Placa do veículo",
            "Setor responsável",
            "Descritivo do ocorrido",
            "Evidências",
        ],
        &rows,
    )
}

fn notes_section(notes: Option<&str>) -> String {
    match notes.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => html::paragraph(n),
        None => html::placeholder(NO_NOTES),
    }
}

fn closing_section(builder: &mut ReportBuilder, signature: Option<Vec<u8>>) -> String {
    let mut out = String::from("<br>\n<p>Atenciosamente,</p>\n<br>\n");
    if let Some(bytes) = signature {
        let cid = builder.attach("assinatura", PNG, bytes);
        out.push_str(&html::image(&cid, "Assinatura", 620));
    }
    out
}

/// Keys as columns plus the formatted value.
fn aggregate_table(data: &Aggregate, fmt: impl Fn(f64) -> String) -> String {
    let mut headers: Vec<&str> = data.dimensions.iter().map(String::as_str).collect();
    headers.push(&data.measure);

    let rows: Vec<Vec<Cell>> = data
        .rows
        .iter()
        .map(|r| {
            let mut cells: Vec<Cell> = r.keys.iter().map(|k| k.as_str().into()).collect();
            cells.push(fmt(r.value).into());
            cells
        })
        .collect();

    html::table(&headers, &rows)
}
