mod common;
use common::{OPERATIONS_CSV, day, record, set_of};
use rfechamento::core::aggregate::{Aggregate, Filter};
use rfechamento::core::normalize::{QuantityPolicy, normalize_operations};
use rfechamento::models::{OccurrenceRecord, OperationSet};
use rfechamento::report::compose::{
    ALL_SHIFTS, NO_CTE, NO_DATA, NO_NOTES, NO_OCCURRENCES, NO_TRIPS,
};
use rfechamento::report::{
    ChartMetric, ChartRenderer, ChartSlot, ChartStyle, ReportBuilder, ReportContext,
    ReportSettings, ValueLabel, compose, exploded_slices, html,
};
use rfechamento::source::RawTable;
use rfechamento::utils::range::DateRange;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn settings() -> ReportSettings {
    ReportSettings {
        title: "Relatório Diário".into(),
        subject: "📊 Fechamento".into(),
        home_base: "Itapecerica da Serra".into(),
        expected_hours: 7.0,
        charts: ChartSlot::defaults(),
    }
}

fn context<'a>(set: &'a OperationSet, occurrences: &'a [OccurrenceRecord]) -> ReportContext<'a> {
    ReportContext {
        operations: set,
        range: DateRange::single(day(2026, 10, 19)),
        collaborator: None,
        cte_log: &[],
        occurrences,
        shift: None,
        notes: None,
        report_date: day(2026, 10, 19),
        signature: None,
    }
}

fn fixture() -> OperationSet {
    let table = RawTable::parse(OPERATIONS_CSV).expect("parse csv");
    normalize_operations(&table, QuantityPolicy::ZeroFill).expect("normalize")
}

#[test]
fn test_empty_pie_renders_placeholder_png() {
    let set = set_of(vec![record("Lançamento", "Ana", Some(30.0), 0)]);
    let slot = &ChartSlot::defaults()[0];

    let data = slot
        .aggregate(&set, &Filter::default())
        .expect("aggregate");
    assert!(data.is_empty());

    let png = ChartRenderer::new()
        .render(
            &slot.title,
            slot.style,
            &data,
            slot.value_label(),
            &slot.empty_caption,
        )
        .expect("render");
    assert!(!png.is_empty());
    assert_eq!(png[..8], PNG_MAGIC);
}

#[test]
fn test_bar_and_pie_charts_are_png() {
    let mut data = Aggregate::new(vec!["Colaborador".into()], "QTD de CT-e");
    data.rows.push(rfechamento::core::aggregate::AggregateRow {
        keys: vec!["Ana".into()],
        value: 12.0,
    });
    data.rows.push(rfechamento::core::aggregate::AggregateRow {
        keys: vec!["Bruno".into()],
        value: 30.0,
    });

    let renderer = ChartRenderer::new();
    for style in [ChartStyle::Pie, ChartStyle::Bar] {
        let png = renderer
            .render("CT-e", style, &data, ValueLabel::Plain, "vazio")
            .expect("render");
        assert_eq!(png[..8], PNG_MAGIC);
    }
}

#[test]
fn test_value_labels() {
    assert_eq!(ValueLabel::Plain.format(12.0), "12");
    assert_eq!(ValueLabel::HoursMinutes.format(105.0), "1h 45m");
}

#[test]
fn test_slot_with_unknown_field_is_config_error() {
    let set = fixture();
    let slot = ChartSlot {
        title: "Por motorista".into(),
        style: ChartStyle::Bar,
        metric: ChartMetric::Count,
        group_by: "motorista".into(),
        value: None,
        only_type: None,
        top: None,
        empty_caption: "vazio".into(),
    };
    assert!(slot.aggregate(&set, &Filter::default()).unwrap_err().is_config());

    let sum_without_value = ChartSlot {
        metric: ChartMetric::Sum,
        group_by: "collaborator".into(),
        ..slot
    };
    assert!(
        sum_without_value
            .aggregate(&set, &Filter::default())
            .unwrap_err()
            .is_config()
    );
}

#[test]
fn test_compose_full_report() {
    let set = fixture();
    let mut ctx = context(&set, &[]);
    ctx.notes = Some("Linha 1\nLinha <2>".into());

    let report = compose(&ctx, &settings(), &ChartRenderer::new()).expect("compose");

    assert_eq!(report.subject, "📊 Fechamento");
    assert!(report.html.contains("Relatório Diário"));
    assert!(report.html.contains("19/10/2026"));
    assert!(report.html.contains(ALL_SHIFTS));
    assert!(report.html.contains("<b>Total de registros:</b> 8"));
    assert!(report.html.contains("<b>Baixas:</b> 3"));
    assert!(report.html.contains("<b>CT-e baixados:</b> 20"));
    assert!(report.html.contains("<b>CT-e emitido:</b> 37.5%"));

    // No CT-e log and no occurrences given
    assert!(report.html.contains(NO_CTE));
    assert!(report.html.contains(NO_OCCURRENCES));

    // Trips: home base left out
    assert!(report.html.contains("Campinas"));
    assert!(report.html.contains("02H:15M"));
    assert!(!report.html.contains("XYZ9K88"));

    assert!(report.html.contains("Linha 1<br>Linha &lt;2&gt;"));
    assert!(report.html.contains("Atenciosamente,"));

    // Two chart slots, every reference resolvable
    assert_eq!(report.images.len(), 2);
    let cids = report.referenced_cids();
    assert_eq!(cids.len(), 2);
    for cid in &cids {
        assert!(cid.starts_with("grafico-"));
        assert!(report.image(cid).is_some());
    }
}

#[test]
fn test_compose_without_rows_uses_placeholders() {
    let set = fixture();
    let mut ctx = context(&set, &[]);
    ctx.range = DateRange::single(day(2025, 1, 1));

    let report = compose(&ctx, &settings(), &ChartRenderer::new()).expect("compose");
    assert!(report.html.contains(NO_DATA));
    assert!(report.html.contains(NO_TRIPS));
    assert!(report.html.contains(NO_NOTES));
    // Charts fall back to captioned images
    assert!(!report.images.is_empty());
    for cid in report.referenced_cids() {
        assert!(report.image(&cid).is_some());
    }
}

#[test]
fn test_occurrences_of_report_day_only() {
    let set = fixture();
    let occurrence = OccurrenceRecord {
        date: day(2026, 10, 19),
        shift: "1º Turno".into(),
        plate: "ABC1D23".into(),
        sector: "Expedição".into(),
        description: "Volume avariado".into(),
        error_type: "Avaria".into(),
        status: "Pendente".into(),
        client: String::new(),
        evidence: "https://example.com/foto.jpg".into(),
    };
    let older = OccurrenceRecord {
        date: day(2026, 10, 18),
        description: "Ontem".into(),
        ..occurrence.clone()
    };
    let occurrences = vec![occurrence, older];

    let ctx = context(&set, &occurrences);
    let report = compose(&ctx, &settings(), &ChartRenderer::new()).expect("compose");

    assert!(report.html.contains("Volume avariado"));
    assert!(!report.html.contains("Ontem"));
    assert!(report.html.contains("href=\"https://example.com/foto.jpg\""));
    assert!(report.html.contains("Abrir Anexo"));
}

#[test]
fn test_signature_is_attached_once() {
    let set = fixture();
    let mut ctx = context(&set, &[]);
    ctx.signature = Some(vec![1, 2, 3, 4]);

    let report = compose(&ctx, &settings(), &ChartRenderer::new()).expect("compose");
    let signature: Vec<_> = report
        .referenced_cids()
        .into_iter()
        .filter(|c| c.starts_with("assinatura-"))
        .collect();
    assert_eq!(signature.len(), 1);
    assert_eq!(
        report.image(&signature[0]).expect("image").bytes,
        vec![1, 2, 3, 4]
    );
}

#[test]
fn test_missing_duration_column_fails_report() {
    let csv = "Data,Tipo,Colaborador\n19/10/2026,Baixa,Ana\n";
    let table = RawTable::parse(csv).expect("parse csv");
    let set = normalize_operations(&table, QuantityPolicy::ZeroFill).expect("normalize");

    let ctx = context(&set, &[]);
    let err = compose(&ctx, &settings(), &ChartRenderer::new()).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_builder_content_ids() {
    let mut builder = ReportBuilder::new("Teste");
    let a = builder.attach("grafico", "image/png", vec![1, 2, 3]);
    let b = builder.attach("grafico", "image/png", vec![1, 2, 3]);
    let c = builder.attach("grafico", "image/png", vec![9]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), "grafico-".len() + 16);

    builder.section("Seção", html::image(&a, "x", 600));
    let report = builder.build("Assunto");
    assert_eq!(report.images.len(), 2);
    assert_eq!(report.referenced_cids(), vec![a]);
}

#[test]
fn test_html_escaping() {
    assert_eq!(html::escape("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
    let table = html::table(&["A"], &[vec!["<x>".into()], vec!["y".into()]]);
    assert!(table.contains("<td>&lt;x&gt;</td>"));
    assert!(table.contains("background-color:#f2f2f2;"));
}

#[test]
fn test_pie_pulls_out_every_largest_slice() {
    assert_eq!(
        exploded_slices(&[5.0, 5.0, 2.0]),
        vec![true, true, false]
    );
    assert_eq!(exploded_slices(&[1.0, 4.0, 3.0]), vec![false, true, false]);
    assert_eq!(exploded_slices(&[9.0]), vec![false]);
    assert!(exploded_slices(&[]).is_empty());
}
