mod common;
use common::day;
use rfechamento::export::{ExportTable, ReportHeading, render_pdf};

fn heading() -> ReportHeading {
    ReportHeading {
        title: "Relatorio Diario".into(),
        period: "19/10/2026".into(),
        shift: None,
        generated_on: day(2026, 10, 19),
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

fn trips(rows: usize) -> ExportTable {
    let mut table =
        ExportTable::new("Viagens fechadas", &["Destino", "Placa", "Tempo total"], 2);
    for i in 0..rows {
        table.push(vec![
            format!("Destino {i}"),
            format!("ABC{i:04}"),
            format!("{}h00", i % 9),
        ]);
    }
    table
}

#[test]
fn test_heading_lines() {
    let mut h = heading();
    assert_eq!(
        h.lines(),
        vec![
            "Período: 19/10/2026".to_string(),
            "Turno: Todos os turnos".to_string(),
            "Gerado em 19/10/2026".to_string(),
        ]
    );

    h.shift = Some("2º Turno".into());
    assert_eq!(h.lines()[1], "Turno: 2º Turno");
}

#[test]
fn test_pdf_single_page_document() {
    let empty = ExportTable::new("Sem linhas", &["A", "B"], 1);
    let bytes = render_pdf(&[trips(3), empty], &heading());

    assert!(bytes.starts_with(b"%PDF-"));
    assert!(contains(&bytes, "/Count 1"));
    assert!(contains(&bytes, "/Helvetica-Bold"));
    assert!(contains(&bytes, "/WinAnsiEncoding"));
    assert!(contains(&bytes, "(Relatorio Diario)"));
    assert!(contains(&bytes, "(Turno: Todos os turnos)"));
    assert!(contains(&bytes, "(Viagens fechadas)"));
    assert!(contains(&bytes, "(Destino 2)"));
    assert!(contains(&bytes, "(Sem linhas)"));
}

#[test]
fn test_pdf_long_table_continues_with_header() {
    let bytes = render_pdf(&[trips(100)], &heading());

    assert!(contains(&bytes, "/Count 3"));
    // balanced parentheses are written unescaped
    assert!(contains(&bytes, "(Viagens fechadas (cont.))"));
    assert!(contains(&bytes, "(Destino 99)"));
}

#[test]
fn test_pdf_without_tables_is_one_page() {
    let bytes = render_pdf(&[], &heading());
    assert!(contains(&bytes, "/Count 1"));
    assert!(contains(&bytes, "(Relatorio Diario)"));
}
