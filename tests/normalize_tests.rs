mod common;
use common::{CTE_LOG_CSV, OCCURRENCES_CSV, OPERATIONS_CSV, PLAZAS_CSV, day};
use rfechamento::core::normalize::{
    QuantityPolicy, normalize_cte_log, normalize_occurrences, normalize_operations,
    normalize_toll_plazas, occurrences_on, parse_quantity, parse_truthy,
};
use rfechamento::models::{Field, OperationKind};
use rfechamento::source::RawTable;
use rfechamento::utils::date::parse_sheet_date;
use rfechamento::utils::time::{format_hours_label, format_hours_minutes, parse_elapsed_minutes};

#[test]
fn test_truthy_literals() {
    for v in ["true", "TRUE", " 1 ", "sim", "Sim", "verdadeiro"] {
        assert!(parse_truthy(v), "{v} should be true");
    }
    for v in ["false", "0", "nao", "não", "", "yes", "x"] {
        assert!(!parse_truthy(v), "{v} should be false");
    }
}

#[test]
fn test_elapsed_time_parsing() {
    assert_eq!(parse_elapsed_minutes("1:30:00"), Some(90.0));
    assert_eq!(parse_elapsed_minutes("0:45"), Some(45.0));
    assert_eq!(parse_elapsed_minutes("26:00:00"), Some(1560.0));
    assert_eq!(parse_elapsed_minutes("0:00:30"), Some(0.5));
    assert_eq!(parse_elapsed_minutes("42"), Some(42.0));
    assert_eq!(parse_elapsed_minutes("12,5"), Some(12.5));

    assert_eq!(parse_elapsed_minutes(""), None);
    assert_eq!(parse_elapsed_minutes("abc"), None);
    assert_eq!(parse_elapsed_minutes("1:75"), None);
    assert_eq!(parse_elapsed_minutes("-10"), None);
    assert_eq!(parse_elapsed_minutes("-1:00"), None);
}

#[test]
fn test_duration_formatting() {
    assert_eq!(format_hours_minutes(125.0), "02H:05M");
    assert_eq!(format_hours_minutes(-3.0), "00H:00M");
    assert_eq!(format_hours_label(105.0), "1h 45m");
}

#[test]
fn test_sheet_dates() {
    assert_eq!(parse_sheet_date("19/10/2026"), Some(day(2026, 10, 19)));
    assert_eq!(parse_sheet_date("19-10-2026"), Some(day(2026, 10, 19)));
    assert_eq!(parse_sheet_date("2026-10-19"), Some(day(2026, 10, 19)));
    assert_eq!(parse_sheet_date("19/10/26"), Some(day(2026, 10, 19)));
    assert_eq!(parse_sheet_date("1.2.27"), Some(day(2027, 2, 1)));
    assert_eq!(parse_sheet_date("31/02/26"), None);
    assert_eq!(
        parse_sheet_date("19/10/2026 08:15:00"),
        Some(day(2026, 10, 19))
    );
    assert_eq!(parse_sheet_date("31/02/2026"), None);
    assert_eq!(parse_sheet_date("ontem"), None);
    assert_eq!(parse_sheet_date(""), None);
}

#[test]
fn test_quantity_parsing() {
    assert_eq!(parse_quantity("12"), Some(12));
    assert_eq!(parse_quantity("12.0"), Some(12));
    assert_eq!(parse_quantity(" 3,0 "), Some(3));
    assert_eq!(parse_quantity("abc"), None);
    assert_eq!(parse_quantity("-2"), None);
}

#[test]
fn test_operations_drop_bad_dates_and_keep_bad_durations() {
    let table = RawTable::parse(OPERATIONS_CSV).expect("parse csv");
    let set = normalize_operations(&table, QuantityPolicy::ZeroFill).expect("normalize");

    assert_eq!(set.len(), 9);
    assert_eq!(set.dropped, 1);

    // "xx" duration: row kept, duration undefined
    let unloading = set
        .records
        .iter()
        .find(|r| r.kind == OperationKind::Other("Descarga".into()))
        .expect("unknown type kept");
    assert_eq!(unloading.duration_minutes, None);

    assert!(
        set.records
            .iter()
            .filter_map(|r| r.duration_minutes)
            .all(|m| m >= 0.0)
    );

    let first = &set.records[0];
    assert_eq!(first.kind, OperationKind::Launch);
    assert!(first.cte_issued && first.nf_receipt && first.toll);
    assert_eq!(first.duration_minutes, Some(90.0));
    assert_eq!(first.shift, "1º Turno");

    // "1° Turno" is the same shift as "1º Turno"
    assert_eq!(set.records[2].shift, "1º Turno");
}

#[test]
fn test_invalid_quantity_policy() {
    let table = RawTable::parse(OPERATIONS_CSV).expect("parse csv");

    let zero = normalize_operations(&table, QuantityPolicy::ZeroFill).expect("normalize");
    let carla: Vec<_> = zero
        .records
        .iter()
        .filter(|r| r.kind.is_closeout() && r.collaborator == "Carla")
        .collect();
    assert_eq!(carla.len(), 1);
    assert_eq!(carla[0].cte_quantity, 0);

    let dropped = normalize_operations(&table, QuantityPolicy::DropRow).expect("normalize");
    assert_eq!(dropped.len(), 8);
    assert_eq!(dropped.dropped, 2);
    assert!(
        dropped
            .records
            .iter()
            .all(|r| !(r.kind.is_closeout() && r.collaborator == "Carla"))
    );
}

#[test]
fn test_schema_reflects_loaded_columns() {
    let csv = "Data,Tipo,Colaborador\n19/10/2026,Baixa,Ana\n";
    let table = RawTable::parse(csv).expect("parse csv");
    let set = normalize_operations(&table, QuantityPolicy::ZeroFill).expect("normalize");

    assert!(set.schema.contains(Field::Kind));
    assert!(!set.schema.contains(Field::Duration));
    assert!(!set.schema.contains(Field::CteIssued));
}

#[test]
fn test_missing_required_column_is_config_error() {
    let csv = "Data,Placa,Colaborador\n19/10/2026,ABC1D23,Ana\n";
    let table = RawTable::parse(csv).expect("parse csv");
    let err = normalize_operations(&table, QuantityPolicy::ZeroFill).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("Tipo"));
}

#[test]
fn test_headers_are_matched_loosely() {
    let csv = "\u{feff} data ,TIPO,colaborador\n19/10/2026,baixa,Ana\n,,\n";
    let table = RawTable::parse(csv).expect("parse csv");
    assert_eq!(table.len(), 1);

    let set = normalize_operations(&table, QuantityPolicy::ZeroFill).expect("normalize");
    assert_eq!(set.records[0].kind, OperationKind::Closeout);
}

#[test]
fn test_cte_log() {
    let table = RawTable::parse(CTE_LOG_CSV).expect("parse csv");
    let entries = normalize_cte_log(&table).expect("normalize");
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[1].shift, "1º Turno");
    assert_eq!(entries[1].quantity, 25);
}

#[test]
fn test_occurrences_for_report_day() {
    let table = RawTable::parse(OCCURRENCES_CSV).expect("parse csv");
    let occurrences = normalize_occurrences(&table).expect("normalize");
    assert_eq!(occurrences.len(), 3);
    assert!(occurrences[0].is_resolved());
    assert_eq!(occurrences[1].evidence_link(), None);
    assert_eq!(
        occurrences[0].evidence_link(),
        Some("https://example.com/foto.jpg")
    );

    assert_eq!(occurrences_on(&occurrences, day(2026, 10, 19)).len(), 1);
    assert!(occurrences_on(&occurrences, day(2026, 10, 20)).is_empty());
}

#[test]
fn test_toll_plazas_accept_decimal_commas() {
    let table = RawTable::parse(PLAZAS_CSV).expect("parse csv");
    let plazas = normalize_toll_plazas(&table).expect("normalize");
    assert_eq!(plazas.len(), 3);
    assert!((plazas[0].light_fee - 12.3).abs() < 1e-9);
    assert_eq!(plazas[1].highway, "SP-348");
}
