#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use rfechamento::models::{OperationKind, OperationRecord, OperationSet};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rfe() -> Command {
    cargo_bin_cmd!("rfechamento")
}

/// Operations log as exported by the spreadsheet: 8 rows on 19/10/2026,
/// one row with a broken date and one on the previous day.
pub const OPERATIONS_CSV: &str = "\
Data,Placa,Tipo,Destino,Total (min),Colaborador,CT-e emitido,Recepção de NFs,Pedágio,QTD de CT-e,Turno
19/10/2026,ABC1D23,Lançamento,Campinas,1:30:00,Ana,TRUE,sim,1,,1º Turno
19/10/2026,ABC1D23,Lançamento,Campinas,0:45:00,Ana,false,1,0,,1º Turno
19/10/2026,XYZ9K88,Baixa,Itapecerica da Serra,30,Bruno,verdadeiro,0,nao,12,1° Turno
19/10/2026,,Baixa,,20,Bruno,0,0,0,8,1º Turno
19/10/2026,,Baixa,,40,Carla,0,0,0,abc,2º Turno
19/10/2026,DEF4G56,Abastecimento,Santos,15,Carla,0,0,0,,2º Turno
19/10/2026,DEF4G56,Lançamento,Santos,2:00:00,Carla,1,1,1,,2º Turno
19/10/2026,GHI7J89,Descarga,Jundiaí,xx,Bruno,0,0,0,,1º Turno
data-invalida,ABC1D23,Lançamento,Campinas,1:00:00,Ana,1,1,1,,1º Turno
18/10/2026,ABC1D23,Lançamento,Campinas,3:00:00,Ana,1,1,1,,1º Turno
";

pub const CTE_LOG_CSV: &str = "\
Data,Turno,Responsável,Quantidade de CTe
19/10/2026,1º Turno,Ana,10
19/10/2026,1° Turno,Bruno,25
19/10/2026,2º Turno,Ana,5
18/10/2026,1º Turno,Carla,40
17/10/2026,2º Turno,Bruno,7
";

pub const OCCURRENCES_CSV: &str = "\
Data da ocorrência,Turno,Placa do veículo,Setor responsável,Descritivo do ocorrido,Tipo de Erro,Status,Cliente (CNPJ),Evidências
19/10/2026,1º Turno,ABC1D23,Expedição,Volume avariado,Avaria,Resolvido,12.345.678/0001-90,https://example.com/foto.jpg
18/10/2026,2º Turno,DEF4G56,Expedição,Saída após o horário,Atraso,Pendente,98.765.432/0001-10,
18/10/2026,1° Turno,XYZ9K88,Recebimento,Caixa amassada,Avaria,Resolvido,12.345.678/0001-90,
";

pub const PLAZAS_CSV: &str = "\
praca,rodovia,lat,lon,valor_leve
Praça A,SP-330,-23.0000,-47.0000,\"12,30\"
Praça B,SP-348,-23.5000,-46.9000,8.70
Longe,BR-116,-10.0000,-40.0000,5.00
";

/// Fresh directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("rfechamento_{name}"));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("rfechamento_{name}_out.{ext}"));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn write_file(dir: &PathBuf, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path.to_string_lossy().to_string()
}

/// Write the fixture sources plus a configuration pointing at them and
/// return the configuration path.
pub fn setup_workspace(name: &str) -> String {
    let dir = temp_dir(name);
    let operations = write_file(&dir, "operacoes.csv", OPERATIONS_CSV);
    let cte_log = write_file(&dir, "cte.csv", CTE_LOG_CSV);
    let occurrences = write_file(&dir, "ocorrencias.csv", OCCURRENCES_CSV);
    let plazas = write_file(&dir, "pracas.csv", PLAZAS_CSV);

    let yaml = format!(
        "sources:\n  operations: \"{operations}\"\n  cte_log: \"{cte_log}\"\n  occurrences: \"{occurrences}\"\n  toll_plazas: \"{plazas}\"\nmail:\n  sender: \"relatorios@example.com\"\n  recipients: [\"gestao@example.com\"]\n"
    );
    write_file(&dir, "rfechamento.conf", &yaml)
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// In-memory record with the fields most tests care about.
pub fn record(kind: &str, collaborator: &str, minutes: Option<f64>, cte: u32) -> OperationRecord {
    let mut r = OperationRecord::new(
        day(2026, 10, 19),
        OperationKind::from_label(kind),
        collaborator,
    );
    r.duration_minutes = minutes;
    r.cte_quantity = cte;
    r
}

pub fn set_of(records: Vec<OperationRecord>) -> OperationSet {
    OperationSet::from_records(records)
}
