mod common;
use common::{temp_dir, write_file};
use rfechamento::config::{Config, MailConfig, PASSWORD_ENV};
use rfechamento::core::normalize::QuantityPolicy;
use rfechamento::report::ChartStyle;
use std::path::Path;

#[test]
fn test_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.cache_ttl_secs, 600);
    assert_eq!(cfg.expected_work_hours, 7.0);
    assert_eq!(cfg.invalid_quantity, QuantityPolicy::ZeroFill);
    assert_eq!(cfg.mail.relay, "smtp.gmail.com");
    assert_eq!(cfg.mail.port, 587);
    assert_eq!(cfg.mail.password_env, PASSWORD_ENV);
    assert_eq!(cfg.charts.len(), 2);
    assert_eq!(cfg.charts[0].style, ChartStyle::Pie);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = temp_dir("config_partial");
    let path = write_file(
        &dir,
        "rfechamento.conf",
        "sources:\n  operations: ops.csv\ninvalid_quantity: drop_row\nmail:\n  sender: a@example.com\n  username: login\n",
    );

    let cfg = Config::load(Some(Path::new(&path))).expect("load");
    assert_eq!(cfg.sources.operations, "ops.csv");
    assert_eq!(cfg.invalid_quantity, QuantityPolicy::DropRow);
    assert_eq!(cfg.mail.login(), "login");
    assert_eq!(cfg.mail.port, 587);
    assert_eq!(cfg.title, "Relatório Diário");
}

#[test]
fn test_missing_explicit_file_is_config_error() {
    let dir = temp_dir("config_missing");
    let err = Config::load(Some(&dir.join("nope.conf"))).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_invalid_expected_hours() {
    let dir = temp_dir("config_hours");
    let path = write_file(&dir, "rfechamento.conf", "expected_work_hours: 0.0\n");
    let err = Config::load(Some(Path::new(&path))).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_malformed_yaml() {
    let dir = temp_dir("config_malformed");
    let path = write_file(&dir, "rfechamento.conf", "charts: [unterminated\n");
    assert!(Config::load(Some(Path::new(&path))).is_err());
}

#[test]
fn test_init_round_trip() {
    let dir = temp_dir("config_init");
    let path = dir.join("sub").join("rfechamento.conf");

    let written = Config::init_all(Some(&path)).expect("init");
    assert_eq!(written, path);

    let cfg = Config::load(Some(&path)).expect("load");
    assert_eq!(cfg.charts, Config::default().charts);
    assert!(!cfg.to_yaml().expect("yaml").contains("password:"));
}

#[test]
fn test_password_comes_from_environment_only() {
    let mail = MailConfig {
        password_env: "RFECHAMENTO_TEST_UNSET_PASSWORD_VAR".into(),
        ..MailConfig::default()
    };
    assert!(mail.password().unwrap_err().is_config());
    assert_eq!(mail.login(), "");
}
