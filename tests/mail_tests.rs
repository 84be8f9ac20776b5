use lettre::Message;
use rfechamento::errors::{AppError, AppResult};
use rfechamento::mail::{Envelope, MailTransport, SmtpRelay, build_message, dispatch};
use rfechamento::report::{InlineImage, Report, ReportBuilder, html};
use std::cell::RefCell;

/// Relay stand-in: accepts one password and records what it "sent".
struct FakeRelay {
    password: String,
    accepted: String,
    sent: RefCell<Vec<String>>,
}

impl FakeRelay {
    fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
            accepted: "segredo".to_string(),
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl MailTransport for FakeRelay {
    fn deliver(&self, message: &Message) -> AppResult<()> {
        if self.password != self.accepted {
            return Err(AppError::Transport("535 authentication failed".into()));
        }
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        self.sent.borrow_mut().push(raw);
        Ok(())
    }
}

fn sample_report() -> (Report, String) {
    let mut builder = ReportBuilder::new("Relatório Diário");
    let cid = builder.attach("grafico", "image/png", vec![0x89, b'P', b'N', b'G', 1, 2, 3]);
    builder.section("Gráficos", html::image(&cid, "Gráfico", 600));
    (builder.build("Fechamento 19/10/2026"), cid)
}

fn envelope() -> Envelope {
    Envelope::new(
        "relatorios@example.com",
        vec!["gestao@example.com".into(), "turno@example.com".into()],
    )
}

#[test]
fn test_wrong_credentials_send_nothing() {
    let (report, _) = sample_report();
    let relay = FakeRelay::new("errada");

    let err = dispatch(&report, &envelope(), &relay).unwrap_err();
    assert!(err.is_transport());
    assert!(relay.sent.borrow().is_empty());
}

#[test]
fn test_inline_image_content_id_matches_body() {
    let (report, cid) = sample_report();
    let relay = FakeRelay::new("segredo");

    dispatch(&report, &envelope(), &relay).expect("dispatch");

    let sent = relay.sent.borrow();
    assert_eq!(sent.len(), 1);
    let raw = &sent[0];
    assert!(raw.contains("multipart/related"));
    assert!(raw.contains(&format!("Content-ID: <{cid}>")));
    assert!(raw.contains("image/png"));
    assert!(raw.contains("gestao@example.com"));
    assert!(raw.contains("turno@example.com"));
}

#[test]
fn test_dangling_cid_is_rejected() {
    let report = Report {
        subject: "x".into(),
        html: "<img src=\"cid:grafico-0000000000000000\"/>".into(),
        images: vec![InlineImage {
            content_id: "grafico-ffffffffffffffff".into(),
            content_type: "image/png".into(),
            bytes: vec![1],
        }],
    };
    assert!(build_message(&report, &envelope()).unwrap_err().is_config());
}

#[test]
fn test_cid_text_in_notes_is_not_an_image_reference() {
    let mut builder = ReportBuilder::new("Relatório Diário");
    let cid = builder.attach("grafico", "image/png", vec![0x89, b'P', b'N', b'G', 9]);
    builder.section("Gráficos", html::image(&cid, "Gráfico", 600));
    builder.section(
        "Observações",
        html::paragraph("Ver anexo cid:foto no e-mail anterior \"src=\"cid:x\""),
    );
    let report = builder.build("Fechamento 19/10/2026");

    assert_eq!(report.referenced_cids(), vec![cid.clone()]);

    let relay = FakeRelay::new("segredo");
    dispatch(&report, &envelope(), &relay).expect("dispatch");
    assert!(relay.sent.borrow()[0].contains(&format!("Content-ID: <{cid}>")));
}

#[test]
fn test_no_recipients_is_config_error() {
    let (report, _) = sample_report();
    let err = build_message(&report, &Envelope::new("relatorios@example.com", vec![]))
        .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_invalid_sender_is_config_error() {
    let (report, _) = sample_report();
    let err = build_message(
        &report,
        &Envelope::new("not an address", vec!["gestao@example.com".into()]),
    )
    .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_relay_settings() {
    let relay = SmtpRelay::new("smtp.example.com", 2525, "user", "pass");
    assert_eq!(relay.host(), "smtp.example.com");
    assert_eq!(relay.port(), 2525);
}
