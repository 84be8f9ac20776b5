//! Mail dispatcher: `Report` → multipart/related message → transport.

mod smtp;

pub use smtp::SmtpRelay;

use crate::errors::{AppError, AppResult};
use crate::report::Report;
use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use log::{debug, info};

/// Who sends and who receives.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub sender: String,
    pub recipients: Vec<String>,
}

impl Envelope {
    pub fn new(sender: &str, recipients: Vec<String>) -> Self {
        Self {
            sender: sender.to_string(),
            recipients,
        }
    }
}

/// Delivery seam. Implementations open and close their own session per
/// call and report any failure as `AppError::Transport`.
pub trait MailTransport {
    fn deliver(&self, message: &Message) -> AppResult<()>;
}

fn mailbox(addr: &str) -> AppResult<Mailbox> {
    addr.trim()
        .parse::<Mailbox>()
        .map_err(|e| AppError::config(format!("invalid e-mail address '{addr}': {e}")))
}

/// Build the wire message: the HTML part followed by one inline part per
/// image. Every image source in the body must have a matching part.
pub fn build_message(report: &Report, envelope: &Envelope) -> AppResult<Message> {
    if envelope.recipients.is_empty() {
        return Err(AppError::config("no recipients configured"));
    }

    for cid in report.referenced_cids() {
        if report.image(&cid).is_none() {
            return Err(AppError::config(format!(
                "report references image cid:{cid} but has no such image"
            )));
        }
    }

    let mut builder = Message::builder()
        .from(mailbox(&envelope.sender)?)
        .subject(report.subject.clone());
    for to in &envelope.recipients {
        builder = builder.to(mailbox(to)?);
    }

    let mut related = MultiPart::related().singlepart(SinglePart::html(report.html.clone()));
    for img in &report.images {
        let content_type = ContentType::parse(&img.content_type)
            .map_err(|e| {
                AppError::Transport(format!("bad content type '{}': {e}", img.content_type))
            })?;
        related = related.singlepart(
            Attachment::new_inline(img.content_id.clone()).body(img.bytes.clone(), content_type),
        );
    }

    builder
        .multipart(related)
        .map_err(|e| AppError::Transport(format!("cannot build message: {e}")))
}

/// Build and deliver. No retry: a failure is returned to the caller as is.
pub fn dispatch(
    report: &Report,
    envelope: &Envelope,
    transport: &dyn MailTransport,
) -> AppResult<()> {
    let message = build_message(report, envelope)?;
    debug!(
        "sending '{}' with {} inline image(s)",
        report.subject,
        report.images.len()
    );
    transport.deliver(&message)?;
    info!(
        "report '{}' delivered to {} recipient(s)",
        report.subject,
        envelope.recipients.len()
    );
    Ok(())
}
