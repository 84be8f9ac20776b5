use super::MailTransport;
use crate::errors::{AppError, AppResult};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated STARTTLS relay. A connection is opened for each delivery
/// and dropped when it returns, on success and on failure alike.
pub struct SmtpRelay {
    host: String,
    port: u16,
    credentials: Credentials,
}

impl SmtpRelay {
    pub fn new(host: &str, port: u16, username: &str, password: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            credentials: Credentials::new(username.to_string(), password.to_string()),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl MailTransport for SmtpRelay {
    fn deliver(&self, message: &Message) -> AppResult<()> {
        let transport = SmtpTransport::starttls_relay(&self.host)
            .map_err(|e| AppError::Transport(format!("{}: {e}", self.host)))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .timeout(Some(TIMEOUT))
            .build();

        transport
            .send(message)
            .map(|_| ())
            .map_err(|e| AppError::Transport(format!("{}:{}: {e}", self.host, self.port)))
    }
}
