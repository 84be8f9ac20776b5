use crate::core::calculator::idle::DEFAULT_EXPECTED_HOURS;
use crate::core::normalize::QuantityPolicy;
use crate::errors::{AppError, AppResult};
use crate::report::ChartSlot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const PASSWORD_ENV: &str = "RFECHAMENTO_SMTP_PASSWORD";

/// Locations of the datasets: HTTPS CSV exports or local paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Operations log. Required by every report.
    #[serde(default)]
    pub operations: String,
    #[serde(default)]
    pub cte_log: Option<String>,
    #[serde(default)]
    pub occurrences: Option<String>,
    #[serde(default)]
    pub toll_plazas: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_relay")]
    pub relay: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Login name on the relay; the sender address when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Environment variable holding the SMTP password.
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

fn default_relay() -> String {
    "smtp.gmail.com".to_string()
}
fn default_port() -> u16 {
    587
}
fn default_subject() -> String {
    "📊 Fechamento".to_string()
}
fn default_password_env() -> String {
    PASSWORD_ENV.to_string()
}
fn default_title() -> String {
    "Relatório Diário".to_string()
}
fn default_cache_ttl() -> u64 {
    600
}
fn default_expected_hours() -> f64 {
    DEFAULT_EXPECTED_HOURS
}
fn default_home_base() -> String {
    "Itapecerica da Serra".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay: default_relay(),
            port: default_port(),
            username: None,
            sender: String::new(),
            recipients: Vec::new(),
            subject: default_subject(),
            password_env: default_password_env(),
        }
    }
}

impl MailConfig {
    pub fn login(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.sender)
    }

    /// Read the password from the configured environment variable.
    pub fn password(&self) -> AppResult<String> {
        std::env::var(&self.password_env).map_err(|_| {
            AppError::config(format!(
                "SMTP password not set: export {} before sending",
                self.password_env
            ))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_expected_hours")]
    pub expected_work_hours: f64,
    /// Destination left out of the trip-closing table.
    #[serde(default = "default_home_base")]
    pub home_base: String,
    #[serde(default)]
    pub invalid_quantity: QuantityPolicy,
    #[serde(default = "ChartSlot::defaults")]
    pub charts: Vec<ChartSlot>,
    #[serde(default)]
    pub mail: MailConfig,
    /// TTF/OTF for chart labels; a common system font is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_font: Option<String>,
    /// PNG appended after the closing line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourcesConfig::default(),
            cache_ttl_secs: default_cache_ttl(),
            title: default_title(),
            expected_work_hours: default_expected_hours(),
            home_base: default_home_base(),
            invalid_quantity: QuantityPolicy::default(),
            charts: ChartSlot::defaults(),
            mail: MailConfig::default(),
            chart_font: None,
            signature: None,
        }
    }
}

impl Config {
    /// `~/.rfechamento` (falls back to the working directory without a home).
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rfechamento")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rfechamento.conf")
    }

    /// Load from `path` (or the default file). A missing default file gives
    /// the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_file(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(AppError::config(format!(
                    "configuration file not found: {}",
                    path.display()
                )));
            }
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Settings that would make every report fail.
    pub fn validate(&self) -> AppResult<()> {
        if self.expected_work_hours <= 0.0 {
            return Err(AppError::config("expected_work_hours must be positive"));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write a default configuration file (at `path` or the default location)
    /// and return where it was written.
    pub fn init_all(path: Option<&Path>) -> AppResult<PathBuf> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_file);
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }

        let yaml = Config::default().to_yaml()?;
        let mut file = fs::File::create(&path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(path)
    }
}
