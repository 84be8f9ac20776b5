use crate::errors::{AppError, AppResult};
use crate::utils::path::{expand_tilde, is_remote};
use log::debug;
use std::fs;
use std::time::Duration;

/// Retrieves the raw CSV text behind a source location.
pub trait Fetcher {
    fn fetch(&self, location: &str) -> AppResult<String>;
}

/// Fetches `http(s)://` locations with a blocking client and reads
/// everything else from disk.
pub struct DefaultFetcher {
    client: reqwest::blocking::Client,
}

impl DefaultFetcher {
    pub fn new() -> AppResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("rfechamento/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Http {
                location: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    fn fetch_remote(&self, location: &str) -> AppResult<String> {
        let http_err = |e: reqwest::Error| AppError::Http {
            location: location.to_string(),
            message: e.to_string(),
        };

        let resp = self.client.get(location).send().map_err(http_err)?;
        let resp = resp.error_for_status().map_err(http_err)?;
        resp.text().map_err(http_err)
    }
}

impl Fetcher for DefaultFetcher {
    fn fetch(&self, location: &str) -> AppResult<String> {
        if is_remote(location) {
            debug!("fetching remote source {location}");
            self.fetch_remote(location)
        } else {
            let path = expand_tilde(location);
            debug!("reading local source {}", path.display());
            Ok(fs::read_to_string(path)?)
        }
    }
}
