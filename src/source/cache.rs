//! Explicit, time-bounded cache of fetched source text.
//!
//! Every report invocation asks the cache for its sources; an entry older
//! than the TTL is fetched again. Nothing is kept across processes.

use super::fetch::Fetcher;
use crate::errors::AppResult;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub struct SourceCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Arc<str>)>>,
}

impl SourceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached text for `location`, fetching it when missing or expired.
    /// A failed fetch leaves no entry behind.
    pub fn get_or_fetch(&self, location: &str, fetcher: &dyn Fetcher) -> AppResult<Arc<str>> {
        {
            let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            if let Some((at, text)) = entries.get(location)
                && at.elapsed() < self.ttl
            {
                debug!("source cache hit: {location}");
                return Ok(Arc::clone(text));
            }
        }

        let text: Arc<str> = Arc::from(fetcher.fetch(location)?);

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(location.to_string(), (Instant::now(), Arc::clone(&text)));
        Ok(text)
    }

    pub fn invalidate(&self, location: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(location);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
