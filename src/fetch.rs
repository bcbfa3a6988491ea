use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

use crate::error::IngestError;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) speech_compare/0.1";

/// Retrieves the raw bytes behind a URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, IngestError>;
}

/// Blocking HTTP GET. Any transport error or non-2xx status is a fetch error.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpFetcher { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        let fail = |e: reqwest::Error| IngestError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let start = Instant::now();
        let bytes = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(fail)?;

        debug!(
            "Fetched {} ({} bytes in {}ms)",
            url,
            bytes.len(),
            start.elapsed().as_millis()
        );
        Ok(bytes.to_vec())
    }
}

// ── Tests ──
