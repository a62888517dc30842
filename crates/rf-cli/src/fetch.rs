use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;

use rf_core::url::is_http_url;

use crate::config::{FetchConfig, MAX_BACKOFF_SECS};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolves source identifiers into text with `\n` line endings.
///
/// `http://` and `https://` sources go over the network with retry;
/// anything else is a local path, optionally `file://`-prefixed.
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    backoff_secs: f64,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            max_retries: config.max_retries.max(1),
            backoff_secs: config.backoff_secs,
        })
    }

    pub async fn fetch(&self, source: &str) -> Result<String, FetchError> {
        let text = if is_http_url(source) {
            self.fetch_with_retry(source).await?
        } else {
            read_local(source).await?
        };
        Ok(normalize_line_endings(&text))
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(url).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.max_retries => {
                    let delay = retry_delay(self.backoff_secs, attempt);
                    warn!(
                        "fetch {} failed (attempt {}/{}): {}; retrying in {:.1}s",
                        url,
                        attempt,
                        self.max_retries,
                        e,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let text = response.text().await?;
        debug!("fetched {} ({} bytes)", url, text.len());
        Ok(text)
    }
}

/// Sleep before retry `attempt`. Out-of-range products clamp to the
/// configured ceiling instead of panicking.
fn retry_delay(backoff_secs: f64, attempt: u32) -> Duration {
    let ceiling = Duration::from_secs_f64(MAX_BACKOFF_SECS * 10.0);
    Duration::try_from_secs_f64(backoff_secs * attempt as f64)
        .map(|delay| delay.min(ceiling))
        .unwrap_or(ceiling)
}

async fn read_local(source: &str) -> Result<String, FetchError> {
    let path = PathBuf::from(source.strip_prefix("file://").unwrap_or(source));
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| FetchError::Io { path, source })
}

/// Collapse `\r\n` and lone `\r` into `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
