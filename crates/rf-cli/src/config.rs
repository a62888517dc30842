use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCES: &[&str] = &[
    "https://raw.githubusercontent.com/hagezi/dns-blocklists/main/adblock/pro.txt",
    "https://raw.githubusercontent.com/bigdargon/hostsVN/master/filters/adservers-all.txt",
];

pub const DEFAULT_OUTPUT: &str = "docs/blocklist.yml";

/// Upper bound for `fetch.backoff_secs`.
pub const MAX_BACKOFF_SECS: f64 = 600.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything a run needs. Built once and passed into the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URLs or local paths, processed in this order
    pub sources: Vec<String>,
    /// Rule-set file to write
    pub output: PathBuf,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    /// Attempts per source, including the first
    pub max_retries: u32,
    /// Sleep before retry `n` is `backoff_secs * n`
    pub backoff_secs: f64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            fetch: FetchConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            max_retries: 3,
            backoff_secs: 1.5,
            user_agent: "egern-converter/1.0".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Command-line values win over the file. A non-empty `sources`
    /// replaces the configured list.
    pub fn apply_overrides(&mut self, sources: Vec<String>, output: Option<PathBuf>) {
        if !sources.is_empty() {
            self.sources = sources;
        }
        if let Some(output) = output {
            self.output = output;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output path is empty".to_string()));
        }
        if self.fetch.max_retries == 0 {
            return Err(ConfigError::Invalid("fetch.max_retries must be at least 1".to_string()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch.timeout_secs must be at least 1".to_string()));
        }
        if !(0.0..=MAX_BACKOFF_SECS).contains(&self.fetch.backoff_secs) {
            return Err(ConfigError::Invalid(format!(
                "fetch.backoff_secs must be between 0 and {MAX_BACKOFF_SECS}"
            )));
        }
        if let Some(blank) = self.sources.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("sources[{blank}] is empty")));
        }
        Ok(())
    }
}
