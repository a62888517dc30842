use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{info, warn};
use serde::Serialize;

use rf_compiler::{classify_document, Aggregator, DomainSets, SourceReport};

use crate::config::Config;
use crate::error::CliError;
use crate::fetch::Fetcher;

/// Fetch and classify every configured source in order, then merge.
///
/// A source that fails to fetch is recorded in the reports and skipped.
pub async fn compile_sources(config: &Config) -> Result<DomainSets, CliError> {
    let fetcher = Fetcher::new(&config.fetch)?;
    let mut aggregator = Aggregator::new();

    for source in &config.sources {
        let start = Instant::now();
        match fetcher.fetch(source).await {
            Ok(text) => {
                let result = classify_document(&text);
                info!(
                    "{} [{}] {} lines: +{} exact, +{} suffix, -{} allow ({:.1}ms)",
                    source,
                    result.dialect,
                    result.lines,
                    result.block_exact.len(),
                    result.block_suffix.len(),
                    result.allow_exact.len(),
                    start.elapsed().as_secs_f64() * 1000.0
                );
                if result.is_empty() {
                    warn!("{} contributed no hosts", source);
                }
                aggregator.add(source.as_str(), result);
            }
            Err(e) => {
                warn!("{} skipped: {}", source, e);
                aggregator.add_failure(source.as_str(), e.to_string());
            }
        }
    }

    Ok(aggregator.finish())
}

/// Write `contents` to `path` through a sibling temporary file so readers
/// never observe a partial rule set.
pub fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CliError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, contents).map_err(|source| CliError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        CliError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub output: &'a Path,
    pub exact: usize,
    pub suffix: usize,
    pub allow: usize,
    pub sources: &'a [SourceReport],
}

impl<'a> RunReport<'a> {
    pub fn new(output: &'a Path, sets: &'a DomainSets) -> Self {
        Self {
            output,
            exact: sets.domain_set.len(),
            suffix: sets.domain_suffix_set.len(),
            allow: sets.allow_count,
            sources: &sets.sources,
        }
    }
}

pub fn write_report(path: &Path, report: &RunReport<'_>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(report)?;
    write_output(path, &json)
}
