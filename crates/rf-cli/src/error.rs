use std::path::PathBuf;

use rf_compiler::ExportError;

use crate::config::ConfigError;
use crate::fetch::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to start tokio runtime: {0}")]
    Runtime(std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
