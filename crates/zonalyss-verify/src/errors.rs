use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain the raw content of a source file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A metrics table could not be loaded. Fatal for the dataset.
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct LoadError {
    pub source_id: String,
    pub cause: String,
}

impl LoadError {
    pub fn new(source_id: impl Into<String>, cause: impl ToString) -> Self {
        Self {
            source_id: source_id.into(),
            cause: cause.to_string(),
        }
    }
}

/// Boundary data could not be read or parsed. Fatal for the dataset.
#[derive(Debug, Error)]
#[error("Failed to read GeoJSON at {source_id}: {cause}")]
pub struct GeoParseError {
    pub source_id: String,
    pub cause: String,
}

impl GeoParseError {
    pub fn new(source_id: impl Into<String>, cause: impl ToString) -> Self {
        Self {
            source_id: source_id.into(),
            cause: cause.to_string(),
        }
    }
}

/// Errors emitted while persisting a verification report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid report path: {}", .0.display())]
    InvalidPath(PathBuf),
}
