use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Sales Insights.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// The configured data file does not exist.
    #[error("Could not find the data file '{}'. Please check the file name and path.", .0.display())]
    SourceNotFound(PathBuf),

    /// The data file exists but could not be opened or read.
    #[error("Failed to read file {}: {}", .path.display(), .source)]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header row lacks one or more required columns.
    #[error("Missing required columns in {}: {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    /// A data row failed required-field parsing.
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    /// A CSV failure not attributable to a single row.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl InsightsError {
    /// `true` for errors the user can fix by pointing at a different file.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, InsightsError::SourceNotFound(_))
    }

    /// `true` when the source was found but its contents were rejected.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            InsightsError::MalformedRow { .. }
                | InsightsError::MissingColumns { .. }
                | InsightsError::Csv(_)
        )
    }
}

/// Convenience alias used throughout the insights crates.
pub type Result<T> = std::result::Result<T, InsightsError>;
