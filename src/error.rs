//! Error type shared by every stage of the pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by corpus loading, tagging, statistics, concordance and export.
#[derive(Debug, Error)]
pub enum Error {
    /// Language code outside `zh` / `en`.
    #[error("Language not supported: {0:?}. Supported codes are 'zh' (Chinese) and 'en' (English)")]
    UnsupportedLanguage(String),

    /// Automatic detection found no supported language.
    #[error("Could not detect a supported language (Chinese or English)")]
    UndetectedLanguage,

    /// KWIC mode outside `regex` / none.
    #[error("Invalid KWIC mode {0:?}: mode can only be 'regex' or none")]
    InvalidMode(String),

    /// Tile count outside {1, 2, 5, 10}.
    #[error("Invalid tile count {0}: the value should be in [1, 2, 5, 10]")]
    InvalidTile(usize),

    /// A ratio whose denominator is zero for this document.
    #[error("Division by zero: {document} has no {quantity}")]
    DivisionByZero {
        document: String,
        quantity: &'static str,
    },

    /// Keyword pattern failed to compile.
    #[error("Invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Requested column is absent from a parallel table header.
    #[error("Column {0:?} not found in parallel table")]
    MissingColumn(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn zero(document: &str, quantity: &'static str) -> Self {
        Error::DivisionByZero {
            document: document.to_string(),
            quantity,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
