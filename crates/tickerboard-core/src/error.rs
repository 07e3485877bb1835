use std::path::PathBuf;

use thiserror::Error;

/// Validation errors raised while turning identifier codes into provider symbols.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or digit: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
}

/// Failures loading the static identifier list.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read identifier list '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("identifier list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("identifier list is malformed: {reason}")]
    Malformed { reason: String },
}

impl ConfigError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}
