use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal failures while reading the corpus or the exported index.
#[derive(Debug, Error)]
pub enum Error {
    /// No backing page exists for the identifier.
    #[error("document not found: {id}")]
    DocumentNotFound { id: String },

    /// Section markers are missing, misordered or nested.
    #[error("malformed document {id}: {reason}")]
    MalformedDocument { id: String, reason: String },

    /// A line of the inverted-index export could not be parsed.
    #[error("malformed index line {line}: {reason}")]
    MalformedIndex { line: usize, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid index metadata: {0}")]
    Meta(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn malformed(id: &str, reason: impl Into<String>) -> Self {
        Error::MalformedDocument { id: id.to_string(), reason: reason.into() }
    }
}
