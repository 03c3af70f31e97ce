//! Error types for Folio Core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type for all Folio operations
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Filename already used in {namespace}: {filename}")]
    DuplicateFilename {
        namespace: &'static str,
        filename: String,
    },

    #[error("Invalid filename in {namespace}: {filename:?}")]
    InvalidFilename {
        namespace: &'static str,
        filename: String,
    },

    #[error("Unsupported media type for file: {0}")]
    UnsupportedMediaType(String),

    #[error("Book has no sections; the spine would be empty")]
    EmptySpine,

    #[error("Cover image is not a registered image: {0}")]
    UnknownCover(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Book has already been written")]
    AlreadyWritten,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FolioError {
    /// Whether this is the "filename already used" condition of an add operation
    pub fn is_duplicate_filename(&self) -> bool {
        matches!(self, FolioError::DuplicateFilename { .. })
    }
}

/// Errors raised while resolving the bytes of an external resource
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to read {}: {source}", path.display())]
    Local {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {reason}")]
    Remote { url: String, reason: String },

    #[error("Failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Remote fetching is not enabled: {0}")]
    RemoteDisabled(String),
}

/// Errors that occur while encoding the container
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
