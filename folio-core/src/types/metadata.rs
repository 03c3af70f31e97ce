//! Book metadata (Dublin Core subset)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Language used when none is set
pub const DEFAULT_LANGUAGE: &str = "en";

/// Prefix applied to the identifier in the package and NCX documents
pub const URN_UUID_PREFIX: &str = "urn:uuid:";

/// Book metadata.
///
/// This is the only copy of the title and identifier; the package document
/// and both tables of contents read them from here when they are built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    /// Book title
    pub title: String,

    /// Author, omitted from the package when empty
    pub author: String,

    /// Language code (BCP 47)
    pub language: String,

    /// Unique identifier, a UUID unless the caller supplies another value
    pub identifier: String,

    /// Book description/summary
    pub description: Option<String>,

    /// Last modification time; the write operation stamps the current time when unset
    pub modified: Option<DateTime<Utc>>,

    /// Page progression direction
    pub reading_direction: ReadingDirection,

    /// Filename of the registered image used as cover
    pub cover_image: Option<String>,
}

impl Metadata {
    /// Create new metadata with a fresh identifier and the default language
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            identifier: uuid::Uuid::new_v4().to_string(),
            description: None,
            modified: None,
            reading_direction: ReadingDirection::LeftToRight,
            cover_image: None,
        }
    }

    /// Identifier as written to the package and NCX documents
    pub fn urn(&self) -> String {
        format!("{}{}", URN_UUID_PREFIX, self.identifier)
    }

    /// Modification time formatted for `dcterms:modified`
    pub(crate) fn modified_timestamp(&self) -> String {
        self.modified
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string()
    }
}

/// Reading direction for the book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadingDirection {
    /// Left to right (Latin, Cyrillic, etc.)
    #[default]
    LeftToRight,

    /// Right to left (Arabic, Hebrew, etc.)
    RightToLeft,
}

impl ReadingDirection {
    /// Value of the spine's `page-progression-direction` attribute
    pub fn as_attribute(self) -> &'static str {
        match self {
            ReadingDirection::LeftToRight => "ltr",
            ReadingDirection::RightToLeft => "rtl",
        }
    }
}
