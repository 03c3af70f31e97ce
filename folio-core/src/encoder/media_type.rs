//! Extension to media type table for manifest entries

use crate::error::{FolioError, Result};
use std::path::Path;

pub const XHTML: &str = "application/xhtml+xml";
pub const NCX: &str = "application/x-dtbncx+xml";
pub const EPUB: &str = "application/epub+zip";
pub const PACKAGE: &str = "application/oebps-package+xml";

const TABLE: &[(&str, &str)] = &[
    ("xhtml", XHTML),
    ("html", XHTML),
    ("css", "text/css"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ncx", NCX),
];

/// Media type for a filename, matched case-insensitively on its extension
pub fn for_filename(filename: &str) -> Result<&'static str> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            TABLE
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(ext))
                .map(|(_, media_type)| *media_type)
        })
        .ok_or_else(|| FolioError::UnsupportedMediaType(filename.to_string()))
}
