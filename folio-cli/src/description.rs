//! JSON book descriptions read by `folio build`

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use folio_core::{Book, ReadingDirection, ResourceKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A book as described on disk
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookDescription {
    pub title: String,
    pub author: Option<String>,
    pub language: Option<String>,
    pub identifier: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub direction: ReadingDirection,
    /// Pinned `dcterms:modified`, for reproducible output
    pub modified: Option<DateTime<Utc>>,
    /// Filename of one of the images below
    pub cover: Option<String>,
    #[serde(default)]
    pub stylesheets: Vec<TextEntry>,
    #[serde(default)]
    pub images: Vec<ResourceEntry>,
    #[serde(default)]
    pub fonts: Vec<ResourceEntry>,
    #[serde(default)]
    pub sections: Vec<SectionEntry>,
}

/// Text given inline (`content`) or read from a file (`file`)
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextEntry {
    pub content: Option<String>,
    pub file: Option<String>,
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceEntry {
    /// Local path (relative to the description) or http(s) URL
    pub source: String,
    pub filename: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionEntry {
    pub title: String,
    pub content: Option<String>,
    pub file: Option<String>,
    pub filename: Option<String>,
    /// Filename of one of the stylesheets above, either the given `filename`
    /// or the generated `css0001.css` style name
    pub stylesheet: Option<String>,
}

impl BookDescription {
    /// Load and parse a description file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read book description: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid book description: {}", path.display()))
    }

    /// Register everything on a new [`Book`].
    ///
    /// Stylesheet and section files are read here; images and fonts are only
    /// fetched when the book is written.
    pub fn into_book(self, base_dir: &Path) -> Result<Book> {
        let mut book = Book::new(self.title);

        if let Some(author) = self.author {
            book.set_author(author);
        }
        if let Some(language) = self.language {
            book.set_language(language);
        }
        if let Some(identifier) = self.identifier {
            book.set_identifier(identifier);
        }
        if let Some(description) = self.description {
            book.set_description(description);
        }
        if let Some(modified) = self.modified {
            book.set_modified(modified);
        }
        book.set_reading_direction(self.direction);

        let mut stylesheets = HashMap::new();
        for entry in &self.stylesheets {
            let css = read_text(base_dir, entry.content.as_deref(), entry.file.as_deref())
                .context("Stylesheet needs either `content` or `file`")?;
            let path = book.add_stylesheet(&css, entry.filename.as_deref())?;
            // Unnamed stylesheets are referenced by their generated name
            if let Some(stored) = book.resources().iter(ResourceKind::Stylesheet).last() {
                stylesheets.insert(stored.filename().to_string(), path);
            }
        }

        for entry in &self.images {
            let path = book.add_image(&entry.source, entry.filename.as_deref())?;
            tracing::debug!("Image {} registered as {}", entry.source, path);
        }

        for entry in &self.fonts {
            let path = book.add_font(&entry.source, entry.filename.as_deref())?;
            tracing::debug!("Font {} registered as {}", entry.source, path);
        }

        if let Some(cover) = self.cover {
            if !book.resources().contains(ResourceKind::Image, &cover) {
                bail!("Cover '{}' is not one of the listed images", cover);
            }
            book.set_cover(cover);
        }

        for section in &self.sections {
            let body = read_text(base_dir, section.content.as_deref(), section.file.as_deref())
                .with_context(|| format!("Section '{}' has no usable body", section.title))?;

            let stylesheet = match &section.stylesheet {
                Some(name) => match stylesheets.get(name) {
                    Some(path) => Some(path.as_str()),
                    None => bail!(
                        "Section '{}' uses unknown stylesheet '{}'",
                        section.title,
                        name
                    ),
                },
                None => None,
            };

            book.add_section(&section.title, &body, section.filename.as_deref(), stylesheet)?;
        }

        Ok(book)
    }
}

fn read_text(base_dir: &Path, content: Option<&str>, file: Option<&str>) -> Result<String> {
    match (content, file) {
        (Some(content), None) => Ok(content.to_string()),
        (None, Some(file)) => {
            let path = base_dir.join(file);
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))
        }
        (Some(_), Some(_)) => bail!("`content` and `file` are mutually exclusive"),
        (None, None) => bail!("missing `content` or `file`"),
    }
}
