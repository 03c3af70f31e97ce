//! The main Book type - the aggregate every operation goes through

use super::{
    Metadata, ReadingDirection, ResourceKind, ResourceRegistry, ResourceSource, SectionStore,
    SourceRef,
};
use crate::encoder::{write_atomically, EpubEncoder};
use crate::error::{FolioError, Result};
use crate::fetch::{Fetcher, SourceFetcher};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::Path;

/// Lifecycle of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    /// Accepting resources and sections
    Building,

    /// Successfully written; no further content or writes are accepted
    Written,
}

/// An EPUB under construction
#[derive(Debug, Clone)]
pub struct Book {
    metadata: Metadata,
    resources: ResourceRegistry,
    sections: SectionStore,
    state: BookState,
}

impl Book {
    /// Create an empty book with a fresh identifier and the default language
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            metadata: Metadata::new(title),
            resources: ResourceRegistry::new(),
            sections: SectionStore::new(),
            state: BookState::Building,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn sections(&self) -> &SectionStore {
        &self.sections
    }

    pub fn state(&self) -> BookState {
        self.state
    }

    fn ensure_building(&self) -> Result<()> {
        match self.state {
            BookState::Building => Ok(()),
            BookState::Written => Err(FolioError::AlreadyWritten),
        }
    }

    /// Add an image from a local path or an http(s) URL.
    ///
    /// Returns the path to use from a section, e.g. `../img/cover.png`. The
    /// bytes are only retrieved when the book is written.
    pub fn add_image(&mut self, source: &str, filename: Option<&str>) -> Result<String> {
        self.ensure_building()?;
        self.resources.add(
            ResourceKind::Image,
            ResourceSource::External(SourceRef::parse(source)),
            filename,
        )
    }

    /// Add a stylesheet from its CSS text, returning e.g. `../css/epub.css`
    pub fn add_stylesheet(&mut self, content: &str, filename: Option<&str>) -> Result<String> {
        self.ensure_building()?;
        self.resources.add(
            ResourceKind::Stylesheet,
            ResourceSource::Inline(content.as_bytes().to_vec()),
            filename,
        )
    }

    /// Add a font from a local path or an http(s) URL, returning e.g. `../font/font0001.ttf`
    pub fn add_font(&mut self, source: &str, filename: Option<&str>) -> Result<String> {
        self.ensure_building()?;
        self.resources.add(
            ResourceKind::Font,
            ResourceSource::External(SourceRef::parse(source)),
            filename,
        )
    }

    /// Add a resource of any kind from an already-built source
    pub fn add_resource(
        &mut self,
        kind: ResourceKind,
        source: ResourceSource,
        filename: Option<&str>,
    ) -> Result<String> {
        self.ensure_building()?;
        self.resources.add(kind, source, filename)
    }

    /// Append a section.
    ///
    /// `content` goes between the `<body>` tags unchanged. `stylesheet` is a
    /// path returned by [`Book::add_stylesheet`]. Sections appear in the
    /// spine and both tables of contents in the order they are added.
    pub fn add_section(
        &mut self,
        title: &str,
        content: &str,
        filename: Option<&str>,
        stylesheet: Option<&str>,
    ) -> Result<String> {
        self.ensure_building()?;
        self.sections.add(title, content, filename, stylesheet)
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = title.into();
    }

    pub fn author(&self) -> &str {
        &self.metadata.author
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.metadata.author = author.into();
    }

    pub fn language(&self) -> &str {
        &self.metadata.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.metadata.language = language.into();
    }

    /// The unique identifier, without the `urn:uuid:` prefix
    pub fn identifier(&self) -> &str {
        &self.metadata.identifier
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.metadata.identifier = identifier.into();
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.metadata.description = Some(description.into());
    }

    pub fn reading_direction(&self) -> ReadingDirection {
        self.metadata.reading_direction
    }

    pub fn set_reading_direction(&mut self, direction: ReadingDirection) {
        self.metadata.reading_direction = direction;
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.metadata.modified
    }

    /// Pin the `dcterms:modified` timestamp instead of using the write time
    pub fn set_modified(&mut self, modified: DateTime<Utc>) {
        self.metadata.modified = Some(modified);
    }

    pub fn cover(&self) -> Option<&str> {
        self.metadata.cover_image.as_deref()
    }

    /// Mark a registered image (by filename) as the cover
    pub fn set_cover(&mut self, filename: impl Into<String>) {
        self.metadata.cover_image = Some(filename.into());
    }

    /// Write the EPUB to `path`, fetching external resources with [`SourceFetcher`]
    pub fn write(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.write_with(path, &SourceFetcher::default())
    }

    /// Write the EPUB to `path` using a caller-supplied fetcher.
    ///
    /// The archive is built in memory and moved into place only once
    /// complete; on error the destination is left untouched.
    pub fn write_with(&mut self, path: impl AsRef<Path>, fetcher: &dyn Fetcher) -> Result<()> {
        self.ensure_building()?;
        let path = path.as_ref();

        let bytes = EpubEncoder::new().encode(self, fetcher)?;
        write_atomically(path, &bytes)?;

        self.state = BookState::Written;
        tracing::info!(
            "Wrote '{}' ({} sections, {} bytes) to {}",
            self.metadata.title,
            self.sections.len(),
            bytes.len(),
            path.display()
        );
        Ok(())
    }

    /// Write the EPUB to any writer
    pub fn write_to(&mut self, writer: &mut dyn Write, fetcher: &dyn Fetcher) -> Result<()> {
        self.ensure_building()?;

        let bytes = EpubEncoder::new().encode(self, fetcher)?;
        writer.write_all(&bytes)?;

        self.state = BookState::Written;
        Ok(())
    }
}
