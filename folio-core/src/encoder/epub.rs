//! EPUB container serializer

use super::{
    media_type, PackageDocument, TableOfContents, XmlWriter, CONTAINER_PATH, CONTENT_DIR,
    MIMETYPE_PATH, NAV_FILENAME, NCX_FILENAME, PACKAGE_FILENAME,
};
use crate::error::{FetchError, Result, SerializationError};
use crate::fetch::Fetcher;
use crate::types::{Book, Resource, ResourceSource};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const NS_CONTAINER: &str = "urn:oasis:names:tc:opendocument:xmlns:container";

/// Encoder for EPUB 3 with an EPUB 2 NCX
#[derive(Debug, Clone)]
pub struct EpubEncoder {
    compression: CompressionMethod,
}

impl EpubEncoder {
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }

    /// Compression used for every entry after `mimetype`
    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    /// Encode a book into a complete archive held in memory.
    ///
    /// Nothing is returned unless every document builds and every resource
    /// resolves.
    pub fn encode(&self, book: &Book, fetcher: &dyn Fetcher) -> Result<Vec<u8>> {
        let metadata = book.metadata();
        let package = PackageDocument::build(metadata, book.resources(), book.sections())?;
        let toc = TableOfContents::build(metadata, book.sections());

        let mut entries = vec![
            (
                format!("{}/{}", CONTENT_DIR, PACKAGE_FILENAME),
                package.to_xml()?.into_bytes(),
            ),
            (
                format!("{}/{}", CONTENT_DIR, NCX_FILENAME),
                toc.to_ncx()?.into_bytes(),
            ),
            (
                format!("{}/{}", CONTENT_DIR, NAV_FILENAME),
                toc.to_nav()?.into_bytes(),
            ),
        ];

        let mut sections = Vec::with_capacity(book.sections().len());
        for section in book.sections().iter() {
            let xhtml = section.shell().to_xhtml(&metadata.language)?;
            sections.push((
                format!("{}/{}", CONTENT_DIR, section.archive_path()),
                xhtml.into_bytes(),
            ));
        }

        for resource in book.resources().iter_all() {
            let data = resolve(resource, fetcher)?;
            tracing::debug!("Resolved {} ({} bytes)", resource.href(), data.len());
            entries.push((format!("{}/{}", CONTENT_DIR, resource.archive_path()), data));
        }
        entries.extend(sections);

        Ok(self.write_archive(&entries)?)
    }

    fn write_archive(
        &self,
        entries: &[(String, Vec<u8>)],
    ) -> std::result::Result<Vec<u8>, SerializationError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let compressed = SimpleFileOptions::default().compression_method(self.compression);

        // mimetype must be first and uncompressed
        zip.start_file(MIMETYPE_PATH, stored)?;
        zip.write_all(media_type::EPUB.as_bytes())?;

        zip.start_file(CONTAINER_PATH, compressed)?;
        zip.write_all(container_xml()?.as_bytes())?;

        for (path, data) in entries {
            tracing::debug!("Writing {}", path);
            zip.start_file(path.as_str(), compressed)?;
            zip.write_all(data)?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

impl Default for EpubEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// `META-INF/container.xml`, pointing readers at the package document
fn container_xml() -> std::result::Result<String, SerializationError> {
    let mut writer = XmlWriter::new()?;

    let mut container = BytesStart::new("container");
    container.push_attribute(("version", "1.0"));
    container.push_attribute(("xmlns", NS_CONTAINER));
    writer.write_event(Event::Start(container))?;
    writer.write_event(Event::Start(BytesStart::new("rootfiles")))?;

    let full_path = format!("{}/{}", CONTENT_DIR, PACKAGE_FILENAME);
    let mut rootfile = BytesStart::new("rootfile");
    rootfile.push_attribute(("full-path", full_path.as_str()));
    rootfile.push_attribute(("media-type", media_type::PACKAGE));
    writer.write_event(Event::Empty(rootfile))?;

    writer.write_event(Event::End(BytesEnd::new("rootfiles")))?;
    writer.write_event(Event::End(BytesEnd::new("container")))?;
    Ok(writer.finish())
}

fn resolve(resource: &Resource, fetcher: &dyn Fetcher) -> std::result::Result<Vec<u8>, FetchError> {
    match resource.source() {
        ResourceSource::Inline(data) => Ok(data.clone()),
        ResourceSource::External(source) => fetcher.fetch(source).inspect_err(|e| {
            tracing::warn!("Failed to resolve {}: {}", resource.href(), e);
        }),
    }
}

/// Replace `path` with `bytes` via a temporary file in the same directory.
///
/// The destination is either fully written or untouched.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
