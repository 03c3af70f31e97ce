//! Derived documents and the EPUB container serializer

mod epub;
pub mod media_type;
mod package;
mod toc;
mod xhtml;

pub use epub::EpubEncoder;
pub(crate) use epub::write_atomically;
pub use package::{ManifestEntry, PackageDocument, SpineItemRef, NAV_ID, NCX_ID};
pub use toc::TableOfContents;

use crate::error::SerializationError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// First archive entry, stored uncompressed
pub const MIMETYPE_PATH: &str = "mimetype";
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Directory holding the package document and all content
pub const CONTENT_DIR: &str = "OEBPS";
pub const PACKAGE_FILENAME: &str = "package.opf";
pub const NCX_FILENAME: &str = "toc.ncx";
pub const NAV_FILENAME: &str = "nav.xhtml";

/// Indented XML writer that starts every document with an XML declaration
pub(crate) struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub(crate) fn new() -> Result<Self, SerializationError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { writer })
    }

    pub(crate) fn write_event(&mut self, event: Event<'_>) -> Result<(), SerializationError> {
        self.writer.write_event(event)?;
        Ok(())
    }

    /// Write markup without escaping it
    pub(crate) fn write_raw(&mut self, markup: &str) -> Result<(), SerializationError> {
        self.write_event(Event::Text(BytesText::from_escaped(markup)))
    }

    pub(crate) fn finish(self) -> String {
        let bytes = self.writer.into_inner().into_inner();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Write a simple text element
pub(crate) fn write_text_element(
    writer: &mut XmlWriter,
    name: &str,
    attributes: &[(&str, &str)],
    content: &str,
) -> Result<(), SerializationError> {
    let mut elem = BytesStart::new(name);
    for &attribute in attributes {
        elem.push_attribute(attribute);
    }
    writer.write_event(Event::Start(elem))?;
    writer.write_event(Event::Text(BytesText::new(content)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
