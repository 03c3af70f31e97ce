//! Tables of contents: the EPUB 2 NCX nav map and the EPUB 3 navigation document

use super::{write_text_element, XmlWriter};
use crate::error::SerializationError;
use crate::types::{Metadata, SectionStore, TocEntry};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

const NS_NCX: &str = "http://www.daisy.org/z3986/2005/ncx/";
const NS_XHTML: &str = "http://www.w3.org/1999/xhtml";
const NS_OPS: &str = "http://www.idpf.org/2007/ops";

/// Both tables of contents, projected from the same section snapshot
#[derive(Debug, Clone)]
pub struct TableOfContents<'a> {
    metadata: &'a Metadata,
    pub entries: Vec<TocEntry>,
}

impl<'a> TableOfContents<'a> {
    pub fn build(metadata: &'a Metadata, sections: &SectionStore) -> Self {
        Self {
            metadata,
            entries: TocEntry::from_sections(sections),
        }
    }

    /// Render `toc.ncx`
    pub fn to_ncx(&self) -> Result<String, SerializationError> {
        let mut writer = XmlWriter::new()?;

        let mut ncx = BytesStart::new("ncx");
        ncx.push_attribute(("xmlns", NS_NCX));
        ncx.push_attribute(("version", "2005-1"));
        writer.write_event(Event::Start(ncx))?;

        writer.write_event(Event::Start(BytesStart::new("head")))?;
        let urn = self.metadata.urn();
        for (name, content) in [
            ("dtb:uid", urn.as_str()),
            ("dtb:depth", "1"),
            ("dtb:totalPageCount", "0"),
            ("dtb:maxPageNumber", "0"),
        ] {
            let mut meta = BytesStart::new("meta");
            meta.push_attribute(("name", name));
            meta.push_attribute(("content", content));
            writer.write_event(Event::Empty(meta))?;
        }
        writer.write_event(Event::End(BytesEnd::new("head")))?;

        writer.write_event(Event::Start(BytesStart::new("docTitle")))?;
        write_text_element(&mut writer, "text", &[], &self.metadata.title)?;
        writer.write_event(Event::End(BytesEnd::new("docTitle")))?;

        writer.write_event(Event::Start(BytesStart::new("navMap")))?;
        for entry in &self.entries {
            let id = format!("navPoint-{}", entry.play_order);
            let play_order = entry.play_order.to_string();

            let mut nav_point = BytesStart::new("navPoint");
            nav_point.push_attribute(("id", id.as_str()));
            nav_point.push_attribute(("playOrder", play_order.as_str()));
            writer.write_event(Event::Start(nav_point))?;

            writer.write_event(Event::Start(BytesStart::new("navLabel")))?;
            write_text_element(&mut writer, "text", &[], &entry.title)?;
            writer.write_event(Event::End(BytesEnd::new("navLabel")))?;

            let mut content = BytesStart::new("content");
            content.push_attribute(("src", entry.href.as_str()));
            writer.write_event(Event::Empty(content))?;

            writer.write_event(Event::End(BytesEnd::new("navPoint")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("navMap")))?;

        writer.write_event(Event::End(BytesEnd::new("ncx")))?;
        Ok(writer.finish())
    }

    /// Render `nav.xhtml`
    pub fn to_nav(&self) -> Result<String, SerializationError> {
        let mut writer = XmlWriter::new()?;
        writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;

        let language = self.metadata.language.as_str();
        let mut html = BytesStart::new("html");
        html.push_attribute(("xmlns", NS_XHTML));
        html.push_attribute(("xmlns:epub", NS_OPS));
        html.push_attribute(("lang", language));
        html.push_attribute(("xml:lang", language));
        writer.write_event(Event::Start(html))?;

        writer.write_event(Event::Start(BytesStart::new("head")))?;
        let mut charset = BytesStart::new("meta");
        charset.push_attribute(("charset", "UTF-8"));
        writer.write_event(Event::Empty(charset))?;
        write_text_element(&mut writer, "title", &[], &self.metadata.title)?;
        writer.write_event(Event::End(BytesEnd::new("head")))?;

        writer.write_event(Event::Start(BytesStart::new("body")))?;
        let mut nav = BytesStart::new("nav");
        nav.push_attribute(("epub:type", "toc"));
        writer.write_event(Event::Start(nav))?;
        write_text_element(&mut writer, "h1", &[], &self.metadata.title)?;

        writer.write_event(Event::Start(BytesStart::new("ol")))?;
        for entry in &self.entries {
            writer.write_event(Event::Start(BytesStart::new("li")))?;
            write_text_element(&mut writer, "a", &[("href", entry.href.as_str())], &entry.title)?;
            writer.write_event(Event::End(BytesEnd::new("li")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("ol")))?;

        writer.write_event(Event::End(BytesEnd::new("nav")))?;
        writer.write_event(Event::End(BytesEnd::new("body")))?;
        writer.write_event(Event::End(BytesEnd::new("html")))?;
        Ok(writer.finish())
    }
}
