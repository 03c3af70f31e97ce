//! Section documents

use super::{write_text_element, XmlWriter};
use crate::error::SerializationError;
use crate::types::XhtmlShell;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

const NS_XHTML: &str = "http://www.w3.org/1999/xhtml";
const NS_OPS: &str = "http://www.idpf.org/2007/ops";

impl XhtmlShell {
    /// Render the full document; the body fragment is copied as-is
    pub fn to_xhtml(&self, language: &str) -> Result<String, SerializationError> {
        let mut writer = XmlWriter::new()?;
        writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;

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
        write_text_element(&mut writer, "title", &[], &self.title)?;
        if let Some(ref stylesheet) = self.stylesheet {
            let mut link = BytesStart::new("link");
            link.push_attribute(("rel", "stylesheet"));
            link.push_attribute(("type", "text/css"));
            link.push_attribute(("href", stylesheet.as_str()));
            writer.write_event(Event::Empty(link))?;
        }
        writer.write_event(Event::End(BytesEnd::new("head")))?;

        writer.write_event(Event::Start(BytesStart::new("body")))?;
        writer.write_raw(&format!("\n{}\n", self.body))?;
        writer.write_event(Event::End(BytesEnd::new("body")))?;

        writer.write_event(Event::End(BytesEnd::new("html")))?;
        Ok(writer.finish())
    }
}
