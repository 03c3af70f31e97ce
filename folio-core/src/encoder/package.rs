//! Package document (`package.opf`): metadata, manifest and spine

use super::{media_type, write_text_element, XmlWriter, NAV_FILENAME, NCX_FILENAME};
use crate::error::{FolioError, Result, SerializationError};
use crate::types::{Metadata, ResourceKind, ResourceRegistry, SectionStore};
use quick_xml::events::{BytesEnd, BytesStart, Event};

const NS_OPF: &str = "http://www.idpf.org/2007/opf";
const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
const IDENTIFIER_ID: &str = "pub-id";

pub const NCX_ID: &str = "ncx";
pub const NAV_ID: &str = "nav";

/// One file listed in the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: String,
    pub href: String,
    pub media_type: &'static str,
    pub properties: Option<&'static str>,
}

/// Reference from the spine to a manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineItemRef {
    pub idref: String,
}

/// The package document, built from a snapshot of the book
#[derive(Debug, Clone)]
pub struct PackageDocument<'a> {
    metadata: &'a Metadata,
    cover_id: Option<String>,
    pub manifest: Vec<ManifestEntry>,
    pub spine: Vec<SpineItemRef>,
}

impl<'a> PackageDocument<'a> {
    /// Build the manifest and spine.
    ///
    /// Fails if a file has no known media type, if the cover names an
    /// unregistered image, or if there are no sections to put in the spine.
    pub fn build(
        metadata: &'a Metadata,
        resources: &ResourceRegistry,
        sections: &SectionStore,
    ) -> Result<Self> {
        if sections.is_empty() {
            return Err(FolioError::EmptySpine);
        }

        let cover_id = match &metadata.cover_image {
            Some(filename) => Some(
                resources
                    .get(ResourceKind::Image, filename)
                    .ok_or_else(|| FolioError::UnknownCover(filename.clone()))?
                    .manifest_id(),
            ),
            None => None,
        };

        let mut manifest = vec![
            ManifestEntry {
                id: NCX_ID.to_string(),
                href: NCX_FILENAME.to_string(),
                media_type: media_type::NCX,
                properties: None,
            },
            ManifestEntry {
                id: NAV_ID.to_string(),
                href: NAV_FILENAME.to_string(),
                media_type: media_type::XHTML,
                properties: Some("nav"),
            },
        ];

        for resource in resources.iter_all() {
            let id = resource.manifest_id();
            let properties = if cover_id.as_deref() == Some(id.as_str()) {
                Some("cover-image")
            } else {
                None
            };
            manifest.push(ManifestEntry {
                media_type: media_type::for_filename(resource.filename())?,
                href: resource.href(),
                id,
                properties,
            });
        }

        for section in sections.iter() {
            manifest.push(ManifestEntry {
                id: section.manifest_id(),
                href: section.href(),
                media_type: media_type::for_filename(section.filename())?,
                properties: None,
            });
        }

        let spine = sections
            .iter()
            .map(|section| SpineItemRef {
                idref: section.manifest_id(),
            })
            .collect();

        Ok(Self {
            metadata,
            cover_id,
            manifest,
            spine,
        })
    }

    /// Render as XML
    pub fn to_xml(&self) -> std::result::Result<String, SerializationError> {
        let mut writer = XmlWriter::new()?;
        let metadata = self.metadata;

        let mut package = BytesStart::new("package");
        package.push_attribute(("xmlns", NS_OPF));
        package.push_attribute(("version", "3.0"));
        package.push_attribute(("unique-identifier", IDENTIFIER_ID));
        package.push_attribute(("xml:lang", metadata.language.as_str()));
        writer.write_event(Event::Start(package))?;

        let mut meta = BytesStart::new("metadata");
        meta.push_attribute(("xmlns:dc", NS_DC));
        writer.write_event(Event::Start(meta))?;

        write_text_element(
            &mut writer,
            "dc:identifier",
            &[("id", IDENTIFIER_ID)],
            &metadata.urn(),
        )?;
        write_text_element(&mut writer, "dc:title", &[], &metadata.title)?;
        write_text_element(&mut writer, "dc:language", &[], &metadata.language)?;
        if !metadata.author.is_empty() {
            write_text_element(&mut writer, "dc:creator", &[("id", "creator")], &metadata.author)?;
        }
        if let Some(ref description) = metadata.description {
            write_text_element(&mut writer, "dc:description", &[], description)?;
        }
        write_text_element(
            &mut writer,
            "meta",
            &[("property", "dcterms:modified")],
            &metadata.modified_timestamp(),
        )?;

        // EPUB 2 readers find the cover through this element
        if let Some(ref cover_id) = self.cover_id {
            let mut elem = BytesStart::new("meta");
            elem.push_attribute(("name", "cover"));
            elem.push_attribute(("content", cover_id.as_str()));
            writer.write_event(Event::Empty(elem))?;
        }
        writer.write_event(Event::End(BytesEnd::new("metadata")))?;

        writer.write_event(Event::Start(BytesStart::new("manifest")))?;
        for entry in &self.manifest {
            let mut item = BytesStart::new("item");
            item.push_attribute(("id", entry.id.as_str()));
            item.push_attribute(("href", entry.href.as_str()));
            item.push_attribute(("media-type", entry.media_type));
            if let Some(properties) = entry.properties {
                item.push_attribute(("properties", properties));
            }
            writer.write_event(Event::Empty(item))?;
        }
        writer.write_event(Event::End(BytesEnd::new("manifest")))?;

        let mut spine = BytesStart::new("spine");
        spine.push_attribute(("toc", NCX_ID));
        spine.push_attribute((
            "page-progression-direction",
            metadata.reading_direction.as_attribute(),
        ));
        writer.write_event(Event::Start(spine))?;
        for item in &self.spine {
            let mut itemref = BytesStart::new("itemref");
            itemref.push_attribute(("idref", item.idref.as_str()));
            writer.write_event(Event::Empty(itemref))?;
        }
        writer.write_event(Event::End(BytesEnd::new("spine")))?;

        writer.write_event(Event::End(BytesEnd::new("package")))?;
        Ok(writer.finish())
    }
}
