//! Sections (chapters) and the store that keeps them in reading order

use super::namespace::{encode_segment, Namespace};
use crate::error::Result;

/// Minimal XHTML document wrapped around a caller-supplied body fragment.
///
/// The fragment is inserted verbatim; it is not parsed or validated.
#[derive(Debug, Clone, PartialEq)]
pub struct XhtmlShell {
    /// Document title (`<title>`)
    pub title: String,

    /// Markup placed between the `<body>` tags
    pub body: String,

    /// Stylesheet linked from `<head>`, relative to the section
    pub stylesheet: Option<String>,
}

/// A single section of a book
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    filename: String,
    title: String,
    shell: XhtmlShell,
    position: usize,
}

impl Section {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Title shown in the tables of contents
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn shell(&self) -> &XhtmlShell {
        &self.shell
    }

    /// 1-based position in reading order
    pub fn position(&self) -> usize {
        self.position
    }

    /// Manifest identifier, also used by the spine
    pub fn manifest_id(&self) -> String {
        format!("sec{:04}", self.position)
    }

    /// Reference relative to the package document, shared by manifest and
    /// tables of contents
    pub fn href(&self) -> String {
        format!("{}/{}", SECTION_FOLDER, encode_segment(&self.filename))
    }

    /// Entry name relative to the package directory, unencoded
    pub fn archive_path(&self) -> String {
        format!("{}/{}", SECTION_FOLDER, self.filename)
    }
}

/// Folder under the package directory holding section documents
pub const SECTION_FOLDER: &str = "xhtml";

/// Sections in insertion order
#[derive(Debug, Clone)]
pub struct SectionStore {
    sections: Namespace<Section>,
}

impl SectionStore {
    pub fn new() -> Self {
        Self {
            sections: Namespace::new("sections"),
        }
    }

    /// Append a section and return its filename.
    ///
    /// Sibling sections link to each other by this bare filename. Names with
    /// path separators, `.` or `..` are rejected.
    pub fn add(
        &mut self,
        title: &str,
        content: &str,
        filename: Option<&str>,
        stylesheet: Option<&str>,
    ) -> Result<String> {
        let filename = match filename.filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None => self.sections.next_filename("section", ".xhtml"),
        };

        let section = Section {
            filename: filename.clone(),
            title: title.to_string(),
            shell: XhtmlShell {
                title: title.to_string(),
                body: content.to_string(),
                stylesheet: stylesheet
                    .filter(|href| !href.is_empty())
                    .map(str::to_string),
            },
            position: self.sections.len() + 1,
        };

        let section = self.sections.insert(filename, section)?;
        Ok(section.filename.clone())
    }

    pub fn get(&self, filename: &str) -> Option<&Section> {
        self.sections.get(filename)
    }

    /// Iterate over sections in reading order
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Default for SectionStore {
    fn default() -> Self {
        Self::new()
    }
}
