//! Table of contents types

use super::SectionStore;

/// A single entry in the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Display title
    pub title: String,

    /// Target path relative to the package document
    pub href: String,

    /// 1-based sequential play order
    pub play_order: usize,
}

impl TocEntry {
    /// Project every section, in reading order, into a TOC entry
    pub fn from_sections(sections: &SectionStore) -> Vec<TocEntry> {
        sections
            .iter()
            .enumerate()
            .map(|(index, section)| TocEntry {
                title: section.title().to_string(),
                href: section.href(),
                play_order: index + 1,
            })
            .collect()
    }
}
