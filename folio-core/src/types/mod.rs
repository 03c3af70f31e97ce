//! Core types: the Book aggregate and the stores it owns

mod book;
mod metadata;
mod namespace;
mod resource;
mod section;
mod toc;

pub use book::{Book, BookState};
pub use metadata::{Metadata, ReadingDirection, DEFAULT_LANGUAGE, URN_UUID_PREFIX};
pub use resource::{Resource, ResourceKind, ResourceRegistry, ResourceSource, SourceRef};
pub use section::{Section, SectionStore, XhtmlShell, SECTION_FOLDER};
pub use toc::TocEntry;
