//! Folio Core Library
//!
//! Assembles EPUB 3 files (with an EPUB 2 NCX for older readers) from
//! sections, stylesheets, images and fonts. Content is registered on a
//! [`Book`] without any I/O; a single write resolves resource bytes, builds the
//! package and navigation documents and serializes the container.
//!
//! ```no_run
//! use folio_core::Book;
//!
//! let mut book = Book::new("My title");
//! book.set_author("Hingle McCringleberry");
//!
//! let css = book.add_stylesheet("h1 { text-align: center; }", Some("epub.css"))?;
//! let img = book.add_image("https://golang.org/doc/gopher/gophercolor16x16.png", None)?;
//! book.add_section(
//!     "Section 1",
//!     &format!("<h1>Section 1</h1><img src=\"{}\" alt=\"gopher\"/>", img),
//!     None,
//!     Some(&css),
//! )?;
//!
//! book.write("My EPUB.epub")?;
//! # Ok::<(), folio_core::FolioError>(())
//! ```

pub mod encoder;
pub mod error;
pub mod fetch;
pub mod types;

pub use encoder::EpubEncoder;
pub use error::{FetchError, FolioError, Result, SerializationError};
pub use fetch::{Fetcher, MemoryFetcher, SourceFetcher};
pub use types::{
    Book, BookState, Metadata, ReadingDirection, Resource, ResourceKind, ResourceRegistry,
    ResourceSource, Section, SectionStore, SourceRef, TocEntry,
};
