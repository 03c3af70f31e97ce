//! Resource management for embedded assets (images, stylesheets, fonts)

use super::namespace::{encode_segment, Namespace};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// The kind of a resource; each kind is its own filename namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Image,
    Stylesheet,
    Font,
}

impl ResourceKind {
    /// All kinds, in the order they are packaged
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Image,
        ResourceKind::Stylesheet,
        ResourceKind::Font,
    ];

    /// Folder under the package directory holding this kind
    pub fn folder(self) -> &'static str {
        match self {
            ResourceKind::Image => "img",
            ResourceKind::Stylesheet => "css",
            ResourceKind::Font => "font",
        }
    }

    /// Prefix of generated filenames
    fn name_prefix(self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Stylesheet => "css",
            ResourceKind::Font => "font",
        }
    }

    /// Prefix of manifest identifiers
    fn id_prefix(self) -> &'static str {
        match self {
            ResourceKind::Image => "img",
            ResourceKind::Stylesheet => "css",
            ResourceKind::Font => "font",
        }
    }

    fn namespace(self) -> &'static str {
        match self {
            ResourceKind::Image => "images",
            ResourceKind::Stylesheet => "stylesheets",
            ResourceKind::Font => "fonts",
        }
    }
}

/// Where the bytes of an external resource live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// A file on the local filesystem
    Local(PathBuf),

    /// An http(s) URL
    Remote(Url),
}

impl SourceRef {
    /// Interpret a caller-supplied locator.
    ///
    /// `http` and `https` URLs are remote, `file` URLs become paths, anything
    /// else is taken as a local path.
    pub fn parse(locator: &str) -> Self {
        match Url::parse(locator) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => SourceRef::Remote(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(SourceRef::Local)
                .unwrap_or_else(|_| SourceRef::Local(PathBuf::from(locator))),
            _ => SourceRef::Local(PathBuf::from(locator)),
        }
    }

    /// File extension including the leading dot, if the locator has one
    pub fn extension(&self) -> Option<String> {
        let ext = match self {
            SourceRef::Local(path) => path.extension(),
            SourceRef::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .and_then(|last| Path::new(last).extension()),
        };
        ext.and_then(|e| e.to_str()).map(|e| format!(".{}", e))
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Local(path) => write!(f, "{}", path.display()),
            SourceRef::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// How resource data is obtained at write time
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceSource {
    /// Data supplied directly by the caller
    Inline(Vec<u8>),

    /// Data retrieved through a fetcher when the book is written
    External(SourceRef),
}

impl ResourceSource {
    fn extension(&self) -> Option<String> {
        match self {
            ResourceSource::Inline(_) => None,
            ResourceSource::External(source) => source.extension(),
        }
    }
}

/// A single registered resource
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    kind: ResourceKind,
    filename: String,
    source: ResourceSource,
    position: usize,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn source(&self) -> &ResourceSource {
        &self.source
    }

    /// Manifest identifier, unique across the whole package
    pub fn manifest_id(&self) -> String {
        format!("{}{:04}", self.kind.id_prefix(), self.position)
    }

    /// Reference relative to the package document, percent-encoded
    pub fn href(&self) -> String {
        format!("{}/{}", self.kind.folder(), encode_segment(&self.filename))
    }

    /// Entry name relative to the package directory, unencoded
    pub fn archive_path(&self) -> String {
        format!("{}/{}", self.kind.folder(), self.filename)
    }

    /// Path relative to a section document
    pub fn relative_path(&self) -> String {
        format!("../{}", self.href())
    }
}

/// Registry of every named resource, one namespace per kind
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    images: Namespace<Resource>,
    stylesheets: Namespace<Resource>,
    fonts: Namespace<Resource>,
}

impl ResourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            images: Namespace::new(ResourceKind::Image.namespace()),
            stylesheets: Namespace::new(ResourceKind::Stylesheet.namespace()),
            fonts: Namespace::new(ResourceKind::Font.namespace()),
        }
    }

    fn namespace(&self, kind: ResourceKind) -> &Namespace<Resource> {
        match kind {
            ResourceKind::Image => &self.images,
            ResourceKind::Stylesheet => &self.stylesheets,
            ResourceKind::Font => &self.fonts,
        }
    }

    fn namespace_mut(&mut self, kind: ResourceKind) -> &mut Namespace<Resource> {
        match kind {
            ResourceKind::Image => &mut self.images,
            ResourceKind::Stylesheet => &mut self.stylesheets,
            ResourceKind::Font => &mut self.fonts,
        }
    }

    /// Register a resource, returning the path a section uses to reference it.
    ///
    /// A missing or empty `filename` is replaced by `<prefix><seq><ext>`, where
    /// `seq` counts resources of this kind only. Fails with
    /// [`FolioError::DuplicateFilename`](crate::FolioError::DuplicateFilename)
    /// if the name is already taken within the kind, and with
    /// [`FolioError::InvalidFilename`](crate::FolioError::InvalidFilename) if
    /// it contains a path separator or is `.`/`..`.
    pub fn add(
        &mut self,
        kind: ResourceKind,
        source: ResourceSource,
        filename: Option<&str>,
    ) -> Result<String> {
        let namespace = self.namespace_mut(kind);

        let filename = match filename.filter(|name| !name.is_empty()) {
            Some(name) => name.to_string(),
            None => {
                let extension = match kind {
                    ResourceKind::Stylesheet => ".css".to_string(),
                    _ => source.extension().unwrap_or_default(),
                };
                namespace.next_filename(kind.name_prefix(), &extension)
            }
        };

        let resource = Resource {
            kind,
            filename: filename.clone(),
            source,
            position: namespace.len() + 1,
        };

        let resource = namespace.insert(filename, resource)?;
        Ok(resource.relative_path())
    }

    /// Get a resource by kind and filename
    pub fn get(&self, kind: ResourceKind, filename: &str) -> Option<&Resource> {
        self.namespace(kind).get(filename)
    }

    /// Whether a filename is taken within a kind
    pub fn contains(&self, kind: ResourceKind, filename: &str) -> bool {
        self.namespace(kind).contains(filename)
    }

    /// Iterate over the resources of one kind in insertion order
    pub fn iter(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.namespace(kind).iter()
    }

    /// Iterate over every resource, grouped by kind
    pub fn iter_all(&self) -> impl Iterator<Item = &Resource> {
        ResourceKind::ALL
            .into_iter()
            .flat_map(move |kind| self.namespace(kind).iter())
    }

    /// Number of resources of one kind
    pub fn len(&self, kind: ResourceKind) -> usize {
        self.namespace(kind).len()
    }

    /// Check if the registry holds no resources at all
    pub fn is_empty(&self) -> bool {
        ResourceKind::ALL
            .into_iter()
            .all(|kind| self.namespace(kind).is_empty())
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn external(locator: &str) -> ResourceSource {
        ResourceSource::External(SourceRef::parse(locator))
    }

    #[test]
    fn test_stylesheet_names() {
        let mut registry = ResourceRegistry::new();
        let css = ResourceSource::Inline(b"h1 { text-align: center; }".to_vec());

        let first = registry
            .add(ResourceKind::Stylesheet, css.clone(), Some("epub.css"))
            .unwrap();
        let second = registry.add(ResourceKind::Stylesheet, css, None).unwrap();

        assert_eq!(first, "../css/epub.css");
        assert_eq!(second, "../css/css0002.css");
    }

    #[test]
    fn test_image_names() {
        let mut registry = ResourceRegistry::new();

        let local = registry
            .add(
                ResourceKind::Image,
                external("testdata/gophercolor16x16.png"),
                Some("go-gopher.png"),
            )
            .unwrap();
        let remote = registry
            .add(
                ResourceKind::Image,
                external("https://golang.org/doc/gopher/gophercolor16x16.png"),
                Some(""),
            )
            .unwrap();

        assert_eq!(local, "../img/go-gopher.png");
        assert_eq!(remote, "../img/image0002.png");
    }

    #[test]
    fn test_kinds_are_independent_namespaces() {
        let mut registry = ResourceRegistry::new();
        registry
            .add(ResourceKind::Image, external("a.png"), Some("shared"))
            .unwrap();
        registry
            .add(ResourceKind::Font, external("a.ttf"), Some("shared"))
            .unwrap();

        // Counters are per kind
        let font = registry.add(ResourceKind::Font, external("b.otf"), None).unwrap();
        let image = registry.add(ResourceKind::Image, external("b.gif"), None).unwrap();
        assert_eq!(font, "../font/font0002.otf");
        assert_eq!(image, "../img/image0002.gif");
    }

    #[test]
    fn test_duplicate_filename_leaves_registry_unchanged() {
        let mut registry = ResourceRegistry::new();
        registry
            .add(ResourceKind::Image, external("cover.jpg"), Some("cover.jpg"))
            .unwrap();

        let err = registry
            .add(ResourceKind::Image, external("other.jpg"), Some("cover.jpg"))
            .unwrap_err();
        assert!(err.is_duplicate_filename());
        assert_eq!(registry.len(ResourceKind::Image), 1);
        assert_eq!(
            registry
                .get(ResourceKind::Image, "cover.jpg")
                .map(|r| r.source().clone()),
            Some(external("cover.jpg"))
        );

        let next = registry.add(ResourceKind::Image, external("x.jpg"), None).unwrap();
        assert_eq!(next, "../img/image0002.jpg");
    }

    #[test]
    fn test_generated_name_collision_is_reported() {
        let mut registry = ResourceRegistry::new();
        registry
            .add(ResourceKind::Image, external("a.png"), Some("image0002.png"))
            .unwrap();

        let err = registry
            .add(ResourceKind::Image, external("b.png"), None)
            .unwrap_err();
        assert!(err.is_duplicate_filename());
    }

    #[test]
    fn test_source_parsing() {
        assert!(matches!(
            SourceRef::parse("https://example.com/a.png"),
            SourceRef::Remote(_)
        ));
        assert_eq!(
            SourceRef::parse("images/a.png"),
            SourceRef::Local(PathBuf::from("images/a.png"))
        );
        assert_eq!(
            SourceRef::parse("https://example.com/img/photo.jpeg?size=large#top").extension(),
            Some(".jpeg".to_string())
        );
        assert_eq!(SourceRef::parse("https://example.com/").extension(), None);
        assert_eq!(SourceRef::parse("noext").extension(), None);
    }

    #[test]
    fn test_manifest_ids_and_hrefs() {
        let mut registry = ResourceRegistry::new();
        registry
            .add(ResourceKind::Font, external("fonts/serif.woff2"), None)
            .unwrap();

        let font = registry.iter(ResourceKind::Font).next().unwrap();
        assert_eq!(font.manifest_id(), "font0001");
        assert_eq!(font.href(), "font/font0001.woff2");
        assert_eq!(font.relative_path(), "../font/font0001.woff2");
    }

    #[test]
    fn test_filename_cannot_leave_its_folder() {
        let mut registry = ResourceRegistry::new();

        let err = registry
            .add(ResourceKind::Image, external("a.png"), Some("../../evil.png"))
            .unwrap_err();
        assert!(matches!(err, crate::FolioError::InvalidFilename { .. }));
        assert!(registry
            .add(ResourceKind::Font, external("a.ttf"), Some("fonts/a.ttf"))
            .is_err());
        assert!(registry.is_empty());

        let next = registry
            .add(ResourceKind::Image, external("a.png"), None)
            .unwrap();
        assert_eq!(next, "../img/image0001.png");
    }

    #[test]
    fn test_href_is_percent_encoded() {
        let mut registry = ResourceRegistry::new();
        let path = registry
            .add(ResourceKind::Image, external("a.png"), Some("my cover #1.png"))
            .unwrap();
        assert_eq!(path, "../img/my%20cover%20%231.png");

        let image = registry.get(ResourceKind::Image, "my cover #1.png").unwrap();
        assert_eq!(image.href(), "img/my%20cover%20%231.png");
        assert_eq!(image.archive_path(), "img/my cover #1.png");
    }
}
