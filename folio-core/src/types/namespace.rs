//! Filename namespaces: a uniqueness set paired with an ordered sequence

use crate::error::{FolioError, Result};
use std::collections::HashSet;
use url::Url;

/// Whether `filename` names a single entry inside its folder.
///
/// Separators, `.` and `..` would move the entry out of the folder the
/// returned paths point into.
fn is_plain_filename(filename: &str) -> bool {
    let trimmed = filename.trim();
    !trimmed.is_empty()
        && trimmed != "."
        && trimmed != ".."
        && !filename.contains(['/', '\\'])
}

/// Percent-encode a filename for use as one segment of an href
pub(crate) fn encode_segment(filename: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return filename.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(filename);
    }
    url.path().trim_start_matches('/').to_string()
}

/// An append-only, insertion-ordered collection of items keyed by filename.
///
/// Lookups go through the set; iteration always follows the vector, so output
/// order never depends on hashing.
#[derive(Debug, Clone)]
pub(crate) struct Namespace<T> {
    name: &'static str,
    filenames: HashSet<String>,
    items: Vec<(String, T)>,
}

impl<T> Namespace<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            filenames: HashSet::new(),
            items: Vec::new(),
        }
    }

    /// The filename that would be generated for the next unnamed insert
    pub(crate) fn next_filename(&self, prefix: &str, extension: &str) -> String {
        format!("{}{:04}{}", prefix, self.items.len() + 1, extension)
    }

    /// Insert an item, failing without side effects if the filename is taken
    /// or does not name a plain file
    pub(crate) fn insert(&mut self, filename: String, item: T) -> Result<&T> {
        if !is_plain_filename(&filename) {
            return Err(FolioError::InvalidFilename {
                namespace: self.name,
                filename,
            });
        }
        if self.filenames.contains(&filename) {
            return Err(FolioError::DuplicateFilename {
                namespace: self.name,
                filename,
            });
        }

        self.filenames.insert(filename.clone());
        self.items.push((filename, item));
        Ok(&self.items[self.items.len() - 1].1)
    }

    pub(crate) fn get(&self, filename: &str) -> Option<&T> {
        if !self.filenames.contains(filename) {
            return None;
        }
        self.items
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, item)| item)
    }

    pub(crate) fn contains(&self, filename: &str) -> bool {
        self.filenames.contains(filename)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(_, item)| item)
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order() {
        let mut ns = Namespace::new("test");
        ns.insert("b".to_string(), 2).unwrap();
        ns.insert("a".to_string(), 1).unwrap();
        ns.insert("c".to_string(), 3).unwrap();

        let values: Vec<_> = ns.iter().copied().collect();
        assert_eq!(values, vec![2, 1, 3]);
        assert_eq!(ns.get("a"), Some(&1));
    }

    #[test]
    fn test_duplicate_leaves_namespace_unchanged() {
        let mut ns = Namespace::new("images");
        ns.insert("x.png".to_string(), 1).unwrap();

        let err = ns.insert("x.png".to_string(), 2).unwrap_err();
        assert!(err.is_duplicate_filename());
        assert!(err.to_string().contains("images"));
        assert_eq!(ns.len(), 1);
        assert_eq!(ns.get("x.png"), Some(&1));
        assert_eq!(ns.next_filename("image", ".png"), "image0002.png");
    }

    #[test]
    fn test_path_like_names_are_rejected() {
        let mut ns = Namespace::new("images");
        for name in ["../../evil.png", "sub/x.png", "sub\\x.png", "..", ".", "   "] {
            let err = ns.insert(name.to_string(), 0).unwrap_err();
            assert!(
                matches!(err, FolioError::InvalidFilename { namespace: "images", .. }),
                "{name} was accepted"
            );
        }
        assert!(ns.is_empty());
        assert_eq!(ns.next_filename("image", ".png"), "image0001.png");

        ns.insert("..hidden.png".to_string(), 1).unwrap();
        assert_eq!(ns.len(), 1);
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("go-gopher.png"), "go-gopher.png");
        assert_eq!(encode_segment("my cover #1.png"), "my%20cover%20%231.png");
        assert_eq!(encode_segment("100%.css"), "100%25.css");
    }
}
