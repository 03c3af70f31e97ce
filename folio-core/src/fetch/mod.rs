//! Retrieval of external resource bytes
//!
//! The encoder only sees the [`Fetcher`] trait. [`SourceFetcher`] reads local
//! files and, with the `remote` feature, downloads http(s) URLs;
//! [`MemoryFetcher`] serves preloaded bytes.

use crate::error::FetchError;
use crate::types::SourceRef;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result type for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Source of raw bytes for resources registered by reference.
///
/// Called once per external resource during a write, with no retries.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, source: &SourceRef) -> FetchResult<Vec<u8>>;
}

impl<F> Fetcher for F
where
    F: Fn(&SourceRef) -> FetchResult<Vec<u8>> + Send + Sync,
{
    fn fetch(&self, source: &SourceRef) -> FetchResult<Vec<u8>> {
        self(source)
    }
}

/// Default fetcher: local filesystem plus blocking HTTP
#[derive(Debug)]
pub struct SourceFetcher {
    base_dir: Option<PathBuf>,
    timeout: Duration,
    user_agent: String,
    #[cfg(feature = "remote")]
    client: std::sync::OnceLock<Result<reqwest::blocking::Client, String>>,
}

impl SourceFetcher {
    pub fn new() -> Self {
        Self {
            base_dir: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
            #[cfg(feature = "remote")]
            client: std::sync::OnceLock::new(),
        }
    }

    /// Resolve relative local paths against `dir` instead of the working directory
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Timeout applied to each HTTP request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn local_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn fetch_local(&self, path: &Path) -> FetchResult<Vec<u8>> {
        let full_path = self.local_path(path);
        std::fs::read(&full_path).map_err(|source| FetchError::Local {
            path: full_path,
            source,
        })
    }

    #[cfg(feature = "remote")]
    fn client(&self) -> Result<&reqwest::blocking::Client, String> {
        self.client
            .get_or_init(|| {
                reqwest::blocking::Client::builder()
                    .user_agent(self.user_agent.clone())
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| format!("failed to build HTTP client: {e}"))
            })
            .as_ref()
            .map_err(|e| e.clone())
    }

    #[cfg(feature = "remote")]
    fn fetch_remote(&self, url: &url::Url) -> FetchResult<Vec<u8>> {
        let remote_error = |reason: String| FetchError::Remote {
            url: url.to_string(),
            reason,
        };

        let client = self.client().map_err(remote_error)?;
        let response = client
            .get(url.as_str())
            .send()
            .map_err(|e| remote_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .map_err(|e| remote_error(format!("failed to read body: {e}")))?;
        Ok(body.to_vec())
    }

    #[cfg(not(feature = "remote"))]
    fn fetch_remote(&self, url: &url::Url) -> FetchResult<Vec<u8>> {
        Err(FetchError::RemoteDisabled(url.to_string()))
    }
}

impl Default for SourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for SourceFetcher {
    fn fetch(&self, source: &SourceRef) -> FetchResult<Vec<u8>> {
        tracing::debug!("Fetching {}", source);
        match source {
            SourceRef::Local(path) => self.fetch_local(path),
            SourceRef::Remote(url) => self.fetch_remote(url),
        }
    }
}

/// In-memory fetcher keyed by locator (for testing and pre-downloaded content)
#[derive(Debug, Default, Clone)]
pub struct MemoryFetcher {
    data: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `data` for `locator`, interpreted the same way as resource sources
    pub fn insert(&mut self, locator: &str, data: impl Into<Vec<u8>>) {
        self.data
            .insert(SourceRef::parse(locator).to_string(), data.into());
    }

    pub fn with(mut self, locator: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert(locator, data);
        self
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, source: &SourceRef) -> FetchResult<Vec<u8>> {
        let key = source.to_string();
        self.data.get(&key).cloned().ok_or_else(|| match source {
            SourceRef::Local(path) => FetchError::Local {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not in memory"),
            },
            SourceRef::Remote(_) => FetchError::Status {
                url: key,
                status: 404,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_fetch_with_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cover.png"), b"png").unwrap();

        let fetcher = SourceFetcher::new().with_base_dir(dir.path());
        let data = fetcher.fetch(&SourceRef::parse("cover.png")).unwrap();
        assert_eq!(data, b"png");
    }

    #[test]
    fn test_local_fetch_missing_file() {
        let fetcher = SourceFetcher::new();
        let err = fetcher
            .fetch(&SourceRef::parse("/definitely/not/here.png"))
            .unwrap_err();
        assert!(matches!(err, FetchError::Local { .. }));
        assert!(err.to_string().contains("here.png"));
    }

    #[test]
    fn test_memory_fetcher() {
        let fetcher = MemoryFetcher::new()
            .with("https://example.com/a.png", b"remote".to_vec())
            .with("local/b.png", b"local".to_vec());

        assert_eq!(
            fetcher
                .fetch(&SourceRef::parse("https://example.com/a.png"))
                .unwrap(),
            b"remote"
        );
        assert_eq!(fetcher.fetch(&SourceRef::parse("local/b.png")).unwrap(), b"local");
        assert!(matches!(
            fetcher.fetch(&SourceRef::parse("https://example.com/missing.png")),
            Err(FetchError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn test_closure_fetcher() {
        let fetcher = |_: &SourceRef| -> FetchResult<Vec<u8>> { Ok(b"x".to_vec()) };
        let as_trait: &dyn Fetcher = &fetcher;
        assert_eq!(as_trait.fetch(&SourceRef::parse("a.png")).unwrap(), b"x");
    }
}
