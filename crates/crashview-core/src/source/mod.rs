//! Read capability: how source text behind a stack frame is obtained.
//!
//! Frame references come in two shapes: local paths and absolute
//! `http(s)://` URLs (remote modules). Both are read through the
//! [`SourceReader`] trait so the extractor never cares which one it got.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐     ┌──────────────┐
//! │ SourceExtractor│────▶│ SourceReader │  (trait)
//! └────────────────┘     └──────┬───────┘
//!                               │
//!                       ┌───────┴────────┐
//!                       ▼                ▼
//!              ┌────────────────┐ ┌─────────────┐
//!              │ LocalFileReader│ │ HttpFetcher │
//!              └────────────────┘ └─────────────┘
//!                       ▲                ▲
//!                       └──SourceResolver┘  (dispatch on scheme)
//! ```
//!
//! The reader is chosen once, when the pipeline is composed.

pub mod http;
pub mod local;

use crate::BoxFuture;

pub use http::HttpFetcher;
pub use local::LocalFileReader;

/// Errors from reading a source reference.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to read {reference}: {source}")]
    Io {
        reference: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("timed out fetching {0}")]
    Timeout(String),

    #[error("remote fetching is disabled: {0}")]
    RemoteDisabled(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Something that can turn a file reference into text.
///
/// Implementations must be `Send + Sync` so one reader can serve
/// concurrent error pages.
pub trait SourceReader: Send + Sync {
    /// Reader display name, used in logs.
    fn name(&self) -> &str;

    /// Read the whole referenced file as UTF-8 text.
    fn read_text<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Result<String, ReadError>>;
}

/// Whether `reference` must be fetched over the network.
pub fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// The default reader: local paths go to the filesystem, URLs to HTTP.
pub struct SourceResolver {
    local: LocalFileReader,
    remote: Option<HttpFetcher>,
}

impl SourceResolver {
    /// Resolver that reads local files and fetches URLs with `fetcher`.
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self {
            local: LocalFileReader,
            remote: Some(fetcher),
        }
    }

    /// Resolver that only reads local files; URLs always fail.
    pub fn local_only() -> Self {
        Self {
            local: LocalFileReader,
            remote: None,
        }
    }

    /// Build a resolver from the `[fetch]` config section.
    pub fn from_config(config: &crashview_config::FetchConfig) -> Result<Self, ReadError> {
        if config.enabled {
            Ok(Self::new(HttpFetcher::from_config(config)?))
        } else {
            Ok(Self::local_only())
        }
    }

    /// Whether URL references will be fetched.
    pub fn fetches_remote(&self) -> bool {
        self.remote.is_some()
    }
}

impl SourceReader for SourceResolver {
    fn name(&self) -> &str {
        "resolver"
    }

    fn read_text<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Result<String, ReadError>> {
        if !is_remote(reference) {
            return self.local.read_text(reference);
        }
        match &self.remote {
            Some(fetcher) => fetcher.read_text(reference),
            None => Box::pin(async move { Err(ReadError::RemoteDisabled(reference.to_string())) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crashview_config::FetchConfig;
    use tempfile::TempDir;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("http://localhost/a.ts"));
        assert!(is_remote("https://deno.land/x/a.ts"));
        assert!(!is_remote("/srv/app.ts"));
        assert!(!is_remote("relative/http://a.ts"));
        assert!(!is_remote("ftp://example.com/a.ts"));
    }

    #[tokio::test]
    async fn test_resolver_reads_local_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.ts");
        tokio::fs::write(&path, "const a = 1;\n").await.unwrap();

        let resolver = SourceResolver::local_only();
        let text = resolver.read_text(path.to_str().unwrap()).await.unwrap();
        assert_eq!(text, "const a = 1;\n");
    }

    #[tokio::test]
    async fn test_local_only_rejects_urls() {
        let resolver = SourceResolver::local_only();
        assert!(!resolver.fetches_remote());
        let err = resolver
            .read_text("https://example.com/app.ts")
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::RemoteDisabled(_)));
    }

    #[test]
    fn test_from_config_respects_enabled_flag() {
        let disabled = FetchConfig {
            enabled: false,
            ..FetchConfig::default()
        };
        assert!(!SourceResolver::from_config(&disabled).unwrap().fetches_remote());
        assert!(
            SourceResolver::from_config(&FetchConfig::default())
                .unwrap()
                .fetches_remote()
        );
    }
}
