//! Media catalog loading and slug resolution
//!
//! The catalog is a JSON array of [`MediaRecord`]s served as a static file
//! next to the page. It is fetched fresh on every page load and never
//! mutated afterwards.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// One playable entry of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Lookup key matched against the page's `v` parameter
    #[serde(default)]
    pub slug: Option<String>,
    /// Display name
    #[serde(default)]
    pub title: Option<String>,
    /// Playable media location
    pub src: String,
    /// Subtitle (WebVTT) location
    #[serde(default)]
    pub caption: Option<String>,
    /// Preview image location
    #[serde(default)]
    pub poster: Option<String>,
}

impl MediaRecord {
    /// Create a record with only the required fields
    pub fn new(slug: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            title: None,
            src: src.into(),
            caption: None,
            poster: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }
}

/// Ordered list of media records from one load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<MediaRecord>,
}

impl Catalog {
    pub fn new(records: Vec<MediaRecord>) -> Self {
        Self { records }
    }

    /// Parse a catalog body.
    ///
    /// The body must be a JSON array. Unknown record fields are ignored, and
    /// entries that are not valid records (no `src`, non-string fields) are
    /// skipped so they never match; the rest of the catalog stays usable.
    pub fn from_json(body: &str) -> Result<Self> {
        let entries: Vec<Value> = serde_json::from_str(body)?;
        let total = entries.len();

        let records: Vec<MediaRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "Skipping invalid catalog entry");
                    None
                }
            })
            .collect();

        debug!(records = records.len(), skipped = total - records.len(), "Catalog parsed");
        Ok(Self { records })
    }

    /// Find the first record whose slug equals `slug` exactly.
    ///
    /// No trimming or case folding. An absent slug only matches a record
    /// whose own slug is absent. Duplicate slugs resolve to the earliest
    /// record.
    pub fn resolve(&self, slug: Option<&str>) -> Option<&MediaRecord> {
        self.records.iter().find(|record| record.slug.as_deref() == slug)
    }

    pub fn records(&self) -> &[MediaRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<MediaRecord>> for Catalog {
    fn from(records: Vec<MediaRecord>) -> Self {
        Self::new(records)
    }
}

/// Something that can produce a fresh catalog.
///
/// Futures are not required to be `Send` so browser fetches can implement it.
#[async_trait(?Send)]
pub trait CatalogSource {
    /// Load the catalog. No caching, no retry.
    async fn load(&self) -> Result<Catalog>;
}

/// Catalog held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    catalog: Catalog,
}

impl StaticCatalog {
    pub fn new(catalog: impl Into<Catalog>) -> Self {
        Self {
            catalog: catalog.into(),
        }
    }
}

#[async_trait(?Send)]
impl CatalogSource for StaticCatalog {
    async fn load(&self) -> Result<Catalog> {
        Ok(self.catalog.clone())
    }
}

/// Map a transport status to `CatalogUnavailable` unless it is 2xx
pub fn check_status(url: &str, status: u16, status_text: &str) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    let reason = if status_text.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status} {status_text}")
    };
    Err(crate::Error::unavailable(url, reason))
}

#[cfg(feature = "http")]
pub use http::HttpCatalogSource;

#[cfg(feature = "http")]
mod http {
    use super::*;
    use crate::{Error, LandingConfig};
    use reqwest::header::{CACHE_CONTROL, PRAGMA};
    use reqwest::Client;
    use tracing::info;
    use url::Url;

    /// Catalog fetched over HTTP, bypassing intermediate caches
    #[derive(Debug, Clone)]
    pub struct HttpCatalogSource {
        client: Client,
        url: Url,
    }

    impl HttpCatalogSource {
        pub fn new(url: Url) -> Self {
            Self::with_client(Client::new(), url)
        }

        pub fn with_client(client: Client, url: Url) -> Self {
            Self { client, url }
        }

        /// Resolve the configured catalog location against the page address
        pub fn for_page(page: &Url, config: &LandingConfig) -> Result<Self> {
            let url = page
                .join(&config.catalog_url)
                .map_err(|e| Error::InvalidConfig(format!("catalog_url: {e}")))?;
            Ok(Self::new(url))
        }

        pub fn url(&self) -> &Url {
            &self.url
        }
    }

    #[async_trait(?Send)]
    impl CatalogSource for HttpCatalogSource {
        async fn load(&self) -> Result<Catalog> {
            info!(url = %self.url, "Loading catalog");

            let response = self
                .client
                .get(self.url.clone())
                .header(CACHE_CONTROL, "no-store")
                .header(PRAGMA, "no-cache")
                .send()
                .await
                .map_err(|e| Error::unavailable(self.url.as_str(), e.to_string()))?;

            let status = response.status();
            check_status(
                self.url.as_str(),
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            )?;

            let body = response
                .text()
                .await
                .map_err(|e| Error::unavailable(self.url.as_str(), e.to_string()))?;

            Catalog::from_json(&body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn sample() -> Catalog {
        Catalog::new(vec![
            MediaRecord::new("alpha", "videos/alpha.mp4").with_title("Alpha"),
            MediaRecord::new("beta", "videos/beta.mp4"),
            MediaRecord::new("alpha", "videos/alpha-old.mp4"),
        ])
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let catalog = Catalog::from_json(
            r#"[{"slug": "alpha", "title": "Alpha", "src": "videos/alpha.mp4", "duration": 93}]"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        let record = &catalog.records()[0];
        assert_eq!(record.title.as_deref(), Some("Alpha"));
        assert_eq!(record.caption, None);
        assert_eq!(record.poster, None);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = Catalog::from_json(r#"{"slug": "alpha"}"#).unwrap_err();
        assert!(matches!(err, Error::CatalogMalformed(_)));

        let err = Catalog::from_json("<html>404</html>").unwrap_err();
        assert!(matches!(err, Error::CatalogMalformed(_)));
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let catalog = Catalog::from_json(
            r#"[
                {"slug": "alpha", "src": "videos/alpha.mp4"},
                {"slug": 7, "src": "videos/x.mp4"},
                {"slug": "draft", "title": "WIP"},
                "stray",
                {"slug": "beta", "title": 3, "src": "videos/beta.mp4"}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve(Some("alpha")).unwrap().src, "videos/alpha.mp4");
        assert!(catalog.resolve(Some("draft")).is_none());
        assert!(catalog.resolve(Some("beta")).is_none());
    }

    #[test]
    fn test_empty_array_is_valid() {
        let catalog = Catalog::from_json("[]").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_check_status() {
        assert!(check_status("data/videos.json", 200, "OK").is_ok());
        assert!(check_status("data/videos.json", 204, "").is_ok());

        match check_status("data/videos.json", 404, "Not Found").unwrap_err() {
            Error::CatalogUnavailable { url, reason } => {
                assert_eq!(url, "data/videos.json");
                assert_eq!(reason, "HTTP 404 Not Found");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = check_status("data/videos.json", 304, "").unwrap_err();
        assert_eq!(err.to_string(), "Catalog unavailable at data/videos.json: HTTP 304");
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let catalog = sample();
        let record = catalog.resolve(Some("alpha")).unwrap();
        assert_eq!(record.src, "videos/alpha.mp4");
    }

    #[test]
    fn test_resolve_is_exact() {
        let catalog = sample();
        assert!(catalog.resolve(Some("Alpha")).is_none());
        assert!(catalog.resolve(Some(" alpha")).is_none());
        assert!(catalog.resolve(Some("alph")).is_none());
        assert!(catalog.resolve(Some("missing")).is_none());
    }

    #[test]
    fn test_resolve_absent_slug() {
        let catalog = sample();
        assert!(catalog.resolve(None).is_none());
        assert!(catalog.resolve(Some("")).is_none());

        let catalog = Catalog::from_json(r#"[{"src": "videos/orphan.mp4"}]"#).unwrap();
        assert_eq!(catalog.resolve(None).unwrap().src, "videos/orphan.mp4");
        assert!(catalog.resolve(Some("")).is_none());
    }

    #[tokio::test]
    async fn test_static_source_returns_fresh_copy() {
        let source = StaticCatalog::new(sample());
        let first = source.load().await.unwrap();
        let second = source.load().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
