//! Sitemap extraction and fetching.
//!
//! Extraction is deliberately tag-based rather than a strict XML parse: every
//! `<loc>` becomes a URL and the newest `<lastmod>` becomes the freshness
//! timestamp. Markup that is truncated or not quite XML still yields whatever
//! entries are recognizable, and markup with no entries yields an empty snapshot.
//!
//! ```
//! use skillsync_core::sitemap::SitemapSnapshot;
//!
//! let xml = r#"<urlset>
//!   <url><loc>https://docs.convex.dev/database.md</loc><lastmod>2024-01-15T10:30:00Z</lastmod></url>
//!   <url><loc>https://docs.convex.dev/tutorial.md</loc><lastmod>2024-02-01T00:00:00Z</lastmod></url>
//! </urlset>"#;
//!
//! let snapshot = SitemapSnapshot::extract(xml, None);
//! assert_eq!(snapshot.urls.len(), 2);
//! assert_eq!(
//!     snapshot.updated.map(|t| t.to_rfc3339()),
//!     Some("2024-02-01T00:00:00+00:00".to_string())
//! );
//! ```

use crate::timestamp::{Timestamp, parse_timestamp};
use crate::{Error, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::LAST_MODIFIED;
use reqwest::{Client, StatusCode};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

#[allow(clippy::expect_used)]
static LOC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<loc>([^<]+)</loc>").expect("loc pattern compiles"));

#[allow(clippy::expect_used)]
static LASTMOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<lastmod>([^<]+)</lastmod>").expect("lastmod pattern compiles")
});

/// Default timeout for sitemap fetch requests.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Every `<loc>` value, in document order, entity-decoded and trimmed.
pub fn extract_urls(xml: &str) -> Vec<String> {
    LOC_RE
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| html_escape::decode_html_entities(m.as_str().trim()).into_owned())
        .filter(|url| !url.is_empty())
        .collect()
}

/// The most recent `<lastmod>` value that parses, if any.
pub fn extract_newest_lastmod(xml: &str) -> Option<Timestamp> {
    LASTMOD_RE
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| parse_timestamp(m.as_str()))
        .max()
}

/// What a sync needs out of a sitemap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapSnapshot {
    /// Every listed URL, in document order.
    pub urls: Vec<String>,
    /// Newest `<lastmod>`, falling back to the transport-level `Last-Modified`.
    pub updated: Option<Timestamp>,
}

impl SitemapSnapshot {
    /// Extract URLs and the freshness timestamp from raw sitemap markup.
    pub fn extract(xml: &str, last_modified_header: Option<&str>) -> Self {
        let urls = extract_urls(xml);
        let updated =
            extract_newest_lastmod(xml).or_else(|| last_modified_header.and_then(parse_timestamp));
        debug!(urls = urls.len(), updated = ?updated, "Extracted sitemap snapshot");
        Self { urls, updated }
    }
}

/// Raw response of a sitemap fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapResponse {
    /// Response body.
    pub body: String,
    /// `Last-Modified` header value, if the server sent one.
    pub last_modified: Option<String>,
}

impl SitemapResponse {
    /// Extract a [`SitemapSnapshot`] from this response.
    pub fn snapshot(&self) -> SitemapSnapshot {
        SitemapSnapshot::extract(&self.body, self.last_modified.as_deref())
    }
}

/// Where sitemap markup comes from.
#[async_trait]
pub trait SitemapSource {
    /// Fetch the sitemap once. No retries.
    async fn fetch(&self) -> Result<SitemapResponse>;
}

/// Fetches a sitemap over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSitemapSource {
    client: Client,
    url: String,
}

impl HttpSitemapSource {
    /// Creates a source for `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_FETCH_TIMEOUT)
    }

    /// Creates a source for `url` with a custom request timeout.
    ///
    /// `url` must be an absolute `http` or `https` URL.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        let parsed =
            Url::parse(&url).map_err(|e| Error::InvalidUrl(format!("'{url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "'{url}': unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("skillsync/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client, url })
    }

    /// The sitemap URL this source fetches.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SitemapSource for HttpSitemapSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<SitemapResponse> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(format!("Sitemap fetch from '{}' timed out", self.url))
            } else {
                Error::Network(e)
            }
        })?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!(
                    "Sitemap not found at '{}'",
                    self.url
                )));
            }
            return match response.error_for_status() {
                Ok(_) => Err(Error::Other(format!(
                    "Unexpected status {status} fetching sitemap"
                ))),
                Err(err) => Err(Error::Network(err)),
            };
        }

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(std::string::ToString::to_string);

        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched sitemap");

        Ok(SitemapResponse {
            body,
            last_modified,
        })
    }
}
