//! The sync driver: fetch, gate, render, persist.
//!
//! A run reads the existing document, fetches the sitemap once and passes two
//! gates before anything is written:
//!
//! 1. **Freshness**: when both the document and the sitemap carry a timestamp and
//!    the sitemap's is not strictly newer, the run stops.
//! 2. **Content**: the candidate document is compared with the existing one with
//!    the `updated:` line masked on both sides; identical text is not rewritten.
//!
//! Errors are returned, never swallowed. [`Error::is_upstream_failure`] tells the
//! caller whether the existing document is still authoritative.

use crate::classify::Catalog;
use crate::config::SkillConfig;
use crate::order::OrderMemory;
use crate::render::{DocumentFormat, DocumentInput, extract_updated, mask_updated};
use crate::sitemap::{HttpSitemapSource, SitemapSource};
use crate::storage::{DocumentStore, FileDocumentStore};
use crate::timestamp::Timestamp;
use crate::{Error, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// What a sync run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The sitemap is not newer than the document.
    Fresh {
        /// Timestamp recorded in the document.
        existing: Timestamp,
        /// Newest timestamp the sitemap offered.
        sitemap: Timestamp,
    },
    /// The sitemap listed no URLs for the configured host.
    Empty,
    /// Only the timestamp would have changed.
    Unchanged {
        /// Timestamp the candidate would have carried.
        updated: Timestamp,
    },
    /// A new document was rendered (and written unless this was a dry run).
    Written {
        /// Timestamp recorded in the new document.
        updated: Timestamp,
        /// Number of groups rendered.
        groups: usize,
        /// Number of items across core and all groups.
        items: usize,
        /// Whether the write was skipped.
        dry_run: bool,
        /// Candidate document, kept only for dry runs.
        #[serde(skip_serializing_if = "Option::is_none")]
        document: Option<String>,
    },
}

impl SyncOutcome {
    /// True when the document on disk was replaced.
    pub const fn wrote(&self) -> bool {
        matches!(self, Self::Written { dry_run: false, .. })
    }
}

/// Keeps one skill document in sync with one sitemap.
#[derive(Debug)]
pub struct SkillSync<S = HttpSitemapSource, D = FileDocumentStore> {
    source: S,
    store: D,
    format: DocumentFormat,
    host: String,
    dry_run: bool,
}

impl SkillSync {
    /// HTTP source and file store as described by `config`.
    pub fn from_config(config: &SkillConfig) -> Result<Self> {
        config.validate()?;
        let source = HttpSitemapSource::with_timeout(&config.sitemap_url, config.fetch_timeout())?;
        let store = FileDocumentStore::new(&config.document);
        Self::new(source, store, config)
    }
}

impl<S: SitemapSource, D: DocumentStore> SkillSync<S, D> {
    /// Sync driver over custom collaborators.
    pub fn new(source: S, store: D, config: &SkillConfig) -> Result<Self> {
        Ok(Self {
            source,
            store,
            format: config.document_format(),
            host: config.host()?,
            dry_run: false,
        })
    }

    /// Render and evaluate both gates without writing.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Document shape used when rendering.
    pub const fn format(&self) -> &DocumentFormat {
        &self.format
    }

    /// Where the document lives.
    pub const fn store(&self) -> &D {
        &self.store
    }

    /// Run once against the current clock.
    pub async fn run(&self) -> Result<SyncOutcome> {
        self.run_at(Utc::now()).await
    }

    /// Run once; `now` is recorded when the sitemap carries no timestamp.
    #[instrument(skip(self), fields(host = %self.host, dry_run = self.dry_run))]
    pub async fn run_at(&self, now: Timestamp) -> Result<SyncOutcome> {
        let existing = self.store.read()?.unwrap_or_default();
        let existing_updated = extract_updated(&existing);
        let memory = OrderMemory::parse(&existing);
        debug!(
            groups = memory.group_order.len(),
            updated = ?existing_updated,
            "Recovered order memory"
        );

        let snapshot = self.source.fetch().await?.snapshot();

        if let (Some(existing), Some(sitemap)) = (existing_updated, snapshot.updated) {
            if sitemap <= existing {
                debug!(%existing, %sitemap, "Sitemap not newer than document, skipping");
                return Ok(SyncOutcome::Fresh { existing, sitemap });
            }
        }

        let catalog = Catalog::from_urls(&snapshot.urls, &self.host);
        if catalog.is_empty() {
            debug!(urls = snapshot.urls.len(), "No usable URLs in sitemap, skipping");
            return Ok(SyncOutcome::Empty);
        }

        let updated = snapshot.updated.unwrap_or(now);
        let intro = self.format.extract_intro(&existing);
        let candidate = self.format.render(&DocumentInput {
            updated,
            intro: &intro,
            catalog: &catalog,
            memory: &memory,
        });

        if mask_updated(&candidate) == mask_updated(&existing) {
            debug!("Rendered document matches existing content, skipping write");
            return Ok(SyncOutcome::Unchanged { updated });
        }

        let groups = catalog.groups.len();
        let items = catalog.item_count();

        if self.dry_run {
            info!(groups, items, "Dry run, document not written");
            return Ok(SyncOutcome::Written {
                updated,
                groups,
                items,
                dry_run: true,
                document: Some(candidate),
            });
        }

        self.store.write(&candidate).map_err(|e| match e {
            Error::Io(io) => Error::Storage(io.to_string()),
            other => other,
        })?;
        info!(groups, items, %updated, "Wrote skill document");

        Ok(SyncOutcome::Written {
            updated,
            groups,
            items,
            dry_run: false,
            document: None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::sitemap::SitemapResponse;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct StaticSource(std::result::Result<SitemapResponse, fn() -> Error>);

    impl StaticSource {
        fn xml(body: &str) -> Self {
            Self(Ok(SitemapResponse {
                body: body.to_string(),
                last_modified: None,
            }))
        }
    }

    #[async_trait]
    impl SitemapSource for StaticSource {
        async fn fetch(&self) -> Result<SitemapResponse> {
            match &self.0 {
                Ok(response) => Ok(response.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        content: Mutex<Option<String>>,
        writes: Mutex<usize>,
    }

    impl MemoryStore {
        fn with(content: &str) -> Self {
            Self {
                content: Mutex::new(Some(content.to_string())),
                writes: Mutex::new(0),
            }
        }

        fn writes(&self) -> usize {
            *self.writes.lock().unwrap()
        }

        fn content(&self) -> Option<String> {
            self.content.lock().unwrap().clone()
        }
    }

    impl DocumentStore for MemoryStore {
        fn read(&self) -> Result<Option<String>> {
            Ok(self.content())
        }

        fn write(&self, content: &str) -> Result<()> {
            *self.content.lock().unwrap() = Some(content.to_string());
            *self.writes.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn sitemap(lastmod: &str, paths: &[&str]) -> String {
        let mut xml = String::from("<urlset>\n");
        for path in paths {
            xml.push_str(&format!(
                "<url><loc>https://docs.convex.dev/{path}</loc><lastmod>{lastmod}</lastmod></url>\n"
            ));
        }
        xml.push_str("</urlset>\n");
        xml
    }

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    fn sync(source: StaticSource, store: MemoryStore) -> SkillSync<StaticSource, MemoryStore> {
        SkillSync::new(source, store, &SkillConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_cold_start_writes_document() -> Result<()> {
        let xml = sitemap(
            "2024-02-01T00:00:00Z",
            &["database/schemas.md", "database/indexes.md", "tutorial.md"],
        );
        let sync = sync(StaticSource::xml(&xml), MemoryStore::default());
        let outcome = sync.run_at(now()).await?;

        assert!(outcome.wrote());
        assert!(matches!(outcome, SyncOutcome::Written { groups: 1, items: 3, .. }));
        let doc = sync.store().content().unwrap();
        assert!(doc.contains("  updated: 2024-02-01 00:00:00 UTC\n"));
        assert!(doc.contains("DATABASE /database/\nindexes, schemas\n"));
        assert!(doc.contains(crate::render::DEFAULT_INTRO));
        Ok(())
    }

    #[tokio::test]
    async fn test_freshness_gate_skips_older_sitemap() -> Result<()> {
        let existing = "---\nmetadata:\n  updated: 2024-01-01 00:00:00 UTC\n---\n";
        let xml = sitemap("2023-12-31T00:00:00Z", &["database/schemas.md"]);
        let sync = sync(StaticSource::xml(&xml), MemoryStore::with(existing));

        let outcome = sync.run_at(now()).await?;
        assert!(matches!(outcome, SyncOutcome::Fresh { .. }));
        assert_eq!(sync.store().writes(), 0);
        assert_eq!(sync.store().content().as_deref(), Some(existing));
        Ok(())
    }

    #[tokio::test]
    async fn test_equal_timestamp_is_not_newer() -> Result<()> {
        let existing = "  updated: 2024-01-01 00:00:00 UTC\n";
        let xml = sitemap("2024-01-01T00:00:00Z", &["database/schemas.md"]);
        let sync = sync(StaticSource::xml(&xml), MemoryStore::with(existing));
        assert!(matches!(sync.run_at(now()).await?, SyncOutcome::Fresh { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_content_gate_skips_timestamp_only_change() -> Result<()> {
        let first = sitemap("2024-01-01T00:00:00Z", &["database/schemas.md"]);
        let sync_a = sync(StaticSource::xml(&first), MemoryStore::default());
        sync_a.run_at(now()).await?;
        let written = sync_a.store().content().unwrap();

        let second = sitemap("2024-06-01T00:00:00Z", &["database/schemas.md"]);
        let sync_b = sync(StaticSource::xml(&second), MemoryStore::with(&written));
        let outcome = sync_b.run_at(now()).await?;

        assert!(matches!(outcome, SyncOutcome::Unchanged { .. }));
        assert_eq!(sync_b.store().writes(), 0);
        assert_eq!(sync_b.store().content(), Some(written));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_timestamp_uses_now() -> Result<()> {
        let xml = "<urlset><url><loc>https://docs.convex.dev/tutorial</loc></url></urlset>";
        let sync = sync(StaticSource::xml(xml), MemoryStore::default());
        let outcome = sync.run_at(now()).await?;
        match outcome {
            SyncOutcome::Written { updated, .. } => assert_eq!(updated, now()),
            other => panic!("expected write, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_sitemap_keeps_document() -> Result<()> {
        let existing = "previous document\n";
        let sync = sync(
            StaticSource::xml("<html>maintenance</html>"),
            MemoryStore::with(existing),
        );
        assert_eq!(sync.run_at(now()).await?, SyncOutcome::Empty);
        assert_eq!(sync.store().content().as_deref(), Some(existing));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_failure_is_returned_untouched() {
        let source = StaticSource(Err(|| Error::Timeout("sitemap".into())));
        let sync = sync(source, MemoryStore::with("kept\n"));
        let err = sync.run_at(now()).await.unwrap_err();
        assert!(err.is_upstream_failure());
        assert_eq!(sync.store().content().as_deref(), Some("kept\n"));
    }

    #[tokio::test]
    async fn test_dry_run_returns_candidate_without_writing() -> Result<()> {
        let xml = sitemap("2024-02-01T00:00:00Z", &["tutorial.md"]);
        let sync = sync(StaticSource::xml(&xml), MemoryStore::default()).dry_run(true);
        let outcome = sync.run_at(now()).await?;

        assert!(!outcome.wrote());
        match outcome {
            SyncOutcome::Written {
                dry_run: true,
                document: Some(doc),
                ..
            } => assert!(doc.contains("CORE https://docs.convex.dev/\ntutorial\n")),
            other => panic!("expected dry-run candidate, got {other:?}"),
        }
        assert_eq!(sync.store().writes(), 0);
        Ok(())
    }

    #[test]
    fn test_outcome_serializes_with_tag() -> Result<()> {
        let outcome = SyncOutcome::Written {
            updated: now(),
            groups: 2,
            items: 5,
            dry_run: false,
            document: None,
        };
        let json = serde_json::to_value(&outcome)?;
        assert_eq!(json["outcome"], "written");
        assert_eq!(json["items"], 5);
        assert!(json.get("document").is_none());
        Ok(())
    }
}
