//! # skillsync-core
//!
//! Keeps a skill document (a markdown index of documentation links) in sync with
//! a site's sitemap.
//!
//! A run fetches the sitemap once, classifies every URL into top-level core pages
//! and per-section groups, and renders a compact, deterministic document. The
//! previous document is the only persisted state: the order in which it lists
//! groups and items is read back and preferred on the next render, so manual
//! reordering survives a refresh.
//!
//! ## Architecture
//!
//! - **Timestamps**: [`timestamp`] parses and formats the `updated:` field.
//! - **Order memory**: [`order`] recovers display order from a previous document.
//! - **Sitemap**: [`sitemap`] extracts URLs and freshness, and fetches over HTTP.
//! - **Classification**: [`classify`] turns URLs into a [`Catalog`].
//! - **Compaction**: [`compact`] folds shared path prefixes.
//! - **Rendering**: [`render`] produces the document.
//! - **Sync**: [`sync`] drives a run through its freshness and content gates.
//! - **Host**: [`host`] registers the document with a plugin host.
//! - **Link checking**: [`checker`] probes the URLs a document lists.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skillsync_core::{SkillConfig, SkillSync, SyncOutcome};
//!
//! # async fn example() -> skillsync_core::Result<()> {
//! let config = SkillConfig::load(None)?;
//! let sync = SkillSync::from_config(&config)?;
//! match sync.run().await {
//!     Ok(SyncOutcome::Written { items, .. }) => println!("wrote {items} items"),
//!     Ok(outcome) => println!("nothing to do: {outcome:?}"),
//!     Err(e) if e.is_upstream_failure() => eprintln!("keeping existing document: {e}"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

/// Link checker for rendered documents
pub mod checker;
/// URL classification into core items and groups
pub mod classify;
/// Prefix-sharing compaction of item paths
pub mod compact;
/// Configuration loading and validation
pub mod config;
/// Error types and result aliases
pub mod error;
/// Plugin host registration
pub mod host;
/// Order memory recovered from previous documents
pub mod order;
/// Document rendering and accessors
pub mod render;
/// Sitemap extraction and fetching
pub mod sitemap;
/// Document persistence
pub mod storage;
/// Sync driver
pub mod sync;
/// Timestamp parsing and formatting
pub mod timestamp;

pub use checker::{CheckReport, LinkChecker, ProbeStatus, UrlCheck, Verdict, extract_document_urls};
pub use classify::{Catalog, ClassifiedUrl, classify_url};
pub use compact::{compact, expand_compacted};
pub use config::{CheckConfig, SkillConfig};
pub use error::{Error, Result};
pub use host::{SkillHost, SkillRegistration, SkillRegistry, load_skill};
pub use order::OrderMemory;
pub use render::{DocumentFormat, DocumentInput};
pub use sitemap::{HttpSitemapSource, SitemapResponse, SitemapSnapshot, SitemapSource};
pub use storage::{DocumentStore, FileDocumentStore};
pub use sync::{SkillSync, SyncOutcome};
pub use timestamp::{Timestamp, format_timestamp, parse_timestamp};
