//! URL classification into core items and grouped item paths.
//!
//! Classification is two-pass. The first pass turns each URL into either a
//! single-segment page or a `(group, path)` pair. The second pass runs once all
//! URLs are known: a single-segment page whose name is also a group (because other
//! URLs live beneath it) is that group's `index` item rather than a core item.
//!
//! ```
//! use skillsync_core::classify::Catalog;
//!
//! let catalog = Catalog::from_urls(
//!     [
//!         "https://docs.convex.dev/agents",
//!         "https://docs.convex.dev/agents/workflows.md",
//!         "https://docs.convex.dev/tutorial.md",
//!     ],
//!     "docs.convex.dev",
//! );
//! assert_eq!(catalog.core.iter().collect::<Vec<_>>(), ["tutorial"]);
//! assert_eq!(
//!     catalog.groups["agents"].iter().collect::<Vec<_>>(),
//!     ["index", "workflows"]
//! );
//! ```

use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;
use url::Url;

/// Item name used for the root URL.
pub const HOME_ITEM: &str = "home";

/// Item name for a section's own landing page.
pub const INDEX_ITEM: &str = "index";

/// One URL, classified on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassifiedUrl {
    /// Single-segment page; a core item unless it turns out to be a group index.
    Core(String),
    /// Page beneath a group; `path` may itself contain `/`.
    Grouped {
        /// First path segment.
        group: String,
        /// Remaining segments joined by `/`.
        path: String,
    },
}

/// `host[:port]` of a URL, port only when it is not the scheme default.
pub fn url_authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Classify a single URL against the expected host.
///
/// Returns `None` for URLs that do not parse or belong to another host.
pub fn classify_url(raw: &str, host: &str) -> Option<ClassifiedUrl> {
    let parsed = Url::parse(raw).ok()?;
    if url_authority(&parsed).as_deref() != Some(host) {
        trace!(url = raw, "Skipping URL for foreign host");
        return None;
    }

    let pathname = parsed.path();
    let has_trailing_slash = pathname.ends_with('/');
    let pathname = pathname.strip_suffix(".md").unwrap_or(pathname);
    let trimmed = pathname.trim_end_matches('/');
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);

    if trimmed.is_empty() {
        return Some(ClassifiedUrl::Core(HOME_ITEM.to_string()));
    }
    // Empty segments cannot be rendered as a heading that parses back.
    if trimmed.split('/').any(str::is_empty) {
        trace!(url = raw, "Skipping URL with an empty path segment");
        return None;
    }

    let Some((group, rest)) = trimmed.split_once('/') else {
        return Some(ClassifiedUrl::Core(trimmed.to_string()));
    };

    let mut path = if rest.is_empty() {
        INDEX_ITEM.to_string()
    } else {
        rest.to_string()
    };
    if has_trailing_slash && !path.ends_with("/index") {
        path.push_str("/index");
    }

    Some(ClassifiedUrl::Grouped {
        group: group.to_string(),
        path,
    })
}

/// The authoritative item set of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Top-level pages with no children.
    pub core: BTreeSet<String>,
    /// Item paths per group.
    pub groups: BTreeMap<String, BTreeSet<String>>,
}

impl Catalog {
    /// Classify every URL and resolve standalone pages that are group indices.
    pub fn from_urls<I, S>(urls: I, host: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut singles = BTreeSet::new();
        let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for url in urls {
            match classify_url(url.as_ref(), host) {
                Some(ClassifiedUrl::Core(name)) => {
                    singles.insert(name);
                },
                Some(ClassifiedUrl::Grouped { group, path }) => {
                    groups.entry(group).or_default().insert(path);
                },
                None => {},
            }
        }

        let mut core = BTreeSet::new();
        for name in singles {
            match groups.get_mut(&name) {
                Some(items) => {
                    items.insert(INDEX_ITEM.to_string());
                },
                None => {
                    core.insert(name);
                },
            }
        }

        Self { core, groups }
    }

    /// Total number of items across core and all groups.
    pub fn item_count(&self) -> usize {
        self.core.len() + self.groups.values().map(BTreeSet::len).sum::<usize>()
    }

    /// True when no URL survived classification.
    pub fn is_empty(&self) -> bool {
        self.core.is_empty() && self.groups.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HOST: &str = "docs.convex.dev";

    fn grouped(group: &str, path: &str) -> Option<ClassifiedUrl> {
        Some(ClassifiedUrl::Grouped {
            group: group.to_string(),
            path: path.to_string(),
        })
    }

    #[test]
    fn test_root_is_home() {
        assert_eq!(
            classify_url("https://docs.convex.dev/", HOST),
            Some(ClassifiedUrl::Core("home".to_string()))
        );
        assert_eq!(
            classify_url("https://docs.convex.dev", HOST),
            Some(ClassifiedUrl::Core("home".to_string()))
        );
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        assert_eq!(classify_url("https://docs.convex.dev//x", HOST), None);
        assert_eq!(classify_url("https://docs.convex.dev/database//x.md", HOST), None);
        let catalog = Catalog::from_urls(
            ["https://docs.convex.dev//x", "https://docs.convex.dev/zeta/y"],
            HOST,
        );
        assert_eq!(catalog.groups.keys().collect::<Vec<_>>(), ["zeta"]);
    }

    #[test]
    fn test_strips_md_suffix() {
        assert_eq!(
            classify_url("https://docs.convex.dev/database/schemas.md", HOST),
            grouped("database", "schemas")
        );
        assert_eq!(
            classify_url("https://docs.convex.dev/tutorial.md", HOST),
            Some(ClassifiedUrl::Core("tutorial".to_string()))
        );
    }

    #[test]
    fn test_nested_paths_stay_joined() {
        assert_eq!(
            classify_url("https://docs.convex.dev/api/classes/server.Auth.md", HOST),
            grouped("api", "classes/server.Auth")
        );
    }

    #[test]
    fn test_trailing_slash_becomes_index() {
        assert_eq!(
            classify_url("https://docs.convex.dev/client/react/", HOST),
            grouped("client", "react/index")
        );
        assert_eq!(
            classify_url("https://docs.convex.dev/client/react/index/", HOST),
            grouped("client", "react/index")
        );
        assert_eq!(
            classify_url("https://docs.convex.dev/agents/", HOST),
            Some(ClassifiedUrl::Core("agents".to_string()))
        );
    }

    #[test]
    fn test_skips_foreign_and_invalid_urls() {
        assert_eq!(classify_url("https://stack.convex.dev/post", HOST), None);
        assert_eq!(classify_url("not a url", HOST), None);
        assert_eq!(classify_url("/database/schemas", HOST), None);
    }

    #[test]
    fn test_host_includes_explicit_port() {
        assert_eq!(
            classify_url("http://127.0.0.1:8080/database/schemas", "127.0.0.1:8080"),
            grouped("database", "schemas")
        );
        assert_eq!(
            classify_url("http://127.0.0.1:9090/database/schemas", "127.0.0.1:8080"),
            None
        );
        assert_eq!(
            classify_url("https://docs.convex.dev:443/tutorial", HOST),
            Some(ClassifiedUrl::Core("tutorial".to_string()))
        );
    }

    #[test]
    fn test_group_with_standalone_page_gains_index() {
        let catalog = Catalog::from_urls(
            [
                "https://docs.convex.dev/agents",
                "https://docs.convex.dev/agents/workflows.md",
                "https://docs.convex.dev/agents/threads.md",
            ],
            HOST,
        );
        assert!(catalog.core.is_empty());
        assert_eq!(
            catalog.groups["agents"].iter().collect::<Vec<_>>(),
            ["index", "threads", "workflows"]
        );
    }

    #[test]
    fn test_order_of_urls_does_not_matter() {
        let forward = Catalog::from_urls(
            [
                "https://docs.convex.dev/agents.md",
                "https://docs.convex.dev/agents/workflows.md",
            ],
            HOST,
        );
        let backward = Catalog::from_urls(
            [
                "https://docs.convex.dev/agents/workflows.md",
                "https://docs.convex.dev/agents.md",
            ],
            HOST,
        );
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_group_without_standalone_page_has_no_index() {
        let catalog = Catalog::from_urls(
            [
                "https://docs.convex.dev/database/schemas.md",
                "https://docs.convex.dev/database/indexes.md",
                "https://docs.convex.dev/home",
                "https://docs.convex.dev/",
            ],
            HOST,
        );
        assert_eq!(catalog.core.iter().collect::<Vec<_>>(), ["home"]);
        assert_eq!(
            catalog.groups["database"].iter().collect::<Vec<_>>(),
            ["indexes", "schemas"]
        );
        assert_eq!(catalog.item_count(), 3);
    }

    #[test]
    fn test_duplicate_urls_collapse() {
        let catalog = Catalog::from_urls(
            [
                "https://docs.convex.dev/database/schemas",
                "https://docs.convex.dev/database/schemas.md",
                "https://docs.convex.dev/database/schemas/",
            ],
            HOST,
        );
        assert_eq!(
            catalog.groups["database"].iter().collect::<Vec<_>>(),
            ["schemas", "schemas/index"]
        );
    }

    #[test]
    fn test_empty_input() {
        let catalog = Catalog::from_urls(Vec::<String>::new(), HOST);
        assert!(catalog.is_empty());
        assert_eq!(catalog.item_count(), 0);
    }
}
