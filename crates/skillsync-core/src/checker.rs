//! Link checker for a rendered skill document.
//!
//! Separate from the sync: nothing here runs as part of [`crate::SkillSync`].
//! URLs are rebuilt from the list block and probed with `HEAD`, the `.md`
//! variant first and the bare URL as a fallback.

use crate::compact::expand_compacted;
use crate::config::CheckConfig;
use crate::{Error, Result};
use futures::future::join_all;
use regex::Regex;
use reqwest::Client;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument};

/// `DATABASE /database/`
#[allow(clippy::expect_used)]
static SLASH_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9 ]+ (/[^/]+/)$").expect("slash heading compiles"));

/// `API CLASSES SERVER /api/classes/server.`
#[allow(clippy::expect_used)]
static DOT_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9 ]+ (/\S+\.)$").expect("dot heading compiles"));

enum Section {
    None,
    Core,
    Path(String),
}

/// Every URL listed in the document's list block, in document order.
///
/// Core items resolve to `{base}/{item}`; items under a `LABEL /path/` or
/// `LABEL /path.` heading resolve to `{base}{path}{item}` after compacted
/// continuations are expanded. Text outside the list block is ignored.
pub fn extract_document_urls(document: &str, base_url: &str, list_tag: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    let closing_tag = list_tag.replacen('<', "</", 1);

    let Some(start) = document.find(list_tag) else {
        return Vec::new();
    };
    let block = &document[start + list_tag.len()..];
    let block = block.find(&closing_tag).map_or(block, |end| &block[..end]);

    let mut urls = Vec::new();
    let mut section = Section::None;
    let mut pending: Vec<&str> = Vec::new();

    let mut flush = |section: &Section, pending: &mut Vec<&str>| {
        match section {
            Section::None => {},
            Section::Core => urls.extend(pending.iter().map(|item| format!("{base}/{item}"))),
            Section::Path(path) => urls.extend(
                expand_compacted(pending.iter())
                    .into_iter()
                    .map(|item| format!("{base}{path}{item}")),
            ),
        }
        pending.clear();
    };

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(caps) = SLASH_HEADING_RE
            .captures(trimmed)
            .or_else(|| DOT_HEADING_RE.captures(trimmed))
        {
            flush(&section, &mut pending);
            section = caps
                .get(1)
                .map_or(Section::None, |m| Section::Path(m.as_str().to_string()));
            continue;
        }
        if trimmed.starts_with(crate::order::CORE_MARKER) {
            flush(&section, &mut pending);
            section = Section::Core;
            continue;
        }
        pending.extend(trimmed.split(',').map(str::trim).filter(|i| !i.is_empty()));
    }
    flush(&section, &mut pending);

    urls
}

/// Result of one `HEAD` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The server answered with this status.
    Status(u16),
    /// The request failed or timed out.
    Error,
}

impl ProbeStatus {
    fn is_ok(self) -> bool {
        self == Self::Status(200)
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "{code}"),
            Self::Error => f.write_str("error"),
        }
    }
}

impl Serialize for ProbeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Status(code) => serializer.serialize_u16(*code),
            Self::Error => serializer.serialize_str("error"),
        }
    }
}

/// How a URL fared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The `.md` variant answers.
    Markdown,
    /// Only the bare URL answers.
    PlainOnly,
    /// Neither variant answers.
    Broken,
}

/// Probe results for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlCheck {
    /// URL as listed in the document.
    pub url: String,
    /// Status of `{url}.md`.
    pub md_status: ProbeStatus,
    /// Status of the bare URL; only probed when the `.md` variant failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_status: Option<ProbeStatus>,
}

impl UrlCheck {
    /// Overall verdict.
    pub fn verdict(&self) -> Verdict {
        if self.md_status.is_ok() {
            Verdict::Markdown
        } else if self.plain_status.is_some_and(ProbeStatus::is_ok) {
            Verdict::PlainOnly
        } else {
            Verdict::Broken
        }
    }
}

/// All probe results of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// One entry per URL, in input order.
    pub results: Vec<UrlCheck>,
}

impl CheckReport {
    fn count(&self, verdict: Verdict) -> usize {
        self.results.iter().filter(|r| r.verdict() == verdict).count()
    }

    /// URLs checked.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// URLs whose `.md` variant works.
    pub fn markdown(&self) -> usize {
        self.count(Verdict::Markdown)
    }

    /// URLs that only work without `.md`.
    pub fn plain_only(&self) -> usize {
        self.count(Verdict::PlainOnly)
    }

    /// URLs where neither variant works.
    pub fn broken(&self) -> usize {
        self.count(Verdict::Broken)
    }

    /// Entries with the given verdict.
    pub fn with_verdict(&self, verdict: Verdict) -> impl Iterator<Item = &UrlCheck> {
        self.results.iter().filter(move |r| r.verdict() == verdict)
    }
}

/// Probes URLs in fixed-size concurrent batches.
#[derive(Debug, Clone)]
pub struct LinkChecker {
    client: Client,
    batch_size: usize,
    timeout: Duration,
}

impl LinkChecker {
    /// Checker configured by `config`.
    pub fn new(config: &CheckConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(Error::Config("check.batch_size must be greater than 0".into()));
        }
        let client = Client::builder()
            .user_agent(concat!("skillsync/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(Error::Network)?;
        Ok(Self {
            client,
            batch_size: config.batch_size,
            timeout: config.timeout(),
        })
    }

    async fn probe(&self, url: &str) -> ProbeStatus {
        match tokio::time::timeout(self.timeout, self.client.head(url).send()).await {
            Ok(Ok(response)) => ProbeStatus::Status(response.status().as_u16()),
            Ok(Err(e)) => {
                debug!(url, error = %e, "Probe failed");
                ProbeStatus::Error
            },
            Err(_) => {
                debug!(url, "Probe timed out");
                ProbeStatus::Error
            },
        }
    }

    /// Check one URL: `.md` first, bare URL if that fails.
    pub async fn check_url(&self, url: &str) -> UrlCheck {
        let md_status = self.probe(&format!("{url}.md")).await;
        let plain_status = if md_status.is_ok() {
            None
        } else {
            Some(self.probe(url).await)
        };
        UrlCheck {
            url: url.to_string(),
            md_status,
            plain_status,
        }
    }

    /// Check every URL.
    pub async fn check_all(&self, urls: &[String]) -> CheckReport {
        self.check_all_with(urls, |_| {}).await
    }

    /// Check every URL, calling `on_result` as each batch completes.
    #[instrument(skip_all, fields(urls = urls.len(), batch_size = self.batch_size))]
    pub async fn check_all_with<F>(&self, urls: &[String], mut on_result: F) -> CheckReport
    where
        F: FnMut(&UrlCheck),
    {
        let mut results = Vec::with_capacity(urls.len());
        for batch in urls.chunks(self.batch_size) {
            let checked = join_all(batch.iter().map(|url| self.check_url(url))).await;
            for check in checked {
                on_result(&check);
                results.push(check);
            }
        }
        CheckReport { results }
    }
}
