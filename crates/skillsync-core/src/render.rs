//! Deterministic document rendering and document accessors.
//!
//! A rendered document looks like this:
//!
//! ```text
//! ---
//! name: convex-docs
//! description: Get convex documentation LINKS so you can fetch them as markdown
//! metadata:
//!   updated: 2024-01-01 00:00:00 UTC
//! ---
//!
//! <intro, preserved from the previous document>
//!
//! <convex-docs-list>
//!
//! CORE https://docs.convex.dev/
//! home, tutorial
//!
//! DATABASE /database/
//! indexes, schemas
//!
//! </convex-docs-list>
//! ```
//!
//! Given the same catalog, order memory, timestamp and intro the output is byte
//! for byte identical, and rendering the order memory parsed back out of a
//! rendered document reproduces that document.

use crate::classify::Catalog;
use crate::compact::compact;
use crate::order::{CORE_GROUP, CORE_MARKER, OrderMemory, default_label};
use crate::timestamp::{Timestamp, format_timestamp, parse_timestamp};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Intro used when the previous document has none.
pub const DEFAULT_INTRO: &str = "ALL PAGES ARE ACCESSIBLE AS MARKDOWN, WHICH IS THE VERSION YOU MUST ACCESS AND NOT THE HTML PAGE!!!
LIKE SO: https://docs.convex.dev/quickstart/react.md";

/// Maximum rendered width of an item line.
pub const MAX_LINE_WIDTH: usize = 100;

#[allow(clippy::expect_used)]
static FRONTMATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---.*?---\n*").expect("frontmatter pattern compiles"));

#[allow(clippy::expect_used)]
static UPDATED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"updated:\s*(.+)").expect("updated pattern compiles"));

#[allow(clippy::expect_used)]
static UPDATED_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*updated:\s*.+$").expect("updated line pattern compiles"));

/// Fixed parts of the document shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFormat {
    /// Skill name, written to the metadata block and used for the list markers.
    pub name: String,
    /// Skill description, written to the metadata block.
    pub description: String,
    /// Site base URL written after the core marker.
    pub base_url: String,
    /// Maximum width of an item line.
    pub max_line_width: usize,
}

impl Default for DocumentFormat {
    fn default() -> Self {
        Self {
            name: "convex-docs".to_string(),
            description: "Get convex documentation LINKS so you can fetch them as markdown"
                .to_string(),
            base_url: "https://docs.convex.dev/".to_string(),
            max_line_width: MAX_LINE_WIDTH,
        }
    }
}

/// Everything that varies between two renders.
#[derive(Debug, Clone, Copy)]
pub struct DocumentInput<'a> {
    /// Value of the `updated:` field.
    pub updated: Timestamp,
    /// Freeform text between the metadata block and the list.
    pub intro: &'a str,
    /// Items that exist now.
    pub catalog: &'a Catalog,
    /// Ordering preferences from the previous document.
    pub memory: &'a OrderMemory,
}

impl DocumentFormat {
    /// `<name-list>`
    pub fn list_tag(&self) -> String {
        format!("<{}-list>", self.name)
    }

    /// `</name-list>`
    pub fn closing_tag(&self) -> String {
        format!("</{}-list>", self.name)
    }

    /// Render the full document.
    pub fn render(&self, input: &DocumentInput<'_>) -> String {
        let DocumentInput {
            updated,
            intro,
            catalog,
            memory,
        } = *input;

        let mut lines: Vec<String> = vec![
            "---".to_string(),
            format!("name: {}", self.name),
            format!("description: {}", self.description),
            "metadata:".to_string(),
            format!("  updated: {}", format_timestamp(&updated)),
            "---".to_string(),
            String::new(),
            intro.trim().to_string(),
            String::new(),
            self.list_tag(),
            String::new(),
            format!("{CORE_MARKER}{}", self.base_url),
        ];

        let core = sort_by_order(catalog.core.iter(), memory.items(CORE_GROUP));
        lines.push(wrap_items(&core, self.max_line_width).join("\n"));
        lines.push(String::new());

        let groups = sort_by_order(catalog.groups.keys(), &memory.groups().collect::<Vec<_>>());
        for group in groups {
            let Some(items) = catalog.groups.get(&group) else {
                continue;
            };
            let label = memory
                .label(&group)
                .map_or_else(|| default_label(&group), str::to_string);
            let ordered = sort_by_order(items.iter(), memory.items(&group));
            let compacted = compact(&ordered);

            lines.push(format!("{label} /{group}/"));
            lines.push(wrap_items(&compacted, self.max_line_width).join("\n"));
            lines.push(String::new());
        }

        lines.push(self.closing_tag());

        let mut document = lines.join("\n").trim_end().to_string();
        document.push('\n');
        document
    }

    /// Intro of an existing document, or [`DEFAULT_INTRO`] when the list marker is
    /// missing.
    pub fn extract_intro(&self, document: &str) -> String {
        extract_intro(document, &self.list_tag())
    }
}

/// Text between the metadata block and `list_tag`, trimmed.
///
/// Falls back to [`DEFAULT_INTRO`] when `list_tag` does not occur.
pub fn extract_intro(document: &str, list_tag: &str) -> String {
    let body = strip_frontmatter(document);
    body.find(list_tag)
        .map_or_else(|| DEFAULT_INTRO.to_string(), |idx| body[..idx].trim().to_string())
}

/// Order `items` by `preferred` first, then the rest lexicographically.
///
/// Preferred entries that are not in `items` are dropped; `preferred` only ever
/// reorders, it never adds.
pub fn sort_by_order<I, S, P>(items: I, preferred: &[P]) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    P: AsRef<str>,
{
    let items: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    let existing: HashSet<&str> = items.iter().map(String::as_str).collect();
    let preferred_set: HashSet<&str> = preferred.iter().map(AsRef::as_ref).collect();

    let mut placed = HashSet::new();
    let mut ordered: Vec<String> = preferred
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| existing.contains(p) && placed.insert(*p))
        .map(str::to_string)
        .collect();

    let mut rest: Vec<String> = items
        .iter()
        .filter(|i| !preferred_set.contains(i.as_str()))
        .cloned()
        .collect();
    rest.sort();

    ordered.extend(rest);
    ordered
}

/// Join items with `, ` into lines no wider than `max_width`.
///
/// Lines only break between items; an item wider than `max_width` sits on a line
/// of its own.
pub fn wrap_items<S: AsRef<str>>(items: &[S], max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0usize;

    for item in items {
        let item = item.as_ref();
        let item_width = item.chars().count();
        if line.is_empty() {
            line.push_str(item);
            width = item_width;
            continue;
        }
        if width + 2 + item_width <= max_width {
            line.push_str(", ");
            line.push_str(item);
            width += 2 + item_width;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(item);
            width = item_width;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Document without its leading `---` metadata block.
pub fn strip_frontmatter(document: &str) -> &str {
    FRONTMATTER_RE
        .find(document)
        .map_or(document, |m| &document[m.end()..])
}

/// The `updated:` timestamp recorded in a document.
pub fn extract_updated(document: &str) -> Option<Timestamp> {
    UPDATED_RE
        .captures(document)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_timestamp(m.as_str()))
}

/// Document with its first `updated:` line blanked, for comparisons that ignore
/// the timestamp.
pub fn mask_updated(document: &str) -> Cow<'_, str> {
    UPDATED_LINE_RE.replace(document, "")
}
