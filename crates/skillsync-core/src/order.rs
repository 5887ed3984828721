//! Order memory recovered from a previously rendered document.
//!
//! The document is the only persistence, so the display order of groups and items
//! is read back out of it on every run and used as a sort preference when the
//! next document is rendered. It never decides which items exist.
//!
//! Parsing is a fold over lines carrying a [`Cursor`] value: a blank line resets
//! it, a core marker or group heading points it at a bucket, and any other line
//! while a bucket is active contributes comma-separated items.
//!
//! ```
//! use skillsync_core::order::{OrderMemory, CORE_GROUP};
//!
//! let doc = "CORE https://docs.convex.dev/\nhome, tutorial\n\nDATABASE /database/\nschemas, indexes\n";
//! let memory = OrderMemory::parse(doc);
//! assert_eq!(memory.group_order, vec![CORE_GROUP.to_string(), "database".to_string()]);
//! assert_eq!(memory.items("database"), ["schemas", "indexes"]);
//! assert_eq!(memory.label("database"), Some("DATABASE"));
//! ```

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Reserved group identifier for the ungrouped, top-level bucket.
pub const CORE_GROUP: &str = "__core__";

/// Token that opens the core section (`CORE <base url>`).
pub const CORE_MARKER: &str = "CORE ";

/// Label used when a group identifier has no alphanumeric characters.
const FALLBACK_LABEL: &str = "GROUP";

/// `DATABASE /database/`
#[allow(clippy::expect_used)]
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z0-9 ]+) /([^/]+)/$").expect("heading pattern compiles")
});

/// Remembered ordering preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderMemory {
    /// Groups in first-seen order, including [`CORE_GROUP`] when present.
    pub group_order: Vec<String>,
    /// Display label per group, as last seen.
    pub group_labels: BTreeMap<String, String>,
    /// Items per group in first-seen order, without duplicates.
    pub item_order: BTreeMap<String, Vec<String>>,
}

/// Which bucket subsequent item lines belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cursor {
    /// Outside any section.
    #[default]
    Idle,
    /// Inside the section of the given group.
    Group(String),
}

/// Shape of a single document line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Heading { label: &'a str, group: &'a str },
    Core,
    Items(&'a str),
}

fn classify_line(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    // Headings first: a group labelled `CORE CONCEPTS` is still a group.
    if let Some(caps) = HEADING_RE.captures(trimmed) {
        if let (Some(label), Some(group)) = (caps.get(1), caps.get(2)) {
            return Line::Heading {
                label: label.as_str().trim(),
                group: group.as_str().trim(),
            };
        }
    }
    if trimmed.starts_with(CORE_MARKER) {
        return Line::Core;
    }
    Line::Items(trimmed)
}

impl OrderMemory {
    /// Recover order memory from a document. Never fails; malformed input yields
    /// whatever could be recognized, possibly nothing.
    pub fn parse(document: &str) -> Self {
        let (memory, _) = document
            .lines()
            .fold((Self::default(), Cursor::Idle), |(memory, cursor), line| {
                memory.step(cursor, line)
            });
        memory
    }

    /// Apply one line, returning the updated memory and the next cursor.
    pub fn step(mut self, cursor: Cursor, line: &str) -> (Self, Cursor) {
        match classify_line(line) {
            Line::Blank => (self, Cursor::Idle),
            Line::Heading { label, group } => {
                self.note_group(group);
                self.group_labels
                    .insert(group.to_string(), label.to_string());
                (self, Cursor::Group(group.to_string()))
            },
            Line::Core => {
                self.note_group(CORE_GROUP);
                (self, Cursor::Group(CORE_GROUP.to_string()))
            },
            Line::Items(text) => {
                if let Cursor::Group(group) = &cursor {
                    self.note_items(group, text);
                }
                (self, cursor)
            },
        }
    }

    fn note_group(&mut self, group: &str) {
        if !self.group_order.iter().any(|g| g == group) {
            self.group_order.push(group.to_string());
        }
    }

    fn note_items(&mut self, group: &str, text: &str) {
        let seen = self.item_order.entry(group.to_string()).or_default();
        for item in text.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            if !seen.iter().any(|s| s == item) {
                seen.push(item.to_string());
            }
        }
    }

    /// Remembered item order for a group (empty when unknown).
    pub fn items(&self, group: &str) -> &[String] {
        self.item_order.get(group).map_or(&[], Vec::as_slice)
    }

    /// Remembered label for a group.
    pub fn label(&self, group: &str) -> Option<&str> {
        self.group_labels.get(group).map(String::as_str)
    }

    /// Remembered group order without the core bucket.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.group_order
            .iter()
            .map(String::as_str)
            .filter(|g| *g != CORE_GROUP)
    }

    /// True when nothing was recovered (cold start).
    pub fn is_empty(&self) -> bool {
        self.group_order.is_empty() && self.item_order.is_empty()
    }
}

/// Label for a group that has never been rendered before.
///
/// Uppercases the identifier and turns every character outside `[A-Z0-9]` into a
/// space, so the rendered heading is always recognized when the document is read
/// back.
pub fn default_label(group: &str) -> String {
    let label: String = group
        .to_uppercase()
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();
    let label = label.trim();
    if label.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        label.to_string()
    }
}
