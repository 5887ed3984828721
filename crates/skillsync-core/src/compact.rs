//! Prefix-sharing compaction of item paths.
//!
//! A group's items are rendered as a comma-separated list in which runs of items
//! sharing a first segment are written once with the prefix and then bare:
//!
//! ```text
//! a/x, a/y, b/z   ->   a/x, y, b/z
//! ```
//!
//! A reader carries the last prefix forward until the next prefixed entry. The
//! compacted form is for display only and is never turned back into URLs by the
//! sync itself.
//!
//! Recursion is bounded by [`MAX_COMPACT_DEPTH`]: suffix lists are compacted again
//! at most that many times, so at most three path levels are folded together.
//! Past the bound suffixes are sorted as flat strings, which keeps the stack depth
//! constant no matter how deep the input paths go.

use crate::classify::INDEX_ITEM;
use std::collections::BTreeMap;

/// How many times suffix lists are recursively compacted (three path levels).
pub const MAX_COMPACT_DEPTH: usize = 2;

/// Compact a group's item paths.
///
/// Output order: the literal `index` item first, then single-segment items sorted,
/// then one run per prefix in sorted prefix order.
///
/// ```
/// use skillsync_core::compact::compact;
///
/// assert_eq!(compact(["b/z", "a/y", "a/x"]), ["a/x", "y", "b/z"]);
/// assert_eq!(compact(["setup", "index", "api/auth"]), ["index", "setup", "api/auth"]);
/// ```
pub fn compact<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let owned: Vec<S> = items.into_iter().collect();
    compact_level(owned.iter().map(AsRef::as_ref).collect(), 0)
}

fn compact_level(items: Vec<&str>, depth: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(items.len());
    let mut standalone = Vec::new();
    let mut prefixed: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut has_index = false;

    for item in items {
        if item == INDEX_ITEM {
            has_index = true;
            continue;
        }
        match item.split_once('/') {
            Some((prefix, rest)) => prefixed.entry(prefix).or_default().push(rest),
            None => standalone.push(item),
        }
    }

    if has_index {
        out.push(INDEX_ITEM.to_string());
    }
    standalone.sort_unstable();
    out.extend(standalone.into_iter().map(str::to_string));

    for (prefix, suffixes) in prefixed {
        let compacted = if depth < MAX_COMPACT_DEPTH {
            compact_level(suffixes, depth + 1)
        } else {
            let mut flat: Vec<String> = suffixes.into_iter().map(str::to_string).collect();
            flat.sort_unstable();
            flat
        };

        let mut run = compacted.into_iter();
        let Some(first) = run.next() else {
            continue;
        };
        out.push(format!("{prefix}/{first}"));
        out.extend(run);
    }

    out
}

/// Rebuild full item paths from a compacted list by prefix carry.
///
/// An entry containing `/` is taken as a full path and sets the carried prefix to
/// everything up to its last `/`; a bare entry is appended to the carried prefix.
/// This is exact for items at most two segments deep, and for deeper runs whose
/// members share every intermediate segment. Mixed-depth runs are ambiguous in the
/// compacted form itself and resolve to the deepest carried prefix.
///
/// ```
/// use skillsync_core::compact::expand_compacted;
///
/// assert_eq!(
///     expand_compacted(["index", "a/x", "y", "b/z"]),
///     ["index", "a/x", "a/y", "b/z"]
/// );
/// ```
pub fn expand_compacted<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut carry = String::new();
    entries
        .into_iter()
        .map(|entry| {
            let entry = entry.as_ref();
            if let Some(idx) = entry.rfind('/') {
                carry = entry[..=idx].to_string();
                entry.to_string()
            } else {
                format!("{carry}{entry}")
            }
        })
        .collect()
}
