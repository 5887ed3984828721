//! Registration of the skill with a plugin host.
//!
//! The host sees a fixed schema: a name, a description, and the document body
//! without its metadata block. [`load_skill`] is the entry point a host calls on
//! startup: it syncs, tolerates upstream failures, and registers whatever document
//! is on disk afterwards.

use crate::render::strip_frontmatter;
use crate::sitemap::SitemapSource;
use crate::storage::DocumentStore;
use crate::sync::{SkillSync, SyncOutcome};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A skill as handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRegistration {
    /// Skill key.
    pub name: String,
    /// One-line description shown by the host.
    pub description: String,
    /// Document body without the metadata block.
    pub content: String,
}

/// Something that accepts skill registrations.
pub trait SkillHost {
    /// Register or replace a skill.
    fn register_skill(&mut self, skill: SkillRegistration) -> Result<()>;
}

/// In-memory host keyed by skill name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillRegistry {
    skills: BTreeMap<String, SkillRegistration>,
}

impl SkillRegistry {
    /// Registered skill by name.
    pub fn get(&self, name: &str) -> Option<&SkillRegistration> {
        self.skills.get(name)
    }

    /// Registered skills in name order.
    pub fn iter(&self) -> impl Iterator<Item = &SkillRegistration> {
        self.skills.values()
    }

    /// Number of registered skills.
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl SkillHost for SkillRegistry {
    fn register_skill(&mut self, skill: SkillRegistration) -> Result<()> {
        self.skills.insert(skill.name.clone(), skill);
        Ok(())
    }
}

/// Sync, then register the document with `host`.
///
/// Upstream failures are logged and the existing document is registered; the
/// returned outcome is `None` in that case. Local failures (the document could
/// not be written or read) are returned. A missing document after the sync is
/// [`Error::NotFound`].
pub async fn load_skill<S, D, H>(sync: &SkillSync<S, D>, host: &mut H) -> Result<Option<SyncOutcome>>
where
    S: SitemapSource,
    D: DocumentStore,
    H: SkillHost + ?Sized,
{
    let outcome = match sync.run().await {
        Ok(outcome) => Some(outcome),
        Err(e) if e.is_upstream_failure() => {
            warn!(
                error = %e,
                category = e.category(),
                recoverable = e.is_recoverable(),
                "Skill sync failed, keeping existing document"
            );
            None
        },
        Err(e) => return Err(e),
    };

    let document = sync
        .store()
        .read()?
        .ok_or_else(|| Error::NotFound("Skill document does not exist".into()))?;

    let format = sync.format();
    host.register_skill(SkillRegistration {
        name: format.name.clone(),
        description: format.description.clone(),
        content: strip_frontmatter(&document).to_string(),
    })?;
    debug!(skill = %format.name, "Registered skill");

    Ok(outcome)
}
