//! Configuration for a skill document.
//!
//! Every field has a default, so an empty or absent file configures the Convex
//! documentation skill. Files are TOML:
//!
//! ```toml
//! name = "convex-docs"
//! sitemap_url = "https://docs.convex.dev/sitemap.xml"
//! base_url = "https://docs.convex.dev/"
//! document = "SKILL.md"
//! max_line_width = 100
//! fetch_timeout_secs = 30
//!
//! [check]
//! batch_size = 10
//! timeout_secs = 10
//! ```
//!
//! ## Discovery
//!
//! 1. An explicit path (`--config` / `SKILLSYNC_CONFIG`); it must exist.
//! 2. `skillsync.toml` in the working directory.
//! 3. `<platform config dir>/skillsync/config.toml`.
//! 4. Built-in defaults.
//!
//! ```rust
//! use skillsync_core::SkillConfig;
//!
//! let config: SkillConfig = toml::from_str("name = \"react-docs\"")?;
//! assert_eq!(config.list_tag(), "<react-docs-list>");
//! assert_eq!(config.host()?, "docs.convex.dev");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::classify::url_authority;
use crate::render::{DocumentFormat, MAX_LINE_WIDTH};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "skillsync.toml";

/// Everything needed to keep one skill document in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// Skill name; also names the list block (`<name-list>`).
    pub name: String,
    /// Skill description written to the metadata block.
    pub description: String,
    /// Sitemap to synchronize from.
    pub sitemap_url: String,
    /// Site root. Its authority is the only host whose URLs are kept, and it is
    /// written after the core marker.
    pub base_url: String,
    /// Path of the skill document.
    pub document: PathBuf,
    /// Maximum width of an item line.
    pub max_line_width: usize,
    /// Timeout for the sitemap request, in seconds.
    pub fetch_timeout_secs: u64,
    /// Link checker settings.
    pub check: CheckConfig,
}

/// Link checker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// URLs probed concurrently per batch.
    pub batch_size: usize,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for SkillConfig {
    fn default() -> Self {
        let format = DocumentFormat::default();
        Self {
            name: format.name,
            description: format.description,
            sitemap_url: "https://docs.convex.dev/sitemap.xml".to_string(),
            base_url: format.base_url,
            document: PathBuf::from("SKILL.md"),
            max_line_width: MAX_LINE_WIDTH,
            fetch_timeout_secs: 30,
            check: CheckConfig::default(),
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            timeout_secs: 10,
        }
    }
}

impl SkillConfig {
    /// Load and validate configuration using the discovery order above.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match Self::discover(explicit)? {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn discover(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file '{}' does not exist",
                    path.display()
                )));
            }
            return Ok(Some(path.to_path_buf()));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Ok(Some(local));
        }

        Ok(Self::global_path().filter(|path| path.is_file()))
    }

    /// `<platform config dir>/skillsync/config.toml`, when the platform has one.
    pub fn global_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "skillsync", "skillsync")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse a config file without validating it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        let config = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config '{}': {e}", path.display()))
        })?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Reject values the sync cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("name must not be empty".into()));
        }
        require_host("base_url", &self.base_url)?;
        require_host("sitemap_url", &self.sitemap_url)?;
        if self.max_line_width == 0 {
            return Err(Error::Config("max_line_width must be greater than 0".into()));
        }
        if self.check.batch_size == 0 {
            return Err(Error::Config("check.batch_size must be greater than 0".into()));
        }
        Ok(())
    }

    /// Authority (`host[:port]`) of `base_url`; the only host whose URLs are kept.
    pub fn host(&self) -> Result<String> {
        require_host("base_url", &self.base_url)
    }

    /// `<name-list>`
    pub fn list_tag(&self) -> String {
        format!("<{}-list>", self.name)
    }

    /// Fixed document shape derived from this config.
    pub fn document_format(&self) -> DocumentFormat {
        DocumentFormat {
            name: self.name.clone(),
            description: self.description.clone(),
            base_url: self.base_url.clone(),
            max_line_width: self.max_line_width,
        }
    }

    /// Sitemap request timeout.
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl CheckConfig {
    /// Per-request timeout for link probes.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn require_host(field: &str, raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|e| Error::Config(format!("{field} '{raw}': {e}")))?;
    url_authority(&url).ok_or_else(|| Error::Config(format!("{field} '{raw}' has no host")))
}
