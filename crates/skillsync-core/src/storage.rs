//! Persistence of the skill document.

use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Abstraction over where the skill document lives.
pub trait DocumentStore {
    /// Current document text; `None` when there is no document yet.
    fn read(&self) -> Result<Option<String>>;
    /// Replace the document. A failed write must leave the old document intact.
    fn write(&self, content: &str) -> Result<()>;
}

/// Document stored as a single file on disk.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    path: PathBuf,
}

impl FileDocumentStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DocumentStore for FileDocumentStore {
    fn read(&self) -> Result<Option<String>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(match String::from_utf8(bytes) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %self.path.display(), "Document is not valid UTF-8, decoding lossily");
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                },
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create '{}': {e}", parent.display()))
            })?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, content)
            .map_err(|e| Error::Storage(format!("Failed to write document: {e}")))?;

        #[cfg(target_os = "windows")]
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| Error::Storage(format!("Failed to remove existing document: {e}")))?;
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::Storage(format!("Failed to commit document: {e}")));
        }

        debug!(path = %self.path.display(), bytes = content.len(), "Saved document");
        Ok(())
    }
}
