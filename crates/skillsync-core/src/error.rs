//! Error types and handling for skillsync-core operations.
//!
//! A single [`Error`] enum covers every failure of a sync run. The variants fall
//! into two families that callers treat differently:
//!
//! - **Upstream failures**: the sitemap fetch failed, returned a non-2xx status,
//!   or timed out. The previously written document stays authoritative and the
//!   run becomes a no-op.
//! - **Local failures**: the document could not be persisted. These indicate an
//!   environment problem and are surfaced to the caller.
//!
//! ```rust
//! use skillsync_core::Error;
//!
//! let err = Error::Timeout("sitemap fetch".to_string());
//! assert!(err.is_upstream_failure());
//! assert_eq!(err.category(), "timeout");
//!
//! let err = Error::Storage("disk full".to_string());
//! assert!(!err.is_upstream_failure());
//! ```

use thiserror::Error;

/// The main error type for skillsync-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Raised when reading the existing document or a configuration file fails
    /// for any reason other than the file being absent.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers connection failures and non-success HTTP statuses while fetching
    /// the sitemap. The underlying `reqwest::Error` is preserved.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The document could not be persisted.
    ///
    /// Writes go through a temp file and a rename, so this error never leaves a
    /// partially written document behind.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL is malformed or invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Operation timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Whether the failure originated upstream of the document.
    ///
    /// Upstream failures (fetch, status, timeout, bad sitemap URL) leave the
    /// existing document authoritative; callers log them and carry on. Local
    /// failures (`Io`, `Storage`, `Config`) are returned as real errors.
    #[must_use]
    pub const fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::NotFound(_)
                | Self::InvalidUrl(_)
                | Self::Timeout(_)
        )
    }

    /// Check if the error might be recoverable through a later attempt.
    ///
    /// Nothing in skillsync retries on its own; this only informs callers that
    /// schedule runs.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Returns one of `io`, `network`, `storage`, `config`,
    /// `not_found`, `invalid_url`, `timeout`, `serialization`, `other`.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Timeout(_) => "timeout",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_upstream_failures_keep_existing_document() {
        let upstream = [
            Error::NotFound("sitemap".into()),
            Error::InvalidUrl("::".into()),
            Error::Timeout("slow".into()),
        ];
        for err in upstream {
            assert!(err.is_upstream_failure(), "{err} should be upstream");
        }

        let local = [
            Error::Storage("disk full".into()),
            Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            Error::Config("bad width".into()),
        ];
        for err in local {
            assert!(!err.is_upstream_failure(), "{err} should be local");
        }
    }

    #[test]
    fn test_recoverable_io_kinds() {
        assert!(Error::Io(io::Error::new(io::ErrorKind::TimedOut, "t")).is_recoverable());
        assert!(Error::Io(io::Error::new(io::ErrorKind::Interrupted, "i")).is_recoverable());
        assert!(!Error::Io(io::Error::new(io::ErrorKind::NotFound, "n")).is_recoverable());
        assert!(Error::Timeout("t".into()).is_recoverable());
        assert!(!Error::NotFound("n".into()).is_recoverable());
    }

    #[test]
    fn test_categories() {
        assert_eq!(Error::Storage(String::new()).category(), "storage");
        assert_eq!(Error::InvalidUrl(String::new()).category(), "invalid_url");
        assert_eq!(Error::Other(String::new()).category(), "other");
    }

    #[test]
    fn test_from_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(json_err).category(), "serialization");

        let toml_err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        assert_eq!(Error::from(toml_err).category(), "serialization");

        let display = Error::Timeout("sitemap".into()).to_string();
        assert_eq!(display, "Timeout: sitemap");
    }
}
