use std::io;
use std::path::PathBuf;

/// A specialized [`Result`](std::result::Result) for ranking operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can be produced while recording accesses, configuring the
/// engine, or moving a store to and from disk.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The resource identifier was empty. The store is left unchanged.
    #[error("resource identifier must not be empty")]
    InvalidIdentifier,

    /// A persisted image could not be decoded.
    #[error("persisted history is corrupt: {reason}")]
    CorruptPersistedState {
        /// What was wrong with the image.
        reason: String,
    },

    /// The backing location could not be read or written.
    #[error("failed to access history at {}: {source}", .path.display())]
    PersistenceIo {
        /// The location that was being accessed.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// An exclusion pattern failed to compile.
    #[error("invalid exclusion pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
        /// Why the pattern was rejected.
        #[source]
        source: regex::Error,
    },

    /// A configuration value is out of range or could not be parsed.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        /// The configuration key at fault.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl Error {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptPersistedState {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::PersistenceIo {
            path: path.into(),
            source,
        }
    }
}
