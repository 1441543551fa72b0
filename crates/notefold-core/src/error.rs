//! Error types for notefold-core

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for Notefold operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the Notefold crates
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Filesystem error, tagged with the path that was being accessed
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed input (frontmatter, index snapshot, response body)
    #[error("Parse error: {0}")]
    Parse(String),

    /// An operation failed for a reason not covered by another variant
    #[error("Operation failed: {0}")]
    Operation(String),

    /// A required resource does not exist
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Name or path of the missing resource
        name: String,
        /// What kind of resource was expected
        kind: String,
    },

    /// The remote search engine rejected a request or could not be reached
    #[error("Remote engine error: {message}")]
    Remote {
        /// HTTP status, when a response was received at all
        status: Option<u16>,
        /// Error description or response body
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates an I/O error for the given path.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config(message.into())
    }

    /// Creates a parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse(message.into())
    }

    /// Creates a generic operation error.
    pub fn operation<S: Into<String>>(message: S) -> Self {
        Error::Operation(message.into())
    }

    /// Creates a not-found error.
    pub fn not_found<N: Into<String>, K: Into<String>>(name: N, kind: K) -> Self {
        Error::NotFound {
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Creates a remote engine error.
    pub fn remote<S: Into<String>>(status: Option<u16>, message: S) -> Self {
        Error::Remote {
            status,
            message: message.into(),
        }
    }

    /// HTTP status attached to a remote error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => *status,
            _ => None,
        }
    }
}
