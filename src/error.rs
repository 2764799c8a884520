//! Error types for md5sum.

use thiserror::Error;

/// Result type alias using md5sum's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for md5sum operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A buffer declares more bytes than its backing memory holds.
    #[error("malformed buffer: declared {declared} bytes but only {available} are readable")]
    MalformedBuffer {
        /// Length the buffer claims to have.
        declared: usize,
        /// Bytes actually readable from its memory.
        available: usize,
    },

    /// Memory allocation failed.
    #[error("memory allocation failed: {0}")]
    AllocationFailed(String),

    /// Pipeline description could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// No element with this name is known to the factory.
    #[error("unknown element: {0}")]
    UnknownElement(String),

    /// A property was missing, unknown, or carried a value of the wrong type.
    #[error("invalid property '{property}' on '{element}': {reason}")]
    InvalidProperty {
        /// Element the property was applied to.
        element: String,
        /// Property name.
        property: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Pipeline structure is invalid (missing source or sink, etc).
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building an [`Error::InvalidProperty`].
    pub(crate) fn invalid_property(
        element: impl Into<String>,
        property: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            element: element.into(),
            property: property.into(),
            reason: reason.into(),
        }
    }
}
