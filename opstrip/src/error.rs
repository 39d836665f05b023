//! Error type shared by the catalog, configuration and sanitizer layers.

use std::fmt;

/// Errors raised by catalog lookups, configuration parsing and sanitization.
///
/// Sanitizing a well-formed document never fails except for
/// [`DepthExceeded`](Self::DepthExceeded); every other variant is raised
/// eagerly at the point of misuse (catalog queries, configuration parsing,
/// textual input).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Group name not present in the catalog.
    UnknownGroup(String),
    /// Category name not present in the given group.
    UnknownCategory {
        /// The group that was searched.
        group: String,
        /// The category that was not found.
        category: String,
    },
    /// Malformed argument: non-integer bitmask, bad configuration shape,
    /// or an invalid custom catalog.
    InvalidArgument(String),
    /// Document nesting exceeds the configured maximum depth.
    DepthExceeded {
        /// The maximum allowed nesting depth.
        max: usize,
    },
    /// Invalid JSON syntax or encoding.
    InvalidJson,
    /// Textual input is larger than the configured limit.
    InputTooLarge {
        /// The maximum allowed size in bytes.
        max: usize,
        /// The actual size in bytes.
        actual: usize,
    },
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGroup(group) => write!(f, "unknown operator group `{group}`"),
            Self::UnknownCategory { group, category } => {
                write!(f, "unknown category `{category}` in operator group `{group}`")
            },
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::DepthExceeded { max } => {
                write!(f, "document nesting depth exceeds maximum {max}")
            },
            Self::InvalidJson => write!(f, "Invalid JSON syntax or encoding"),
            Self::InputTooLarge { max, actual } => {
                write!(f, "input of {actual} bytes exceeds maximum {max}")
            },
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
