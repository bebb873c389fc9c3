//! # Errors
//!
//! Every node operation either succeeds completely or returns one of these.
//! Nothing is retried internally; the host decides what to do with a failure.

use thiserror::Error;

/// Errors raised by node operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PackError {
    /// A field was read from a bundle that is not there
    #[error("missing field: {field}")]
    MissingField { field: String },

    /// Random selection over a zero-length list
    #[error("cannot select from an empty list")]
    EmptyInput,

    /// A token of a numeric list is not a float
    #[error("malformed number '{token}' in numeric list")]
    Parse { token: String },

    /// A filename template could not be parsed or rendered
    ///
    /// Covers an unknown placeholder, unbalanced braces, an unknown
    /// conversion and a format spec that does not fit the field. Numeric
    /// list tokens use `Parse` instead.
    #[error("template error: {0}")]
    Template(String),

    /// A value does not fit the requested range
    #[error("value out of range: {0}")]
    Range(String),

    /// A host input carried a value of the wrong type
    #[error("input '{field}' expected {expected}")]
    TypeMismatch { field: String, expected: &'static str },

    /// No node is registered under this name
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// Configuration text could not be parsed
    #[error("config error: {0}")]
    Config(String),
}

impl PackError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        PackError::MissingField { field: field.into() }
    }
}

/// Result type for node operations
pub type PackResult<T> = Result<T, PackError>;
