//! Error types for change generation.

use std::path::PathBuf;

use crate::kind::{DiffOperation, ObjectKind};
use crate::object::NaturalKey;

/// Errors that can occur while resolving the kind order or generating changes.
#[derive(Debug, thiserror::Error)]
pub enum ChangeGenError {
    /// Registered generators declare contradictory `run_before`/`run_after` kinds.
    #[error(
        "Kind ordering cycle detected: {} (declared by {})",
        .cycle.iter().map(ToString::to_string).collect::<Vec<_>>().join(" -> "),
        .declared_by.join(", ")
    )]
    OrderingCycle {
        /// Kinds on the cycle, first kind repeated at the end.
        cycle: Vec<ObjectKind>,
        /// Generators whose declarations produced the cycle's edges.
        declared_by: Vec<String>,
    },

    /// A generator failed while processing one object.
    #[error("Generator '{generator}' failed to fix {operation} {kind} {key}: {source}")]
    GeneratorFailed {
        /// Name of the failing generator.
        generator: String,
        /// Kind of the object being fixed.
        kind: ObjectKind,
        /// Natural key of the object being fixed.
        key: NaturalKey,
        /// The diff operation being fixed.
        operation: DiffOperation,
        /// The underlying generator error.
        #[source]
        source: GeneratorError,
    },

    /// An object change filter expression could not be parsed.
    #[error("Invalid object filter '{expression}': {message}")]
    InvalidFilter {
        /// The offending filter entry.
        expression: String,
        /// Error message.
        message: String,
    },

    /// An object kind name could not be parsed.
    #[error("Unknown object kind: {0}")]
    UnknownKind(String),

    /// IO error (reading diff documents).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a diff document.
    #[error("Failed to parse diff file '{path}': {message}")]
    ParseError {
        /// Path to the diff file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by a change generator while fixing a single object.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The generator was handed an object of a kind it does not handle.
    #[error("Unsupported object kind: {0}")]
    UnsupportedKind(ObjectKind),

    /// The object is missing data the generator needs.
    #[error("Invalid object: {0}")]
    InvalidObject(String),

    /// A recursive fix requested through the chain failed.
    #[error(transparent)]
    Chain(#[from] Box<ChangeGenError>),

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

impl From<ChangeGenError> for GeneratorError {
    fn from(err: ChangeGenError) -> Self {
        Self::Chain(Box::new(err))
    }
}

/// Result type for change generation.
pub type Result<T> = std::result::Result<T, ChangeGenError>;
