//! Error types for the sifter crate.

use thiserror::Error;

use crate::links::LinkId;

/// Errors raised when a filter is built from invalid input.
///
/// Reading a missing field is never an error; these variants only cover
/// caller contract violations detected before any record is inspected.
#[derive(Debug, Error)]
pub enum SifterError {
    /// Mode string is not one of the recognised combination modes.
    #[error("unknown filter mode '{0}', expected one of: all, any, none (or and, or, not)")]
    UnknownMode(String),

    /// Criterion value is neither a scalar nor a list of scalars.
    #[error("invalid criterion for field '{field}': {reason}")]
    InvalidCriterion { field: String, reason: &'static str },

    /// Criteria document could not be parsed.
    #[error("invalid criteria document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sifter operations.
pub type Result<T> = std::result::Result<T, SifterError>;

/// Failures of [`update_link`](crate::links::update_link).
///
/// Each variant is distinct from a successful update, which returns the
/// link's id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The update did not name a link.
    #[error("link update has no link id")]
    MissingId,

    /// No stored link has the given id.
    #[error("link {0} does not exist")]
    NotFound(LinkId),
}
