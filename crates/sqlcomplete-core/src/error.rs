//! Error types for the completion engine.
//!
//! # Error Handling Strategy
//!
//! Completion favours availability over completeness, so most failures never
//! reach the caller:
//!
//! - [`CatalogError`]: problems applying a metadata refresh (a relation listed in a
//!   schema that was never registered, a row source that fails part way). These are
//!   logged and the offending rows are dropped; the catalog is left as it was.
//!
//! - [`CompletionError`]: a malformed [`crate::CompletionRequest`]. Returned as
//!   `Result<_, CompletionError>` from [`crate::Completer::complete_request`].
//!
//! - [`LexiconError`]: a lexicon source that cannot be decoded.
//!
//! Lookup misses are not errors at all; they resolve to empty candidate pools.

use thiserror::Error;

use crate::catalog::ObjectKind;

/// A catalog update that was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{kind} {name:?} listed in unrecognized schema {schema:?}")]
    UnknownSchema {
        kind: ObjectKind,
        name: String,
        schema: String,
    },

    #[error("column {column:?} listed for unknown {kind} {relation:?} in schema {schema:?}")]
    UnknownRelation {
        kind: ObjectKind,
        relation: String,
        column: String,
        schema: String,
    },

    #[error("{operation} source failed, no rows applied: {reason}")]
    SourceFailed {
        operation: &'static str,
        reason: String,
    },
}

/// A completion request that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("SQL exceeds maximum length of {max} bytes ({actual} bytes provided)")]
    InputTooLarge { max: usize, actual: usize },

    #[error("cursor_offset ({offset}) exceeds SQL length ({len})")]
    CursorOutOfBounds { offset: usize, len: usize },

    #[error("cursor_offset ({offset}) does not land on a valid UTF-8 character boundary")]
    CursorNotOnCharBoundary { offset: usize },
}

/// A lexicon source that could not be loaded.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("invalid lexicon JSON: {0}")]
    Json(#[from] serde_json::Error),
}
