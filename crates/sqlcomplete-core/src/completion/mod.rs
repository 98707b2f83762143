//! SQL completion module.
//!
//! [`Completer`] is the session-level entry point. It asks a
//! [`ContextClassifier`] what kind of identifier belongs at the cursor, resolves
//! each suggestion against the [`crate::Catalog`] and the lexicon, and ranks the
//! candidates with the [`crate::MatchEngine`].

mod classifier;
mod completer;

pub use classifier::{ContextClassifier, KeywordScanner, SqlContextClassifier};
pub use completer::{word_before_cursor, Completer, MAX_SQL_LENGTH};
