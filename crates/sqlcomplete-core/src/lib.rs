pub mod catalog;
pub mod completion;
pub mod error;
pub mod escape;
pub mod lexicon;
pub mod matcher;
pub mod types;

// Re-export main types and functions
pub use catalog::{Catalog, ObjectKind, RelationKind, SharedCatalog, WILDCARD};
pub use completion::{
    word_before_cursor, Completer, ContextClassifier, KeywordScanner, SqlContextClassifier,
    MAX_SQL_LENGTH,
};
pub use error::{CatalogError, CompletionError, LexiconError};
pub use escape::{escape_name, needs_quoting, unescape_name};
pub use lexicon::Lexicon;
pub use matcher::{last_word, MatchEngine, MatchMode};

pub use types::{
    CompleterSettings, CompletionCategory, CompletionEntry, CompletionRequest, KeywordCasing,
    Suggestion, TableRef,
};
