use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::{Catalog, ObjectKind, SharedCatalog, WILDCARD};
use crate::error::CompletionError;
use crate::lexicon::Lexicon;
use crate::matcher::{MatchEngine, MatchMode};
use crate::types::{
    CompleterSettings, CompletionCategory, CompletionEntry, CompletionRequest, KeywordCasing,
    Suggestion,
};

use super::classifier::{ContextClassifier, KeywordScanner, SqlContextClassifier};

/// Maximum SQL input size (10MB) to prevent memory exhaustion.
pub const MAX_SQL_LENGTH: usize = 10 * 1024 * 1024;

/// A completion session.
///
/// Owns the session's casing policy and shares its catalog with whatever keeps
/// the catalog up to date. `Completer` is `Send + Sync`; concurrent requests
/// only take the catalog's read lock.
pub struct Completer {
    lexicon: Arc<Lexicon>,
    catalog: SharedCatalog,
    engine: MatchEngine,
    smart_completion: bool,
    classifier: Arc<dyn ContextClassifier>,
    keyword_scanner: Arc<dyn KeywordScanner>,
}

impl Completer {
    /// Creates a session over an empty catalog and the MySQL lexicon.
    pub fn new(settings: &CompleterSettings) -> Self {
        Self::with_catalog(settings, Catalog::shared(Lexicon::mysql()))
    }

    /// Creates a session over an existing catalog, using the catalog's lexicon.
    pub fn with_catalog(settings: &CompleterSettings, catalog: SharedCatalog) -> Self {
        let lexicon = Arc::clone(catalog.read().lexicon());
        Self {
            lexicon,
            catalog,
            engine: MatchEngine::new(settings.keyword_casing),
            smart_completion: settings.smart_completion,
            classifier: Arc::new(SqlContextClassifier),
            keyword_scanner: Arc::new(SqlContextClassifier),
        }
    }

    /// Replaces the context classifier.
    pub fn with_classifier(mut self, classifier: impl ContextClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Replaces the previous-keyword scanner.
    pub fn with_keyword_scanner(mut self, scanner: impl KeywordScanner + 'static) -> Self {
        self.keyword_scanner = Arc::new(scanner);
        self
    }

    /// The catalog this session reads. Refresh collaborators write through it.
    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// The current casing policy; `Auto` until the first match request fixes it.
    pub fn casing(&self) -> KeywordCasing {
        self.engine.casing()
    }

    pub fn smart_completion(&self) -> bool {
        self.smart_completion
    }

    /// Completes the word before the cursor.
    ///
    /// `smart_completion` overrides the session setting for this call. Results are
    /// grouped by suggestion in classifier order and ranked within each group.
    pub fn complete(
        &self,
        document: &str,
        text_before_cursor: &str,
        word_before_cursor: &str,
        smart_completion: Option<bool>,
    ) -> Vec<CompletionEntry> {
        if !smart_completion.unwrap_or(self.smart_completion) {
            let catalog = self.catalog.read();
            return self.engine.find_matches(
                word_before_cursor,
                catalog.all_completions(),
                MatchMode::Prefix,
                None,
                catalog.current_database(),
            );
        }

        let suggestions = self.classifier.classify(document, text_before_cursor);
        let catalog = self.catalog.read();

        let mut entries = Vec::new();
        for suggestion in &suggestions {
            #[cfg(feature = "tracing")]
            tracing::debug!(suggestion = suggestion.type_name(), "resolving suggestion");

            entries.extend(self.resolve(
                &catalog,
                suggestion,
                text_before_cursor,
                word_before_cursor,
            ));
        }
        entries
    }

    /// Completes at `request.cursor_offset` after validating the request.
    ///
    /// The text before the cursor is the document up to the offset; the word
    /// before the cursor is everything after its last whitespace.
    pub fn complete_request(
        &self,
        request: &CompletionRequest,
    ) -> Result<Vec<CompletionEntry>, CompletionError> {
        let sql = request.sql.as_str();
        let sql_len = sql.len();

        if sql_len > MAX_SQL_LENGTH {
            return Err(CompletionError::InputTooLarge {
                max: MAX_SQL_LENGTH,
                actual: sql_len,
            });
        }
        if request.cursor_offset > sql_len {
            return Err(CompletionError::CursorOutOfBounds {
                offset: request.cursor_offset,
                len: sql_len,
            });
        }
        if !sql.is_char_boundary(request.cursor_offset) {
            return Err(CompletionError::CursorNotOnCharBoundary {
                offset: request.cursor_offset,
            });
        }

        let before = &sql[..request.cursor_offset];
        Ok(self.complete(
            sql,
            before,
            word_before_cursor(before),
            request.smart_completion,
        ))
    }

    fn resolve(
        &self,
        catalog: &Catalog,
        suggestion: &Suggestion,
        text_before_cursor: &str,
        word: &str,
    ) -> Vec<CompletionEntry> {
        let schema_context = catalog.current_database();
        let fuzzy = |pool: Vec<String>, category: CompletionCategory| {
            self.engine
                .find_matches(word, pool, MatchMode::Fuzzy, Some(category), schema_context)
        };

        match suggestion {
            Suggestion::Column {
                tables,
                drop_unique,
            } => {
                let mut columns = catalog.resolve_scoped_columns(tables);
                if *drop_unique {
                    columns = shared_columns(columns);
                }
                fuzzy(columns, CompletionCategory::Column)
            }
            Suggestion::Function { schema } => {
                let schema = schema.as_deref().filter(|schema| !schema.is_empty());
                let mut entries = fuzzy(
                    catalog.resolve_schema_objects(schema, ObjectKind::Functions),
                    CompletionCategory::Function,
                );
                if schema.is_none() {
                    entries.extend(self.engine.find_matches(
                        word,
                        self.lexicon.functions(),
                        MatchMode::Prefix,
                        Some(CompletionCategory::Function),
                        schema_context,
                    ));
                }
                entries
            }
            Suggestion::Table { schema } => fuzzy(
                catalog.resolve_schema_objects(schema.as_deref(), ObjectKind::Tables),
                CompletionCategory::Table,
            ),
            Suggestion::View { schema } => fuzzy(
                catalog.resolve_schema_objects(schema.as_deref(), ObjectKind::Views),
                CompletionCategory::View,
            ),
            Suggestion::Alias { aliases } => fuzzy(aliases.clone(), CompletionCategory::Alias),
            Suggestion::Database => {
                fuzzy(catalog.databases().to_vec(), CompletionCategory::Database)
            }
            Suggestion::Keyword => {
                let previous = self.keyword_scanner.previous_keyword(text_before_cursor);
                let follows = previous
                    .as_deref()
                    .and_then(|keyword| self.lexicon.follows(keyword))
                    .filter(|follows| !follows.is_empty());
                let pool: Vec<&str> = match follows {
                    Some(follows) => follows.iter().map(String::as_str).collect(),
                    None => self.lexicon.keyword_heads().collect(),
                };
                self.engine.find_matches(
                    word,
                    pool,
                    MatchMode::Prefix,
                    Some(CompletionCategory::Keyword),
                    schema_context,
                )
            }
            Suggestion::Show => fuzzy(catalog.show_items().to_vec(), CompletionCategory::Show),
            Suggestion::Change => {
                fuzzy(catalog.change_items().to_vec(), CompletionCategory::Change)
            }
            Suggestion::User => fuzzy(catalog.users().to_vec(), CompletionCategory::User),
            Suggestion::Unknown => Vec::new(),
        }
    }
}

/// Text after the last whitespace character of `text_before_cursor`.
pub fn word_before_cursor(text_before_cursor: &str) -> &str {
    text_before_cursor
        .rfind(char::is_whitespace)
        .map_or(text_before_cursor, |index| {
            let width = text_before_cursor[index..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            &text_before_cursor[index + width..]
        })
}

/// Column names listed by more than one scoped table, in first-seen order.
fn shared_columns(columns: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for column in &columns {
        *counts.entry(column.as_str()).or_default() += 1;
    }

    let mut shared: Vec<String> = Vec::new();
    for column in &columns {
        if column != WILDCARD && counts[column.as_str()] > 1 && !shared.contains(column) {
            shared.push(column.clone());
        }
    }
    shared
}
