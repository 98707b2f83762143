//! Cursor-context classification.
//!
//! A [`ContextClassifier`] turns the text around the cursor into an ordered list
//! of [`Suggestion`] requests; a [`KeywordScanner`] finds the keyword preceding the
//! cursor so keyword completions can be narrowed to those that may follow it.
//!
//! [`SqlContextClassifier`] is the token-based implementation of both. It is a
//! heuristic over the `sqlparser` tokenizer, not a parser: it looks at the last
//! significant token of the statement under the cursor and at the table
//! references in that statement.

use sqlparser::dialect::MySqlDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer, TokenizerError, Word};

use crate::types::{Suggestion, TableRef};

/// Produces the ordered suggestion requests for a cursor position.
pub trait ContextClassifier: Send + Sync {
    fn classify(&self, document: &str, text_before_cursor: &str) -> Vec<Suggestion>;
}

impl<F> ContextClassifier for F
where
    F: Fn(&str, &str) -> Vec<Suggestion> + Send + Sync,
{
    fn classify(&self, document: &str, text_before_cursor: &str) -> Vec<Suggestion> {
        self(document, text_before_cursor)
    }
}

/// Finds the keyword closest before the cursor.
pub trait KeywordScanner: Send + Sync {
    /// The upper-cased keyword, or `None` when the text contains no keyword.
    fn previous_keyword(&self, text_before_cursor: &str) -> Option<String>;
}

/// Words that end a table reference instead of naming or aliasing it.
const TABLE_TERMINATORS: &[&str] = &[
    "AS",
    "CROSS",
    "FOR",
    "FROM",
    "FULL",
    "GROUP",
    "HAVING",
    "INNER",
    "INTO",
    "JOIN",
    "LEFT",
    "LIMIT",
    "LOCK",
    "NATURAL",
    "ON",
    "ORDER",
    "OUTER",
    "PARTITION",
    "RIGHT",
    "SELECT",
    "SET",
    "STRAIGHT_JOIN",
    "UNION",
    "USING",
    "VALUES",
    "WHERE",
    "WINDOW",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlContextClassifier;

impl SqlContextClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl ContextClassifier for SqlContextClassifier {
    fn classify(&self, document: &str, text_before_cursor: &str) -> Vec<Suggestion> {
        let Ok(before) = tokenize_sql(text_before_cursor) else {
            return vec![Suggestion::Keyword];
        };

        let statement_index = before
            .iter()
            .filter(|token| matches!(token, Token::SemiColon))
            .count();
        let mut current = split_statements(before).pop().unwrap_or_default();

        // The word under the cursor is what is being completed, not context.
        let typing = !text_before_cursor.is_empty()
            && !text_before_cursor.ends_with(char::is_whitespace);
        if typing && matches!(current.last(), Some(Token::Word(_))) {
            current.pop();
        }

        let qualifier = match current.as_slice() {
            [.., Token::Word(word), Token::Period] => Some(word.value.clone()),
            _ => None,
        };
        if qualifier.is_some() {
            current.truncate(current.len() - 2);
        }

        // Table references come from the whole statement, including text after
        // the cursor (`SELECT | FROM users`).
        let statement = tokenize_sql(document)
            .ok()
            .and_then(|tokens| split_statements(tokens).into_iter().nth(statement_index))
            .unwrap_or_else(|| current.clone());
        let tables = parse_tables(&statement);

        let head = current.first().and_then(keyword_from_token);
        let context = Context {
            tables,
            qualifier,
            head,
        };

        let Some(last) = current.last() else {
            return match context.qualifier {
                Some(_) => context.columns(),
                None => vec![Suggestion::Keyword],
            };
        };

        match last {
            Token::Word(word) => match keyword_from_word(word) {
                Some(keyword) => context.after_keyword(&keyword, current.len() == 1),
                None if context.qualifier.is_some() => context.columns(),
                None => vec![Suggestion::Keyword],
            },
            Token::Comma if context.head.as_deref() == Some("CHANGE") => {
                vec![Suggestion::Change]
            }
            Token::Comma | Token::LParen => match clause_keyword(&current).as_deref() {
                Some("INTO") if has_insert_target(&current) => context.columns(),
                Some("FROM" | "JOIN" | "UPDATE" | "INTO") => context.relations(),
                Some("USING") => context.shared_columns(),
                _ => context.columns(),
            },
            Token::Eq | Token::Neq | Token::Lt | Token::Gt | Token::LtEq | Token::GtEq => {
                context.columns()
            }
            _ if context.qualifier.is_some() => context.columns(),
            _ => vec![Suggestion::Keyword],
        }
    }
}

impl KeywordScanner for SqlContextClassifier {
    fn previous_keyword(&self, text_before_cursor: &str) -> Option<String> {
        let mut tokens = tokenize_sql(text_before_cursor).ok()?;
        // A keyword still being typed does not narrow its own completions.
        if !text_before_cursor.ends_with(char::is_whitespace)
            && matches!(tokens.last(), Some(Token::Word(_)))
        {
            tokens.pop();
        }
        tokens.iter().rev().find_map(|token| match token {
            Token::Word(word) => keyword_from_word(word),
            _ => None,
        })
    }
}

/// What the classifier knows about the statement under the cursor.
struct Context {
    tables: Vec<TableRef>,
    /// `q` in a trailing `q.`
    qualifier: Option<String>,
    /// Keyword opening the statement.
    head: Option<String>,
}

impl Context {
    fn after_keyword(&self, keyword: &str, starts_statement: bool) -> Vec<Suggestion> {
        match keyword {
            "SELECT" | "WHERE" | "HAVING" | "BY" | "SET" | "AND" | "OR" | "NOT" | "DISTINCT"
            | "CASE" | "WHEN" | "THEN" | "ELSE" => self.columns(),
            "ON" => self.join_condition(),
            "USING" => self.shared_columns(),
            "FROM" | "JOIN" | "UPDATE" | "INTO" | "TABLE" | "TRUNCATE" => self.relations(),
            "DESC" | "DESCRIBE" | "EXPLAIN" if starts_statement => self.relations(),
            "USE" | "DATABASE" | "SCHEMA" => vec![Suggestion::Database],
            "SHOW" => vec![Suggestion::Show],
            "CHANGE" => vec![Suggestion::Change],
            "TO" if self.head.as_deref() == Some("CHANGE") => vec![Suggestion::Change],
            "USER" | "FOR" if !self.reads_or_writes_rows() => vec![Suggestion::User],
            _ if self.qualifier.is_some() => self.columns(),
            _ => vec![Suggestion::Keyword],
        }
    }

    /// DML statements name relations, not accounts, with `USER` or `FOR`.
    fn reads_or_writes_rows(&self) -> bool {
        matches!(
            self.head.as_deref(),
            Some("SELECT" | "INSERT" | "UPDATE" | "DELETE" | "REPLACE" | "WITH")
        )
    }

    fn columns(&self) -> Vec<Suggestion> {
        match &self.qualifier {
            Some(qualifier) => {
                let tables = self
                    .tables
                    .iter()
                    .filter(|table| table.qualifier().eq_ignore_ascii_case(qualifier))
                    .cloned()
                    .collect();
                vec![
                    Suggestion::Column {
                        tables,
                        drop_unique: false,
                    },
                    Suggestion::Table {
                        schema: Some(qualifier.clone()),
                    },
                    Suggestion::View {
                        schema: Some(qualifier.clone()),
                    },
                    Suggestion::Function {
                        schema: Some(qualifier.clone()),
                    },
                ]
            }
            None => vec![
                Suggestion::Column {
                    tables: self.tables.clone(),
                    drop_unique: false,
                },
                Suggestion::Function { schema: None },
                Suggestion::Keyword,
            ],
        }
    }

    fn shared_columns(&self) -> Vec<Suggestion> {
        vec![Suggestion::Column {
            tables: self.tables.clone(),
            drop_unique: true,
        }]
    }

    fn join_condition(&self) -> Vec<Suggestion> {
        if self.qualifier.is_some() {
            return self.columns();
        }
        let aliases = self
            .tables
            .iter()
            .map(|table| table.qualifier().to_string())
            .filter(|alias| !alias.is_empty())
            .collect();
        vec![
            Suggestion::Alias { aliases },
            Suggestion::Column {
                tables: self.tables.clone(),
                drop_unique: false,
            },
        ]
    }

    fn relations(&self) -> Vec<Suggestion> {
        match &self.qualifier {
            Some(schema) => vec![
                Suggestion::Table {
                    schema: Some(schema.clone()),
                },
                Suggestion::View {
                    schema: Some(schema.clone()),
                },
            ],
            None => vec![
                Suggestion::Table { schema: None },
                Suggestion::View { schema: None },
                Suggestion::Database,
            ],
        }
    }
}

fn tokenize_sql(sql: &str) -> Result<Vec<Token>, TokenizerError> {
    let dialect = MySqlDialect {};
    let tokens = Tokenizer::new(&dialect, sql).tokenize()?;
    Ok(tokens
        .into_iter()
        .filter(|token| !matches!(token, Token::Whitespace(_)))
        .collect())
}

/// Splits tokens on `;`. Always yields at least one (possibly empty) statement,
/// and a trailing `;` opens a new empty one.
fn split_statements(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut statements = vec![Vec::new()];
    for token in tokens {
        if matches!(token, Token::SemiColon) {
            statements.push(Vec::new());
            continue;
        }
        if let Some(current) = statements.last_mut() {
            current.push(token);
        }
    }
    statements
}

fn keyword_from_word(word: &Word) -> Option<String> {
    (word.quote_style.is_none() && word.keyword != Keyword::NoKeyword)
        .then(|| word.value.to_uppercase())
}

fn keyword_from_token(token: &Token) -> Option<String> {
    match token {
        Token::Word(word) => keyword_from_word(word),
        _ => None,
    }
}

fn is_identifier_word(word: &Word) -> bool {
    word.quote_style.is_some()
        || word.keyword == Keyword::NoKeyword
        || !TABLE_TERMINATORS.contains(&word.value.to_uppercase().as_str())
}

/// Whether a relation name follows the last `INTO`, so a `(` or `,` after it
/// belongs to the insert column list.
fn has_insert_target(tokens: &[Token]) -> bool {
    tokens
        .iter()
        .rev()
        .take_while(|token| keyword_from_token(token).as_deref() != Some("INTO"))
        .any(|token| matches!(token, Token::Word(word) if is_identifier_word(word)))
}

/// The most recent keyword that opens a list (`FROM a, b`, `USING (a, b)`).
fn clause_keyword(tokens: &[Token]) -> Option<String> {
    tokens.iter().rev().find_map(|token| {
        keyword_from_token(token).filter(|keyword| {
            matches!(
                keyword.as_str(),
                "SELECT"
                    | "FROM"
                    | "JOIN"
                    | "UPDATE"
                    | "INTO"
                    | "WHERE"
                    | "ON"
                    | "USING"
                    | "SET"
                    | "BY"
                    | "HAVING"
                    | "VALUES"
            )
        })
    })
}

fn parse_tables(tokens: &[Token]) -> Vec<TableRef> {
    let mut tables = Vec::new();
    let mut in_from_clause = false;
    let mut expecting_table = false;
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];

        if let Some(keyword) = keyword_from_token(token).as_deref() {
            match keyword {
                "FROM" => {
                    in_from_clause = true;
                    expecting_table = true;
                    index += 1;
                    continue;
                }
                "JOIN" | "STRAIGHT_JOIN" | "UPDATE" | "INTO" | "TABLE" => {
                    expecting_table = true;
                    index += 1;
                    continue;
                }
                "WHERE" | "GROUP" | "ORDER" | "HAVING" | "LIMIT" | "ON" | "USING" | "SET"
                | "WINDOW" | "UNION" => {
                    in_from_clause = false;
                    expecting_table = false;
                }
                _ => {}
            }
        }

        if in_from_clause && matches!(token, Token::Comma) {
            expecting_table = true;
            index += 1;
            continue;
        }

        if !expecting_table {
            index += 1;
            continue;
        }

        // Derived table: only its alias is visible.
        if matches!(token, Token::LParen) {
            let mut depth = 1;
            index += 1;
            while index < tokens.len() && depth > 0 {
                match tokens[index] {
                    Token::LParen => depth += 1,
                    Token::RParen => depth -= 1,
                    _ => {}
                }
                index += 1;
            }

            let (alias, consumed) = parse_alias(tokens, index);
            if let Some(alias) = alias {
                tables.push(TableRef::new("").with_alias(alias));
            }
            index = consumed;
            expecting_table = false;
            continue;
        }

        let Some((mut table, consumed)) = parse_table_name(tokens, index) else {
            index += 1;
            continue;
        };

        let (alias, consumed_alias) = parse_alias(tokens, consumed);
        table.alias = alias;
        tables.push(table);
        index = consumed_alias;
        expecting_table = false;
    }

    tables
}

fn parse_table_name(tokens: &[Token], start: usize) -> Option<(TableRef, usize)> {
    let mut parts = Vec::new();
    let mut index = start;

    while let Some(Token::Word(word)) = tokens.get(index) {
        if !is_identifier_word(word) {
            break;
        }
        parts.push(word.value.clone());
        index += 1;

        if matches!(tokens.get(index), Some(Token::Period)) {
            index += 1;
            continue;
        }
        break;
    }

    let name = parts.pop()?;
    let mut table = TableRef::new(name);
    table.schema = parts.pop();
    Some((table, index))
}

fn parse_alias(tokens: &[Token], start: usize) -> (Option<String>, usize) {
    let mut index = start;

    if tokens.get(index).and_then(keyword_from_token).as_deref() == Some("AS") {
        index += 1;
    }

    if let Some(Token::Word(word)) = tokens.get(index) {
        if is_identifier_word(word) {
            return (Some(word.value.clone()), index + 1);
        }
    }

    (None, index)
}
