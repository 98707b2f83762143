use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The kind of object a completion entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum CompletionCategory {
    Column,
    Function,
    Table,
    View,
    Alias,
    Database,
    Keyword,
    Show,
    Change,
    User,
}

/// A single completion candidate, cased and positioned relative to the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    /// Text to insert.
    pub text: String,
    /// Character offset, relative to the cursor, where replacement starts.
    /// Always zero or negative.
    pub replace_from_offset: isize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CompletionCategory>,
    /// Database that was current when the entry was produced.
    pub schema_context: String,
}

/// A `(schema, relation, alias)` reference visible at the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            alias: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The name the statement uses to qualify this reference's columns.
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// A typed suggestion request produced by a context classifier.
///
/// Serialized with a `type` tag. Tags this version does not know deserialize
/// to [`Suggestion::Unknown`], which contributes no candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Suggestion {
    Column {
        #[serde(default)]
        tables: Vec<TableRef>,
        /// Keep only columns shared by more than one scoped table
        /// (`a JOIN b USING (`).
        #[serde(default, rename = "dropUnique")]
        drop_unique: bool,
    },
    Function {
        #[serde(default)]
        schema: Option<String>,
    },
    Table {
        #[serde(default)]
        schema: Option<String>,
    },
    View {
        #[serde(default)]
        schema: Option<String>,
    },
    Alias {
        #[serde(default)]
        aliases: Vec<String>,
    },
    Database,
    Keyword,
    Show,
    Change,
    User,
    #[serde(other)]
    Unknown,
}

impl Suggestion {
    /// Tag used on the wire and in logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Suggestion::Column { .. } => "column",
            Suggestion::Function { .. } => "function",
            Suggestion::Table { .. } => "table",
            Suggestion::View { .. } => "view",
            Suggestion::Alias { .. } => "alias",
            Suggestion::Database => "database",
            Suggestion::Keyword => "keyword",
            Suggestion::Show => "show",
            Suggestion::Change => "change",
            Suggestion::User => "user",
            Suggestion::Unknown => "unknown",
        }
    }
}

/// A request to complete the SQL at a cursor position.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// The full document text.
    pub sql: String,

    /// Byte offset of the cursor in `sql`.
    pub cursor_offset: usize,

    /// Overrides the completer's smart-completion setting for this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_completion: Option<bool>,
}

impl CompletionRequest {
    pub fn new(sql: impl Into<String>, cursor_offset: usize) -> Self {
        Self {
            sql: sql.into(),
            cursor_offset,
            smart_completion: None,
        }
    }
}
