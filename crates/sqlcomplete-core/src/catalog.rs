//! Per-session catalog of database metadata.
//!
//! [`Catalog`] is the completion engine's view of the live database: database
//! names, schema → relation → column metadata for tables and views, schema →
//! function names, and the dynamic lists (users, `SHOW` items, `CHANGE` items)
//! that feed administrative completions.
//!
//! # Updates
//!
//! The catalog is filled incrementally by a metadata-refresh collaborator calling
//! the `add_*` methods. Row-based updates take an iterator of `Result` rows and
//! are all-or-nothing per call: the rows are collected first, and if any row is an
//! error the whole call is logged and dropped. Relations listed under a schema
//! that was never registered with [`Catalog::add_schema`] are logged and skipped.
//!
//! # Invariants
//!
//! - All three namespaces (tables, views, functions) always exist.
//! - `all_completions` is a superset of every name accepted by any update.
//! - `reset` restores `all_completions` to exactly the lexicon keywords and
//!   functions.
//!
//! # Thread Safety
//!
//! `Catalog` itself is not synchronized. Sessions share it as a
//! [`SharedCatalog`], which serializes updates against completion reads.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::escape::escape_name;
use crate::lexicon::Lexicon;
use crate::types::TableRef;

/// Column list of a relation whose columns are not known yet.
pub const WILDCARD: &str = "*";

/// A catalog shared between the completer and the refresh collaborator.
pub type SharedCatalog = Arc<RwLock<Catalog>>;

/// Metadata namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    Tables,
    Views,
    Functions,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectKind::Tables => "tables",
            ObjectKind::Views => "views",
            ObjectKind::Functions => "functions",
        })
    }
}

/// Namespace that holds relations with columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    Tables,
    Views,
}

impl From<RelationKind> for ObjectKind {
    fn from(kind: RelationKind) -> Self {
        match kind {
            RelationKind::Tables => ObjectKind::Tables,
            RelationKind::Views => ObjectKind::Views,
        }
    }
}

/// relation name -> column names. Functions carry no column data.
type SchemaObjects = BTreeMap<String, Vec<String>>;

/// schema name -> objects, one map per namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DbMetadata {
    tables: BTreeMap<String, SchemaObjects>,
    views: BTreeMap<String, SchemaObjects>,
    functions: BTreeMap<String, SchemaObjects>,
}

impl DbMetadata {
    fn namespace(&self, kind: ObjectKind) -> &BTreeMap<String, SchemaObjects> {
        match kind {
            ObjectKind::Tables => &self.tables,
            ObjectKind::Views => &self.views,
            ObjectKind::Functions => &self.functions,
        }
    }

    fn namespace_mut(&mut self, kind: ObjectKind) -> &mut BTreeMap<String, SchemaObjects> {
        match kind {
            ObjectKind::Tables => &mut self.tables,
            ObjectKind::Views => &mut self.views,
            ObjectKind::Functions => &mut self.functions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    lexicon: Arc<Lexicon>,
    /// Not deduplicated: a refresh may announce the same database twice.
    databases: Vec<String>,
    metadata: DbMetadata,
    /// Every known name plus the lexicon; the pool for non-smart completion.
    all_completions: BTreeSet<String>,
    current_database: String,
    show_items: Vec<String>,
    change_items: Vec<String>,
    users: Vec<String>,
    extra_keywords: Vec<String>,
}

impl Catalog {
    /// Creates an empty catalog over `lexicon`.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        let mut catalog = Self {
            lexicon,
            databases: Vec::new(),
            metadata: DbMetadata::default(),
            all_completions: BTreeSet::new(),
            current_database: String::new(),
            show_items: Vec::new(),
            change_items: Vec::new(),
            users: Vec::new(),
            extra_keywords: Vec::new(),
        };
        catalog.reset();
        catalog
    }

    /// Wraps a new catalog for sharing with a refresh collaborator.
    pub fn shared(lexicon: Arc<Lexicon>) -> SharedCatalog {
        Arc::new(RwLock::new(Self::new(lexicon)))
    }

    /// Discards everything learned from the database.
    ///
    /// Completions fall back to the lexicon keywords and functions; `CHANGE`
    /// items are re-seeded from the lexicon.
    pub fn reset(&mut self) {
        self.databases = Vec::new();
        self.users = Vec::new();
        self.show_items = Vec::new();
        self.extra_keywords = Vec::new();
        self.change_items = self.lexicon.change_items().to_vec();
        self.current_database = String::new();
        self.metadata = DbMetadata::default();
        self.all_completions = self
            .lexicon
            .keywords()
            .iter()
            .chain(self.lexicon.functions())
            .cloned()
            .collect();
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    pub fn escape_name(&self, name: &str) -> String {
        escape_name(name, &self.lexicon)
    }

    pub fn set_current_database(&mut self, name: impl Into<String>) {
        self.current_database = name.into();
    }

    pub fn current_database(&self) -> &str {
        &self.current_database
    }

    pub fn databases(&self) -> &[String] {
        &self.databases
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn show_items(&self) -> &[String] {
        &self.show_items
    }

    pub fn change_items(&self) -> &[String] {
        &self.change_items
    }

    pub fn extra_keywords(&self) -> &[String] {
        &self.extra_keywords
    }

    pub fn all_completions(&self) -> &BTreeSet<String> {
        &self.all_completions
    }

    pub fn add_databases<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            self.all_completions.insert(name.clone());
            self.databases.push(name);
        }
    }

    /// Registers `name` in every namespace. Registering it again empties it.
    pub fn add_schema(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        for kind in [ObjectKind::Tables, ObjectKind::Views, ObjectKind::Functions] {
            self.metadata
                .namespace_mut(kind)
                .insert(name.to_string(), SchemaObjects::new());
        }
        self.all_completions.insert(name.to_string());
    }

    /// Adds tables or views of the current database, each with a `*` column list.
    pub fn add_relations<I, E>(&mut self, rows: I, kind: RelationKind)
    where
        I: IntoIterator<Item = Result<String, E>>,
        E: fmt::Display,
    {
        let kind = ObjectKind::from(kind);
        let Some(rows) = materialize(rows, "add_relations") else {
            return;
        };

        let schema = self.current_database.clone();
        for relation in rows {
            let relation = self.escape_name(&relation);
            match self.metadata.namespace_mut(kind).get_mut(&schema) {
                Some(objects) => {
                    objects.insert(relation.clone(), vec![WILDCARD.to_string()]);
                }
                None => report(CatalogError::UnknownSchema {
                    kind,
                    name: relation.clone(),
                    schema: schema.clone(),
                }),
            }
            self.all_completions.insert(relation);
        }
    }

    /// Appends `(relation, column)` rows to relations of the current database.
    pub fn add_columns<I, E>(&mut self, rows: I, kind: RelationKind)
    where
        I: IntoIterator<Item = Result<(String, String), E>>,
        E: fmt::Display,
    {
        let kind = ObjectKind::from(kind);
        let Some(rows) = materialize(rows, "add_columns") else {
            return;
        };

        let schema = self.current_database.clone();
        for (relation, column) in rows {
            let relation = self.escape_name(&relation);
            let column = self.escape_name(&column);
            let Some(objects) = self.metadata.namespace_mut(kind).get_mut(&schema) else {
                report(CatalogError::UnknownSchema {
                    kind,
                    name: relation,
                    schema: schema.clone(),
                });
                continue;
            };
            let Some(columns) = objects.get_mut(&relation) else {
                report(CatalogError::UnknownRelation {
                    kind,
                    relation,
                    column,
                    schema: schema.clone(),
                });
                continue;
            };
            columns.push(column.clone());
            self.all_completions.insert(column);
        }
    }

    /// Registers function names under the current database.
    pub fn add_functions<I, E>(&mut self, rows: I)
    where
        I: IntoIterator<Item = Result<String, E>>,
        E: fmt::Display,
    {
        let Some(rows) = materialize(rows, "add_functions") else {
            return;
        };

        let schema = self.current_database.clone();
        for function in rows {
            let function = self.escape_name(&function);
            match self.metadata.functions.get_mut(&schema) {
                Some(objects) => {
                    objects.insert(function.clone(), Vec::new());
                    self.all_completions.insert(function);
                }
                None => report(CatalogError::UnknownSchema {
                    kind: ObjectKind::Functions,
                    name: function,
                    schema: schema.clone(),
                }),
            }
        }
    }

    pub fn add_keywords<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for keyword in keywords {
            let keyword = keyword.into();
            self.all_completions.insert(keyword.clone());
            self.extra_keywords.push(keyword);
        }
    }

    pub fn add_show_items<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for item in items {
            let item = item.into();
            self.all_completions.insert(item.clone());
            self.show_items.push(item);
        }
    }

    pub fn add_users<I, S>(&mut self, users: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for user in users {
            let user = user.into();
            self.all_completions.insert(user.clone());
            self.users.push(user);
        }
    }

    /// Collects the columns of every scoped table reference.
    ///
    /// Tables shadow views of the same name. Each reference is looked up first
    /// as written, then escaped; references that resolve to nothing contribute
    /// no columns.
    pub fn resolve_scoped_columns(&self, tables: &[TableRef]) -> Vec<String> {
        let mut columns = Vec::new();

        for table in tables {
            // Schema names are never escaped.
            let schema = table
                .schema
                .as_deref()
                .filter(|schema| !schema.is_empty())
                .unwrap_or(self.current_database.as_str());

            if let Some(objects) = self.metadata.tables.get(schema) {
                let found = objects
                    .get(&table.name)
                    .or_else(|| objects.get(&self.escape_name(&table.name)));
                if let Some(found) = found {
                    columns.extend(found.iter().cloned());
                    continue;
                }
            }

            if let Some(found) = self
                .metadata
                .views
                .get(schema)
                .and_then(|objects| objects.get(&table.name))
            {
                columns.extend(found.iter().cloned());
            }
        }

        columns
    }

    /// Names of the `kind` objects in `schema`, or in the current database.
    pub fn resolve_schema_objects(&self, schema: Option<&str>, kind: ObjectKind) -> Vec<String> {
        let schema = schema
            .filter(|schema| !schema.is_empty())
            .unwrap_or(self.current_database.as_str());

        self.metadata
            .namespace(kind)
            .get(schema)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether `schema` has been registered.
    pub fn has_schema(&self, schema: &str) -> bool {
        self.metadata.tables.contains_key(schema)
    }
}

/// Collects `rows`, or logs and returns `None` if any row failed.
fn materialize<T, E, I>(rows: I, operation: &'static str) -> Option<Vec<T>>
where
    I: IntoIterator<Item = Result<T, E>>,
    E: fmt::Display,
{
    match rows.into_iter().collect::<Result<Vec<T>, E>>() {
        Ok(rows) => Some(rows),
        Err(err) => {
            report(CatalogError::SourceFailed {
                operation,
                reason: err.to_string(),
            });
            None
        }
    }
}

fn report(err: CatalogError) {
    #[cfg(feature = "tracing")]
    tracing::error!(error = %err, "catalog update dropped");
    #[cfg(not(feature = "tracing"))]
    let _ = err;
}
