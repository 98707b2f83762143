//! Catalog snapshots loaded from JSON files.
//!
//! A snapshot stands in for a live metadata refresh: it is replayed through the
//! catalog's mutation API, so names are escaped and validated exactly as they
//! would be for rows read from a server.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlcomplete_core::{Catalog, ObjectKind, RelationKind};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSnapshot {
    /// Database selected after loading. Defaults to none.
    pub current_database: String,
    pub databases: Vec<String>,
    /// schema name -> objects
    pub schemas: BTreeMap<String, SchemaSnapshot>,
    pub users: Vec<String>,
    pub show_items: Vec<String>,
    /// Extra keywords announced by the server.
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaSnapshot {
    /// table name -> column names
    pub tables: BTreeMap<String, Vec<String>>,
    /// view name -> column names
    pub views: BTreeMap<String, Vec<String>>,
    pub functions: Vec<String>,
}

impl CatalogSnapshot {
    /// Reads a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid catalog file: {}", path.display()))
    }

    /// Replays the snapshot into `catalog`.
    pub fn apply(&self, catalog: &mut Catalog) {
        catalog.add_databases(self.databases.iter().cloned());

        for (name, schema) in &self.schemas {
            catalog.add_schema(name);
            // Relation updates target the current database.
            catalog.set_current_database(name.clone());
            schema.apply(catalog);
        }

        catalog.set_current_database(self.current_database.clone());
        catalog.add_users(self.users.iter().cloned());
        catalog.add_show_items(self.show_items.iter().cloned());
        catalog.add_keywords(self.keywords.iter().cloned());

        tracing::debug!(
            schemas = self.schemas.len(),
            databases = self.databases.len(),
            "catalog snapshot applied"
        );
    }
}

impl SchemaSnapshot {
    fn apply(&self, catalog: &mut Catalog) {
        for (kind, relations) in [
            (RelationKind::Tables, &self.tables),
            (RelationKind::Views, &self.views),
        ] {
            catalog.add_relations(rows(relations.keys().cloned()), kind);
            catalog.add_columns(
                rows(relations.iter().flat_map(|(relation, columns)| {
                    columns
                        .iter()
                        .map(move |column| (relation.clone(), column.clone()))
                })),
                kind,
            );
        }
        catalog.add_functions(rows(self.functions.iter().cloned()));
    }
}

fn rows<T>(items: impl IntoIterator<Item = T>) -> impl Iterator<Item = Result<T, Infallible>> {
    items.into_iter().map(Ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlcomplete_core::{Lexicon, TableRef};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "currentDatabase": "shop",
        "databases": ["shop", "archive"],
        "schemas": {
            "shop": {
                "tables": {"customers": ["id", "name"], "Orders": ["id"]},
                "views": {"recent_orders": ["id"]},
                "functions": ["calc_tax"]
            }
        },
        "users": ["'admin'@'%'"],
        "showItems": ["PROCESSLIST"]
    }"#;

    #[test]
    fn test_apply_snapshot() {
        let snapshot: CatalogSnapshot = serde_json::from_str(SAMPLE).unwrap();
        let mut catalog = Catalog::new(Lexicon::mysql());
        snapshot.apply(&mut catalog);

        assert_eq!(catalog.current_database(), "shop");
        assert_eq!(catalog.databases(), &["shop".to_string(), "archive".to_string()][..]);
        assert_eq!(
            catalog.resolve_schema_objects(None, ObjectKind::Tables),
            vec!["`Orders`".to_string(), "customers".to_string()]
        );
        assert_eq!(
            catalog.resolve_scoped_columns(&[TableRef::new("customers")]),
            vec!["*".to_string(), "id".to_string(), "name".to_string()]
        );
        assert_eq!(
            catalog.resolve_scoped_columns(&[TableRef::new("Orders")]),
            vec!["*".to_string(), "id".to_string()]
        );
        assert_eq!(
            catalog.resolve_schema_objects(None, ObjectKind::Functions),
            vec!["calc_tax".to_string()]
        );
        assert_eq!(catalog.users(), &["'admin'@'%'".to_string()][..]);
        assert_eq!(catalog.show_items(), &["PROCESSLIST".to_string()][..]);
    }

    #[test]
    fn test_missing_sections_default() {
        let snapshot: CatalogSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, CatalogSnapshot::default());
    }

    #[test]
    fn test_load_snapshot_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let snapshot = CatalogSnapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.schemas.len(), 1);
    }

    #[test]
    fn test_load_invalid_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = CatalogSnapshot::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid catalog file"));
    }
}
