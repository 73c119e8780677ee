//! The schema oracle consumed by desugaring.
//!
//! The desugarer only ever asks two questions about the outside world:
//! whether a table exists and which columns it declares, in order. The
//! oracle is injected; nothing here prescribes a backing store.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ir::CreateTable;

/// Read-only schema information: table name to ordered column list.
pub trait SchemaOracle {
    /// The declared columns of `table` in declaration order, or `None` for
    /// an unknown table.
    fn columns_of(&self, table: &str) -> Option<&[String]>;

    fn exists(&self, table: &str) -> bool {
        self.columns_of(table).is_some()
    }
}

/// An in-memory oracle backed by an ordered map.
///
/// Used by tests, and by the CLI which folds the CREATE TABLE statements of
/// a file into it so later queries in the same file resolve against them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    tables: IndexMap<String, Vec<String>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration, mainly for tests.
    pub fn with_table<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.insert(name, columns);
        self
    }

    pub fn insert<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
    ) {
        self.tables
            .insert(name.into(), columns.into_iter().map(Into::into).collect());
    }

    /// Registers a parsed CREATE TABLE statement.
    pub fn add_create_table(&mut self, stmt: &CreateTable) {
        self.insert(
            stmt.name.clone(),
            stmt.columns.iter().map(|column| column.name.clone()),
        );
    }
}

impl SchemaOracle for StaticCatalog {
    fn columns_of(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_preserves_declaration_order() {
        let catalog = StaticCatalog::new().with_table("t", ["w", "x", "y"]);
        assert_eq!(
            catalog.columns_of("t"),
            Some(["w".to_string(), "x".into(), "y".into()].as_slice())
        );
        assert!(catalog.exists("t"));
        assert!(!catalog.exists("u"));
    }

    #[test]
    fn catalog_from_schema_json() {
        let catalog: StaticCatalog =
            serde_json::from_str(r#"{"t": ["w", "x", "y"], "u": ["a"]}"#).unwrap();
        assert_eq!(catalog.columns_of("u"), Some(["a".to_string()].as_slice()));
    }

    #[test]
    fn add_create_table_registers_columns() {
        use crate::ir::{ColumnDef, Datatype};

        let stmt = CreateTable {
            name: "users".into(),
            columns: vec![
                ColumnDef {
                    name: "id".into(),
                    datatype: Datatype::new("int"),
                    constraints: Vec::new(),
                },
                ColumnDef {
                    name: "name".into(),
                    datatype: Datatype::new("text"),
                    constraints: Vec::new(),
                },
            ],
            keys: Vec::new(),
        };

        let mut catalog = StaticCatalog::new();
        catalog.add_create_table(&stmt);
        assert_eq!(
            catalog.columns_of("users"),
            Some(["id".to_string(), "name".into()].as_slice())
        );
    }
}
