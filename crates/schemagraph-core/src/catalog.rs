use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A column as reported by the catalog, with both of its type names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogColumn {
    /// Table the column belongs to.
    pub entity: String,
    pub name: String,
    /// SQL abstract type (e.g. `integer`, `numeric`, `character varying`).
    pub declared_type: String,
    /// Storage type name (e.g. `int4`, `numeric`, `varchar`).
    pub underlying_type: String,
}

impl CatalogColumn {
    pub fn new(
        entity: impl Into<String>,
        name: impl Into<String>,
        declared_type: impl Into<String>,
        underlying_type: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            name: name.into(),
            declared_type: declared_type.into(),
            underlying_type: underlying_type.into(),
        }
    }
}

/// One table with its columns in catalog order and its declared primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCatalog {
    pub name: String,
    pub columns: Vec<CatalogColumn>,
    /// Primary-key columns in key order; empty when the table has none.
    pub primary_key: Vec<String>,
}

impl TableCatalog {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|col| col.name == name)
    }
}

/// Group a flat column listing into tables sorted by name.
///
/// Column order inside a table is the order of the input listing, which the
/// gateways return in ordinal position order.
pub fn group_by_entity(columns: Vec<CatalogColumn>) -> Vec<TableCatalog> {
    let mut tables: BTreeMap<String, Vec<CatalogColumn>> = BTreeMap::new();

    for column in columns {
        tables.entry(column.entity.clone()).or_default().push(column);
    }

    tables
        .into_iter()
        .map(|(name, columns)| TableCatalog {
            name,
            columns,
            primary_key: Vec::new(),
        })
        .collect()
}
