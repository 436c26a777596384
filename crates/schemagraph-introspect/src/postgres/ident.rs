//! Identifier validation and quoting for generated statistics queries.
//!
//! Table and column names are only ever spliced into SQL after they have been
//! found in the catalog listed during the current pass, and always in quoted
//! form.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use schemagraph_core::{CatalogColumn, Error, Result};

/// A double-quoted identifier known to exist in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedIdent(String);

impl fmt::Display for QuotedIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A schema-qualified, quoted table name known to exist in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedTable {
    schema: QuotedIdent,
    table: QuotedIdent,
}

impl fmt::Display for QualifiedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

fn quote(ident: &str) -> QuotedIdent {
    QuotedIdent(format!("\"{}\"", ident.replace('"', "\"\"")))
}

/// Tables and columns of one schema, as listed by the catalog.
#[derive(Debug, Clone, Default)]
pub struct KnownCatalog {
    schema: String,
    tables: BTreeMap<String, BTreeSet<String>>,
}

impl KnownCatalog {
    pub fn from_columns(schema: &str, columns: &[CatalogColumn]) -> Self {
        let mut tables: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for column in columns {
            tables
                .entry(column.entity.clone())
                .or_default()
                .insert(column.name.clone());
        }
        Self {
            schema: schema.to_string(),
            tables,
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self, table: &str) -> Result<QualifiedTable> {
        if !self.tables.contains_key(table) {
            return Err(Error::UnknownIdentifier(format!(
                "table {}.{table} is not in the catalog",
                self.schema
            )));
        }
        Ok(QualifiedTable {
            schema: quote(&self.schema),
            table: quote(table),
        })
    }

    pub fn column(&self, table: &str, column: &str) -> Result<QuotedIdent> {
        let known = self
            .tables
            .get(table)
            .is_some_and(|columns| columns.contains(column));
        if !known {
            return Err(Error::UnknownIdentifier(format!(
                "column {}.{table}.{column} is not in the catalog",
                self.schema
            )));
        }
        Ok(quote(column))
    }
}
