use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use schemagraph_core::{CatalogColumn, Error, Result};
use schemagraph_introspect::StatisticsGateway;

/// Gateway serving canned statistics; anything not registered is an error.
#[derive(Debug, Default, Clone)]
pub struct MemoryGateway {
    columns: Vec<CatalogColumn>,
    keys: BTreeMap<String, Vec<String>>,
    distinct: BTreeMap<(String, String), u64>,
    grouped: BTreeMap<(String, String, String), u64>,
    failing_keys: BTreeSet<String>,
    fail_listing: bool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(
        mut self,
        entity: &str,
        name: &str,
        declared: &str,
        udt: &str,
        distinct: u64,
    ) -> Self {
        self.columns.push(CatalogColumn::new(entity, name, declared, udt));
        self.distinct
            .insert((entity.to_string(), name.to_string()), distinct);
        self
    }

    /// A column whose distinct count cannot be fetched.
    pub fn column_without_count(
        mut self,
        entity: &str,
        name: &str,
        declared: &str,
        udt: &str,
    ) -> Self {
        self.columns.push(CatalogColumn::new(entity, name, declared, udt));
        self
    }

    pub fn key(mut self, entity: &str, columns: &[&str]) -> Self {
        self.keys.insert(
            entity.to_string(),
            columns.iter().map(|col| col.to_string()).collect(),
        );
        self
    }

    pub fn failing_key(mut self, entity: &str) -> Self {
        self.failing_keys.insert(entity.to_string());
        self
    }

    /// Register `grouped_max(first, second) = forward` and the reverse.
    pub fn pair(
        mut self,
        entity: &str,
        first: &str,
        second: &str,
        forward: u64,
        backward: u64,
    ) -> Self {
        self.grouped.insert(
            (entity.to_string(), first.to_string(), second.to_string()),
            forward,
        );
        self.grouped.insert(
            (entity.to_string(), second.to_string(), first.to_string()),
            backward,
        );
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }
}

#[async_trait]
impl StatisticsGateway for MemoryGateway {
    fn engine(&self) -> &'static str {
        "memory"
    }

    async fn list_columns(&self, _schema: &str) -> Result<Vec<CatalogColumn>> {
        if self.fail_listing {
            return Err(Error::Db("connection refused".to_string()));
        }
        Ok(self.columns.clone())
    }

    async fn distinct_count(&self, entity: &str, column: &str) -> Result<u64> {
        self.distinct
            .get(&(entity.to_string(), column.to_string()))
            .copied()
            .ok_or_else(|| Error::Db(format!("no distinct count for {entity}.{column}")))
    }

    async fn primary_key_columns(&self, entity: &str) -> Result<Vec<String>> {
        if self.failing_keys.contains(entity) {
            return Err(Error::Db(format!("key lookup failed for {entity}")));
        }
        Ok(self.keys.get(entity).cloned().unwrap_or_default())
    }

    async fn grouped_max_distinct(
        &self,
        entity: &str,
        group_by: &str,
        count_column: &str,
    ) -> Result<u64> {
        self.grouped
            .get(&(
                entity.to_string(),
                group_by.to_string(),
                count_column.to_string(),
            ))
            .copied()
            .ok_or_else(|| {
                Error::Db(format!(
                    "no grouped maximum for {entity}.{group_by} -> {count_column}"
                ))
            })
    }
}
