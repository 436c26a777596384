use async_trait::async_trait;

use schemagraph_core::{CatalogColumn, Result};

/// Source of catalog listings and cardinality statistics.
///
/// Every statistic call is fallible on its own; the inference engine decides
/// what a failed statistic means.
#[async_trait]
pub trait StatisticsGateway: Send + Sync {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Columns of every table in `schema`, grouped by table, in ordinal order.
    async fn list_columns(&self, schema: &str) -> Result<Vec<CatalogColumn>>;

    /// Number of distinct values in `entity.column`.
    async fn distinct_count(&self, entity: &str, column: &str) -> Result<u64>;

    /// Declared primary-key columns of `entity` in key order; empty if none.
    async fn primary_key_columns(&self, entity: &str) -> Result<Vec<String>>;

    /// Maximum, over groups of `group_by`, of the distinct `count_column`
    /// values in the group. Zero for an empty table.
    async fn grouped_max_distinct(
        &self,
        entity: &str,
        group_by: &str,
        count_column: &str,
    ) -> Result<u64>;
}
