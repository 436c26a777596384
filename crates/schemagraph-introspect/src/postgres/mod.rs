use std::sync::RwLock;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use schemagraph_core::{CatalogColumn, Error, Result};

use crate::adapter::StatisticsGateway;
use crate::config::ConnectionConfig;

mod ident;
mod mapper;
mod queries;

pub use ident::{KnownCatalog, QualifiedTable, QuotedIdent};

/// Statistics gateway backed by a PostgreSQL pool.
///
/// `list_columns` records the catalog of the listed schema; every later
/// statistic call is checked against it before any SQL is built.
#[derive(Debug)]
pub struct PostgresGateway {
    pool: PgPool,
    catalog: RwLock<Option<KnownCatalog>>,
}

impl PostgresGateway {
    /// Create a new gateway using a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            catalog: RwLock::new(None),
        }
    }

    /// Open a pool for `config`. Failure to reach the database is fatal.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options = config.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|err| Error::Connection(err.to_string()))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn resolve<T>(&self, f: impl FnOnce(&KnownCatalog) -> Result<T>) -> Result<T> {
        let guard = self
            .catalog
            .read()
            .map_err(|_| Error::Other("catalog lock poisoned".to_string()))?;
        let catalog = guard.as_ref().ok_or_else(|| {
            Error::UnknownIdentifier("catalog not loaded; list columns first".to_string())
        })?;
        f(catalog)
    }
}

#[async_trait::async_trait]
impl StatisticsGateway for PostgresGateway {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn list_columns(&self, schema: &str) -> Result<Vec<CatalogColumn>> {
        let columns = mapper::map_columns(queries::list_columns(&self.pool, schema).await?);
        let known = KnownCatalog::from_columns(schema, &columns);
        *self
            .catalog
            .write()
            .map_err(|_| Error::Other("catalog lock poisoned".to_string()))? = Some(known);
        Ok(columns)
    }

    async fn distinct_count(&self, entity: &str, column: &str) -> Result<u64> {
        let (table, column) =
            self.resolve(|catalog| Ok((catalog.table(entity)?, catalog.column(entity, column)?)))?;
        queries::distinct_count(&self.pool, &table, &column).await
    }

    async fn primary_key_columns(&self, entity: &str) -> Result<Vec<String>> {
        let schema = self.resolve(|catalog| {
            catalog.table(entity)?;
            Ok(catalog.schema().to_string())
        })?;
        queries::primary_key_columns(&self.pool, &schema, entity).await
    }

    async fn grouped_max_distinct(
        &self,
        entity: &str,
        group_by: &str,
        count_column: &str,
    ) -> Result<u64> {
        let (table, group_by, count_column) = self.resolve(|catalog| {
            Ok((
                catalog.table(entity)?,
                catalog.column(entity, group_by)?,
                catalog.column(entity, count_column)?,
            ))
        })?;
        queries::grouped_max(&self.pool, &table, &group_by, &count_column).await
    }
}
