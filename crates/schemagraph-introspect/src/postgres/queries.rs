use sqlx::PgPool;

use schemagraph_core::{Error, Result};

use super::ident::{QualifiedTable, QuotedIdent};

#[derive(Debug, sqlx::FromRow)]
pub struct RawColumn {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub udt_name: String,
}

pub async fn list_columns(pool: &PgPool, schema: &str) -> Result<Vec<RawColumn>> {
    sqlx::query_as::<_, RawColumn>(
        r#"
        select
          c.table_name::text as table_name,
          c.column_name::text as column_name,
          c.data_type::text as data_type,
          c.udt_name::text as udt_name
        from information_schema.columns c
        join information_schema.tables t
          on t.table_schema = c.table_schema and t.table_name = c.table_name
        where c.table_schema = $1
          and t.table_type = 'BASE TABLE'
        order by c.table_name, c.ordinal_position
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(|err| Error::Db(err.to_string()))
}

pub async fn primary_key_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        select att.attname::text
        from pg_constraint con
        join pg_class rel on rel.oid = con.conrelid
        join pg_namespace nsp on nsp.oid = rel.relnamespace
        join unnest(con.conkey) with ordinality as ord(attnum, ordinality) on true
        join pg_attribute att on att.attrelid = rel.oid and att.attnum = ord.attnum
        where nsp.nspname = $1
          and rel.relname = $2
          and con.contype = 'p'
        order by ord.ordinality
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|err| Error::Db(err.to_string()))
}

pub fn distinct_count_sql(table: &QualifiedTable, column: &QuotedIdent) -> String {
    format!("select count(distinct {column}) from {table}")
}

pub fn grouped_max_sql(
    table: &QualifiedTable,
    group_by: &QuotedIdent,
    count: &QuotedIdent,
) -> String {
    format!(
        "select max(output) from (select {group_by}, count(distinct {count}) as output from {table} group by {group_by}) as derived"
    )
}

pub async fn distinct_count(
    pool: &PgPool,
    table: &QualifiedTable,
    column: &QuotedIdent,
) -> Result<u64> {
    let count = sqlx::query_scalar::<_, i64>(&distinct_count_sql(table, column))
        .fetch_one(pool)
        .await
        .map_err(|err| Error::Db(err.to_string()))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

pub async fn grouped_max(
    pool: &PgPool,
    table: &QualifiedTable,
    group_by: &QuotedIdent,
    count: &QuotedIdent,
) -> Result<u64> {
    // max() over an empty table is NULL.
    let max = sqlx::query_scalar::<_, Option<i64>>(&grouped_max_sql(table, group_by, count))
        .fetch_one(pool)
        .await
        .map_err(|err| Error::Db(err.to_string()))?;
    Ok(max.and_then(|value| u64::try_from(value).ok()).unwrap_or(0))
}
