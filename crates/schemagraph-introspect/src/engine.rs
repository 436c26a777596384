//! Per-table inference pass over a statistics gateway.
//!
//! For every table, in name order, the pass emits catalog facts, then
//! dimensions, then keys, then relationships over every column pair.
//! Statistics are awaited one at a time.
//!
//! Failure policy: a statistic that cannot be fetched counts as zero and the
//! pass continues; a fact that fails validation is skipped; only a failure to
//! list the catalog aborts the pass.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use schemagraph_core::{
    Fact, FactKind, FactSink, GroupedMaxima, PairCounts, Result, TableCatalog, classify_keys,
    classify_relationships, dimension_fact, group_by_entity, key_column_facts, pairs,
};

use crate::adapter::StatisticsGateway;
use crate::options::InferOptions;

/// Summary of one inference pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InferenceReport {
    pub engine: String,
    pub schema: String,
    pub tables: usize,
    pub columns: usize,
    /// Column pairs whose grouped maxima were requested.
    pub column_pairs: usize,
    pub facts_emitted: usize,
    pub facts_by_kind: BTreeMap<FactKind, usize>,
    /// Facts dropped because they failed validation.
    pub facts_skipped: usize,
    /// Statistics that could not be fetched and were read as zero.
    pub stat_failures: usize,
    /// Declared keys ignored because a key column was not listed.
    pub keys_skipped: usize,
}

/// Validates facts on their way to the sink and keeps the tallies.
struct Emitter<'a, S: FactSink + ?Sized> {
    sink: &'a mut S,
    report: &'a mut InferenceReport,
}

impl<S: FactSink + ?Sized> Emitter<'_, S> {
    fn emit(&mut self, fact: Fact) {
        match fact.validate() {
            Ok(()) => {
                *self.report.facts_by_kind.entry(fact.kind()).or_default() += 1;
                self.report.facts_emitted += 1;
                self.sink.emit(fact);
            }
            Err(err) => {
                warn!(event = "fact_skipped", error = %err);
                self.report.facts_skipped += 1;
            }
        }
    }

    fn emit_all(&mut self, facts: impl IntoIterator<Item = Fact>) {
        for fact in facts {
            self.emit(fact);
        }
    }
}

/// Run one inference pass over `options.schema`, sending facts to `sink`.
pub async fn infer<G, S>(
    gateway: &G,
    options: &InferOptions,
    sink: &mut S,
) -> Result<InferenceReport>
where
    G: StatisticsGateway + ?Sized,
    S: FactSink + ?Sized,
{
    info!(event = "inference_started", engine = gateway.engine(), schema = %options.schema);

    let columns = gateway.list_columns(&options.schema).await?;
    let mut tables = group_by_entity(columns);

    let mut report = InferenceReport {
        engine: gateway.engine().to_string(),
        schema: options.schema.clone(),
        tables: tables.len(),
        ..InferenceReport::default()
    };

    for table in &mut tables {
        report.columns += table.columns.len();
        table.primary_key = primary_key_or_empty(gateway, table, &mut report).await;

        let mut emitter = Emitter {
            sink: &mut *sink,
            report: &mut report,
        };
        infer_table(gateway, options, table, &mut emitter).await;
    }

    info!(
        event = "inference_finished",
        tables = report.tables,
        facts = report.facts_emitted,
        skipped = report.facts_skipped,
        stat_failures = report.stat_failures,
        keys_skipped = report.keys_skipped
    );

    Ok(report)
}

async fn infer_table<G, S>(
    gateway: &G,
    options: &InferOptions,
    table: &TableCatalog,
    emitter: &mut Emitter<'_, S>,
) where
    G: StatisticsGateway + ?Sized,
    S: FactSink + ?Sized,
{
    let entity = table.name.as_str();
    debug!(event = "table_started", entity, columns = table.columns.len());

    if options.include_catalog_facts {
        emitter.emit_all(table.columns.iter().map(|col| Fact::HasColumn {
            entity: entity.to_string(),
            column: col.name.clone(),
        }));
        emitter.emit_all(table.columns.iter().map(|col| Fact::DataType {
            entity: entity.to_string(),
            column: col.name.clone(),
            data_type: col.underlying_type.clone(),
        }));
    }

    for column in &table.columns {
        let count = match gateway.distinct_count(entity, &column.name).await {
            Ok(count) => count,
            Err(err) => {
                warn!(
                    event = "statistic_failed",
                    statistic = "distinct_count",
                    entity,
                    column = %column.name,
                    error = %err
                );
                emitter.report.stat_failures += 1;
                0
            }
        };
        if options.include_catalog_facts {
            emitter.emit(Fact::DistinctCount {
                entity: entity.to_string(),
                column: column.name.clone(),
                count,
            });
        }
        if let Some(fact) = dimension_fact(column, count, options.discrete_threshold) {
            emitter.emit(fact);
        }
    }

    let mut stats = GroupedMaxima::new();

    if options.include_catalog_facts {
        emitter.emit_all(key_column_facts(entity, &table.primary_key));
    }
    for (first, second) in pairs(&table.primary_key) {
        fetch_pair(gateway, entity, first, second, &mut stats, emitter.report).await;
    }
    emitter.emit_all(classify_keys(
        entity,
        &table.primary_key,
        &stats,
        options.strength_threshold,
    ));

    let names = table.column_names();
    for (first, second) in pairs(&names) {
        fetch_pair(gateway, entity, first, second, &mut stats, emitter.report).await;
    }
    emitter.emit_all(classify_relationships(entity, &names, &stats));
}

/// Declared key of `table`, or no key when any key column is not listed.
async fn primary_key_or_empty<G>(
    gateway: &G,
    table: &TableCatalog,
    report: &mut InferenceReport,
) -> Vec<String>
where
    G: StatisticsGateway + ?Sized,
{
    let declared = match gateway.primary_key_columns(&table.name).await {
        Ok(columns) => columns,
        Err(err) => {
            warn!(
                event = "statistic_failed",
                statistic = "primary_key",
                entity = %table.name,
                error = %err
            );
            report.stat_failures += 1;
            return Vec::new();
        }
    };

    // Keys keep their declared arity; a partially listed key is not analysed.
    if let Some(missing) = declared.iter().find(|column| !table.has_column(column)) {
        warn!(
            event = "key_skipped",
            entity = %table.name,
            column = %missing,
            key_columns = declared.len()
        );
        report.keys_skipped += 1;
        return Vec::new();
    }

    declared
}

/// Fetch both grouped maxima of a pair once per table, reading failures as zero.
async fn fetch_pair<G>(
    gateway: &G,
    entity: &str,
    first: &str,
    second: &str,
    stats: &mut GroupedMaxima,
    report: &mut InferenceReport,
) where
    G: StatisticsGateway + ?Sized,
{
    if stats.contains_pair(first, second) {
        return;
    }
    report.column_pairs += 1;

    let forward = grouped_max_or_zero(gateway, entity, first, second, report).await;
    let backward = grouped_max_or_zero(gateway, entity, second, first, report).await;
    debug!(event = "pair_measured", entity, first, second, forward, backward);
    stats.insert_pair(first, second, PairCounts::new(forward, backward));
}

async fn grouped_max_or_zero<G>(
    gateway: &G,
    entity: &str,
    group_by: &str,
    count_column: &str,
    report: &mut InferenceReport,
) -> u64
where
    G: StatisticsGateway + ?Sized,
{
    match gateway
        .grouped_max_distinct(entity, group_by, count_column)
        .await
    {
        Ok(value) => value,
        Err(err) => {
            warn!(
                event = "statistic_failed",
                statistic = "grouped_max",
                entity,
                group_by,
                count_column,
                error = %err
            );
            report.stat_failures += 1;
            0
        }
    }
}
