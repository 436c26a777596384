mod common;

use std::collections::BTreeSet;

use common::MemoryGateway;
use schemagraph_core::{Dimension, Error, Fact, FactBuffer, FactKind};
use schemagraph_introspect::{InferOptions, infer};

fn core_only() -> InferOptions {
    InferOptions {
        include_catalog_facts: false,
        ..InferOptions::default()
    }
}

fn orders(forward: u64, backward: u64) -> MemoryGateway {
    MemoryGateway::new()
        .column("orders", "customer_id", "integer", "int4", 40)
        .column("orders", "order_id", "integer", "int4", 2000)
        .pair("orders", "customer_id", "order_id", forward, backward)
}

fn flight(forward: u64, backward: u64) -> MemoryGateway {
    MemoryGateway::new()
        .column("flight", "airline_code", "character varying", "varchar", 30)
        .column("flight", "flight_number", "integer", "int4", 4200)
        .key("flight", &["airline_code", "flight_number"])
        .pair("flight", "airline_code", "flight_number", forward, backward)
}

fn relationship_facts(facts: &[Fact]) -> Vec<&Fact> {
    facts
        .iter()
        .filter(|fact| matches!(fact.kind(), FactKind::OneToMany | FactKind::ManyToMany))
        .collect()
}

#[tokio::test]
async fn one_to_many_in_both_directions() {
    let mut facts = Vec::new();
    infer(&orders(1, 50), &core_only(), &mut facts)
        .await
        .expect("inference");
    assert_eq!(
        relationship_facts(&facts),
        vec![&Fact::OneToMany {
            entity: "orders".to_string(),
            one: "customer_id".to_string(),
            many: "order_id".to_string(),
        }]
    );

    let mut facts = Vec::new();
    infer(&orders(50, 1), &core_only(), &mut facts)
        .await
        .expect("inference");
    assert_eq!(
        relationship_facts(&facts),
        vec![&Fact::OneToMany {
            entity: "orders".to_string(),
            one: "order_id".to_string(),
            many: "customer_id".to_string(),
        }]
    );
}

#[tokio::test]
async fn many_to_many_and_no_relationship() {
    let mut facts = Vec::new();
    infer(&orders(3, 7), &core_only(), &mut facts)
        .await
        .expect("inference");
    assert_eq!(
        relationship_facts(&facts),
        vec![&Fact::ManyToMany {
            entity: "orders".to_string(),
            first: "customer_id".to_string(),
            second: "order_id".to_string(),
        }]
    );

    let mut facts = Vec::new();
    infer(&orders(1, 1), &core_only(), &mut facts)
        .await
        .expect("inference");
    assert!(relationship_facts(&facts).is_empty());
}

#[tokio::test]
async fn dimensions_follow_counts_and_types() {
    let gateway = MemoryGateway::new()
        .column("city", "name", "character varying", "varchar", 3000)
        .column("city", "population", "integer", "int4", 2900)
        .column("city", "latitude", "numeric", "numeric", 5000)
        .column("city", "province", "character varying", "varchar", 80)
        .pair("city", "name", "population", 1, 1)
        .pair("city", "name", "latitude", 1, 1)
        .pair("city", "name", "province", 1, 1)
        .pair("city", "population", "latitude", 1, 1)
        .pair("city", "population", "province", 1, 1)
        .pair("city", "latitude", "province", 1, 1);

    let mut facts = Vec::new();
    infer(&gateway, &core_only(), &mut facts)
        .await
        .expect("inference");

    assert_eq!(
        facts,
        vec![
            Fact::Dimension {
                entity: "city".to_string(),
                column: "population".to_string(),
                dimension: Dimension::Scalar,
            },
            Fact::Dimension {
                entity: "city".to_string(),
                column: "province".to_string(),
                dimension: Dimension::Discrete,
            },
        ]
    );
}

#[tokio::test]
async fn compound_key_strength() {
    let mut facts = Vec::new();
    infer(&flight(12, 40), &core_only(), &mut facts)
        .await
        .expect("inference");

    let keys: Vec<&Fact> = facts
        .iter()
        .filter(|fact| matches!(fact.kind(), FactKind::CompoundKey | FactKind::KeyStrength))
        .collect();
    assert_eq!(
        keys,
        vec![
            &Fact::CompoundKey {
                entity: "flight".to_string(),
                first: "airline_code".to_string(),
                second: "flight_number".to_string(),
            },
            &Fact::KeyStrength {
                entity: "flight".to_string(),
                first: "airline_code".to_string(),
                second: "flight_number".to_string(),
                strong: "airline_code".to_string(),
                weak: "flight_number".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn compound_key_below_threshold_has_no_strength() {
    let mut buffer = FactBuffer::new();
    let report = infer(&flight(9, 40), &core_only(), &mut buffer)
        .await
        .expect("inference");

    assert_eq!(buffer.counts().get(&FactKind::CompoundKey), Some(&1));
    assert_eq!(buffer.counts().get(&FactKind::KeyStrength), None);
    // Key and relationship passes share one measurement of the pair.
    assert_eq!(report.column_pairs, 1);
}

#[tokio::test]
async fn single_key_and_catalog_facts_come_in_pass_order() {
    let gateway = MemoryGateway::new()
        .column("country", "code", "character varying", "varchar", 240)
        .column("country", "area", "numeric", "numeric", 238)
        .key("country", &["code"])
        .pair("country", "code", "area", 1, 2);

    let mut facts = Vec::new();
    infer(&gateway, &InferOptions::default(), &mut facts)
        .await
        .expect("inference");

    let kinds: Vec<FactKind> = facts.iter().map(Fact::kind).collect();
    assert_eq!(
        kinds,
        vec![
            FactKind::HasColumn,
            FactKind::HasColumn,
            FactKind::DataType,
            FactKind::DataType,
            FactKind::DistinctCount,
            FactKind::DistinctCount,
            FactKind::Dimension,
            FactKind::KeyColumn,
            FactKind::SingleKey,
            FactKind::OneToMany,
        ]
    );
    assert!(facts.contains(&Fact::DataType {
        entity: "country".to_string(),
        column: "area".to_string(),
        data_type: "numeric".to_string(),
    }));
    assert!(facts.contains(&Fact::SingleKey {
        entity: "country".to_string(),
        column: "code".to_string(),
    }));
}

#[tokio::test]
async fn tables_are_processed_in_name_order() {
    let gateway = MemoryGateway::new()
        .column("river", "name", "character varying", "varchar", 10)
        .column("airport", "iata_code", "character varying", "varchar", 10)
        .column("lake", "name", "character varying", "varchar", 10);

    let mut facts = Vec::new();
    let report = infer(&gateway, &core_only(), &mut facts)
        .await
        .expect("inference");

    let entities: Vec<&str> = facts.iter().map(Fact::entity).collect();
    assert_eq!(entities, vec!["airport", "lake", "river"]);
    assert_eq!(report.tables, 3);
    assert_eq!(report.columns, 3);
}

#[tokio::test]
async fn failed_pair_statistics_keep_other_facts() {
    let gateway = MemoryGateway::new()
        .column("flight", "airline_code", "character varying", "varchar", 30)
        .column("flight", "flight_number", "integer", "int4", 4200)
        .key("flight", &["airline_code", "flight_number"]);

    let mut buffer = FactBuffer::new();
    let report = infer(&gateway, &core_only(), &mut buffer)
        .await
        .expect("inference");

    assert_eq!(report.stat_failures, 2);
    assert_eq!(buffer.counts().get(&FactKind::Dimension), Some(&2));
    assert_eq!(buffer.counts().get(&FactKind::CompoundKey), Some(&1));
    assert_eq!(buffer.counts().get(&FactKind::KeyStrength), None);
    assert!(relationship_facts(buffer.facts()).is_empty());
}

#[tokio::test]
async fn failed_counts_read_as_zero() {
    let gateway =
        MemoryGateway::new().column_without_count("city", "population", "integer", "int4");

    let mut facts = Vec::new();
    let report = infer(&gateway, &InferOptions::default(), &mut facts)
        .await
        .expect("inference");

    assert_eq!(report.stat_failures, 1);
    assert!(facts.contains(&Fact::DistinctCount {
        entity: "city".to_string(),
        column: "population".to_string(),
        count: 0,
    }));
    assert!(facts.contains(&Fact::Dimension {
        entity: "city".to_string(),
        column: "population".to_string(),
        dimension: Dimension::Discrete,
    }));
}

#[tokio::test]
async fn failed_key_lookup_means_no_key() {
    let gateway = flight(12, 40).failing_key("flight");

    let mut buffer = FactBuffer::new();
    let report = infer(&gateway, &core_only(), &mut buffer)
        .await
        .expect("inference");

    assert_eq!(report.stat_failures, 1);
    assert_eq!(buffer.counts().get(&FactKind::CompoundKey), None);
    assert_eq!(buffer.counts().get(&FactKind::ManyToMany), Some(&1));
}

#[tokio::test]
async fn malformed_facts_are_skipped() {
    let gateway = MemoryGateway::new()
        .column("", "id", "integer", "int4", 5)
        .column("city", "name", "character varying", "varchar", 5);

    let mut facts = Vec::new();
    let report = infer(&gateway, &core_only(), &mut facts)
        .await
        .expect("inference");

    assert_eq!(report.facts_skipped, 1);
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].entity(), "city");
}

#[tokio::test]
async fn listing_failure_aborts_the_pass() {
    let gateway = orders(1, 50).failing_listing();
    let mut facts = Vec::new();
    let result = infer(&gateway, &InferOptions::default(), &mut facts).await;

    assert!(matches!(result, Err(Error::Db(_))));
    assert!(facts.is_empty());
}

#[tokio::test]
async fn repeated_passes_are_identical() {
    let gateway = flight(12, 40)
        .column("orders", "customer_id", "integer", "int4", 40)
        .column("orders", "order_id", "integer", "int4", 2000)
        .pair("orders", "customer_id", "order_id", 1, 50);

    let mut first = Vec::new();
    let first_report = infer(&gateway, &InferOptions::default(), &mut first)
        .await
        .expect("first pass");
    let mut second = Vec::new();
    let second_report = infer(&gateway, &InferOptions::default(), &mut second)
        .await
        .expect("second pass");

    let first: BTreeSet<Fact> = first.into_iter().collect();
    let second: BTreeSet<Fact> = second.into_iter().collect();
    assert_eq!(first, second);
    assert_eq!(first_report, second_report);
}

#[tokio::test]
async fn partially_listed_key_is_not_shrunk() {
    let gateway = MemoryGateway::new()
        .column("flight", "airline_code", "character varying", "varchar", 30)
        .key("flight", &["airline_code", "flight_number"]);

    let mut buffer = FactBuffer::new();
    let report = infer(&gateway, &InferOptions::default(), &mut buffer)
        .await
        .expect("inference");

    assert_eq!(report.keys_skipped, 1);
    assert_eq!(report.stat_failures, 0);
    for kind in [
        FactKind::SingleKey,
        FactKind::CompoundKey,
        FactKind::KeyStrength,
        FactKind::KeyColumn,
    ] {
        assert_eq!(buffer.counts().get(&kind), None, "{kind:?}");
    }
    assert_eq!(buffer.counts().get(&FactKind::Dimension), Some(&1));
}
