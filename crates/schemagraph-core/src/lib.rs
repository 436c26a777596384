//! Core contracts and classifiers for schemagraph.
//!
//! This crate defines the catalog and fact types, the key, dimension and
//! relationship classifiers, the pair enumerator that drives pairwise
//! analysis, and the renderers that turn facts into N-Triples or JSON. It
//! performs no database access.

pub mod catalog;
pub mod dimension;
pub mod error;
pub mod facts;
pub mod keys;
pub mod relationships;
pub mod render;
pub mod sink;
pub mod statement;
pub mod stats;
pub mod subsets;

pub use catalog::{CatalogColumn, TableCatalog, group_by_entity};
pub use dimension::{DEFAULT_DISCRETE_THRESHOLD, classify_dimension, dimension_fact};
pub use error::{Error, Result};
pub use facts::{Dimension, DimensionLabel, Fact, FactKind};
pub use keys::{
    DEFAULT_STRENGTH_THRESHOLD, KeyStrength, classify_key_strength, classify_keys,
    compound_pair_facts, key_column_facts,
};
pub use relationships::{
    Relationship, classify_pair, classify_relationship, classify_relationships,
    relationship_fact,
};
pub use render::{DEFAULT_BASE_IRI, FACTS_FORMAT_VERSION, FactDocument, Vocabulary};
pub use sink::{FactBuffer, FactSink};
pub use statement::{Node, Predicate, Statement};
pub use stats::{GroupedMaxLookup, GroupedMaxima, PairCounts};
pub use subsets::{Subsets, pairs, subsets};
