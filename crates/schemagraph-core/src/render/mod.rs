//! Serializers for emitted facts.

pub mod json;
pub mod ntriples;

pub use json::{FACTS_FORMAT_VERSION, FactDocument};
pub use ntriples::{DEFAULT_BASE_IRI, Vocabulary, to_ntriples, write_ntriples};
