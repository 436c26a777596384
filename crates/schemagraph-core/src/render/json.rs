use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::facts::Fact;

/// Contract version for `facts.json` artifacts.
pub const FACTS_FORMAT_VERSION: &str = "0.1";

/// JSON document holding every fact of one inference pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FactDocument {
    /// Contract version for this document format.
    pub format_version: String,
    /// Database schema the facts were inferred from.
    pub schema: String,
    /// Base IRI used when the same facts are written as N-Triples.
    pub base_iri: String,
    pub facts: Vec<Fact>,
}

impl FactDocument {
    pub fn new(schema: &str, base_iri: &str, facts: Vec<Fact>) -> Self {
        Self {
            format_version: FACTS_FORMAT_VERSION.to_string(),
            schema: schema.to_string(),
            base_iri: base_iri.to_string(),
            facts,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
