use clap::ValueEnum;
use serde::Serialize;

use schemagraph_core::render::{FactDocument, Vocabulary, to_ntriples};
use schemagraph_core::Fact;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One N-Triples statement per line.
    Ntriples,
    /// A single facts document.
    Json,
}

impl OutputFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            OutputFormat::Ntriples => "facts.nt",
            OutputFormat::Json => "facts.json",
        }
    }
}

pub fn render_facts(
    format: OutputFormat,
    schema: &str,
    base_iri: &str,
    facts: &[Fact],
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Ntriples => Ok(to_ntriples(&Vocabulary::new(base_iri), facts)),
        OutputFormat::Json => {
            let document = FactDocument::new(schema, base_iri, facts.to_vec());
            let mut json = document.to_json_pretty()?;
            json.push('\n');
            Ok(json)
        }
    }
}
