use std::fmt::Write as _;
use std::io::{self, Write};

use crate::facts::Fact;
use crate::statement::{Node, Predicate, Statement};

/// Root of every IRI written when no base is configured.
pub const DEFAULT_BASE_IRI: &str = "http://dooodle/";

const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

/// Maps nodes and predicates to IRIs under a base IRI.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    base: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_IRI)
    }
}

impl Vocabulary {
    pub fn new(base: &str) -> Self {
        let mut base = base.trim().to_string();
        if !base.ends_with('/') && !base.ends_with('#') {
            base.push('/');
        }
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn predicate_iri(&self, predicate: Predicate) -> String {
        format!("{}predicate/{}", self.base, predicate.name())
    }

    fn entity_iri(&self, entity: &str) -> String {
        format!("{}entity/{}", self.base, encode_segment(entity))
    }

    fn column_iri(&self, entity: &str, column: &str) -> String {
        format!(
            "{}/column/{}",
            self.entity_iri(entity),
            encode_segment(column)
        )
    }

    fn relation_iri(&self, entity: &str, middle: &str, left: &str, right: &str) -> String {
        format!(
            "{}/{middle}/{}/{}",
            self.entity_iri(entity),
            encode_segment(left),
            encode_segment(right)
        )
    }

    /// Render a node as an N-Triples term.
    pub fn term(&self, node: &Node) -> String {
        let iri = match node {
            Node::Entity(entity) => self.entity_iri(entity),
            Node::Column { entity, column } => self.column_iri(entity, column),
            Node::CompoundPair {
                entity,
                first,
                second,
            } => self.relation_iri(entity, "compound", first, second),
            Node::OneToMany { entity, one, many } => {
                self.relation_iri(entity, "one2many", one, many)
            }
            Node::ManyToMany {
                entity,
                first,
                second,
            } => self.relation_iri(entity, "many2many", first, second),
            Node::DataType(name) => format!("{}dataType/{}", self.base, encode_segment(name)),
            Node::Dimension(dimension) => format!("{}dimension/{}", self.base, dimension.as_str()),
            Node::Integer(value) => return format!("\"{value}\"^^<{XSD_INTEGER}>"),
        };
        format!("<{iri}>")
    }

    /// Render one statement as a terminated N-Triples line.
    pub fn line(&self, statement: &Statement) -> String {
        format!(
            "{} <{}> {} .\n",
            self.term(&statement.subject),
            self.predicate_iri(statement.predicate),
            self.term(&statement.object)
        )
    }
}

/// Percent-encode the characters that may not appear in an IRIREF, plus the
/// path separator so names cannot collide across segments.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for ch in segment.chars() {
        let reserved = ch.is_control()
            || matches!(
                ch,
                ' ' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '%' | '/'
            );
        if reserved {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                let _ = write!(out, "%{byte:02X}");
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Write every statement of every fact, in fact order.
pub fn write_ntriples<W: Write>(
    writer: &mut W,
    vocabulary: &Vocabulary,
    facts: &[Fact],
) -> io::Result<()> {
    for fact in facts {
        for statement in fact.statements() {
            writer.write_all(vocabulary.line(&statement).as_bytes())?;
        }
    }
    writer.flush()
}

pub fn to_ntriples(vocabulary: &Vocabulary, facts: &[Fact]) -> String {
    facts
        .iter()
        .flat_map(|fact| fact.statements())
        .map(|statement| vocabulary.line(&statement))
        .collect()
}
