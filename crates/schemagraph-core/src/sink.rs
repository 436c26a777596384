use std::collections::BTreeMap;

use crate::facts::{Fact, FactKind};

/// Receiver of emitted facts.
pub trait FactSink {
    fn emit(&mut self, fact: Fact);
}

impl FactSink for Vec<Fact> {
    fn emit(&mut self, fact: Fact) {
        self.push(fact);
    }
}

/// In-memory sink that keeps facts in emission order and counts them by kind.
#[derive(Debug, Clone, Default)]
pub struct FactBuffer {
    facts: Vec<Fact>,
    counts: BTreeMap<FactKind, usize>,
}

impl FactBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn into_facts(self) -> Vec<Fact> {
        self.facts
    }

    pub fn counts(&self) -> &BTreeMap<FactKind, usize> {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl FactSink for FactBuffer {
    fn emit(&mut self, fact: Fact) {
        *self.counts.entry(fact.kind()).or_default() += 1;
        self.facts.push(fact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_counts_by_kind() {
        let mut buffer = FactBuffer::new();
        buffer.emit(Fact::HasColumn {
            entity: "city".to_string(),
            column: "name".to_string(),
        });
        buffer.emit(Fact::HasColumn {
            entity: "city".to_string(),
            column: "population".to_string(),
        });
        buffer.emit(Fact::SingleKey {
            entity: "city".to_string(),
            column: "name".to_string(),
        });

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.counts().get(&FactKind::HasColumn), Some(&2));
        assert_eq!(buffer.counts().get(&FactKind::SingleKey), Some(&1));
        assert_eq!(buffer.counts().get(&FactKind::OneToMany), None);
    }
}
