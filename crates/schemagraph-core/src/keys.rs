//! Primary key classification.
//!
//! A one-column primary key is a single key. A compound key is analysed
//! pairwise: every two-column subset of the key becomes a compound key fact,
//! optionally annotated with which side is strong. Keys with three or more
//! columns are still only compared two columns at a time; no fact describes
//! a wider sub-key.

use crate::facts::Fact;
use crate::stats::{GroupedMaxLookup, PairCounts};
use crate::subsets::pairs;

/// Both grouped maxima must reach this value before strength is decided.
pub const DEFAULT_STRENGTH_THRESHOLD: u64 = 10;

/// Which column of a compound key pair is strong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrength {
    FirstStrong,
    SecondStrong,
}

/// The side with the lower grouped maximum is strong: its groups are less
/// fragmented by its partner.
pub fn classify_key_strength(counts: PairCounts, threshold: u64) -> Option<KeyStrength> {
    let PairCounts { forward, backward } = counts;
    if forward < threshold || backward < threshold {
        return None;
    }

    match forward.cmp(&backward) {
        std::cmp::Ordering::Less => Some(KeyStrength::FirstStrong),
        std::cmp::Ordering::Greater => Some(KeyStrength::SecondStrong),
        std::cmp::Ordering::Equal => None,
    }
}

/// Facts for one pair of compound key columns.
pub fn compound_pair_facts(
    entity: &str,
    first: &str,
    second: &str,
    counts: PairCounts,
    threshold: u64,
) -> Vec<Fact> {
    let mut facts = vec![Fact::CompoundKey {
        entity: entity.to_string(),
        first: first.to_string(),
        second: second.to_string(),
    }];

    if let Some(strength) = classify_key_strength(counts, threshold) {
        let (strong, weak) = match strength {
            KeyStrength::FirstStrong => (first, second),
            KeyStrength::SecondStrong => (second, first),
        };
        facts.push(Fact::KeyStrength {
            entity: entity.to_string(),
            first: first.to_string(),
            second: second.to_string(),
            strong: strong.to_string(),
            weak: weak.to_string(),
        });
    }

    facts
}

/// Classify a declared primary key given in catalog order.
pub fn classify_keys<S: AsRef<str>>(
    entity: &str,
    key_columns: &[S],
    stats: &impl GroupedMaxLookup,
    threshold: u64,
) -> Vec<Fact> {
    match key_columns {
        [] => Vec::new(),
        [only] => vec![Fact::SingleKey {
            entity: entity.to_string(),
            column: only.as_ref().to_string(),
        }],
        _ => pairs(key_columns)
            .flat_map(|(first, second)| {
                let first: &str = first.as_ref();
                let second: &str = second.as_ref();
                let counts = PairCounts::lookup(stats, first, second);
                compound_pair_facts(entity, first, second, counts, threshold)
            })
            .collect(),
    }
}

/// One membership fact per declared key column, whatever the key arity.
pub fn key_column_facts<S: AsRef<str>>(entity: &str, key_columns: &[S]) -> Vec<Fact> {
    key_columns
        .iter()
        .map(|column| Fact::KeyColumn {
            entity: entity.to_string(),
            column: column.as_ref().to_string(),
        })
        .collect()
}
