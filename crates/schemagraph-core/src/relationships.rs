//! Relationship classification between two columns of one table.
//!
//! With `forward = grouped_max(a, b)` and `backward = grouped_max(b, a)`:
//!
//! | forward | backward | relationship |
//! |---|---|---|
//! | 1 | > 1 | one-to-many, one side `a`, many side `b` |
//! | > 1 | 1 | one-to-many, one side `b`, many side `a` |
//! | > 1 | > 1 | many-to-many |
//! | anything else | | none |
//!
//! Every pair of columns is classified independently of keys and dimensions.

use crate::facts::Fact;
use crate::stats::{GroupedMaxLookup, PairCounts};
use crate::subsets::pairs;

/// Cardinality relationship between the two columns of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// Every `first` group holds a single `second` value while some `second`
    /// group holds many `first` values; the one side is `first`.
    OneToManyFirst,
    /// The one side is `second`.
    OneToManySecond,
    ManyToMany,
}

/// Decide the relationship of a pair from its grouped maxima.
///
/// Functional in both directions (1/1) is a one-to-one coincidence and is
/// not modelled; neither is any pair with a zero maximum.
pub fn classify_relationship(counts: PairCounts) -> Option<Relationship> {
    let PairCounts { forward, backward } = counts;
    match (forward, backward) {
        (1, b) if b > 1 => Some(Relationship::OneToManyFirst),
        (f, 1) if f > 1 => Some(Relationship::OneToManySecond),
        (f, b) if f > 1 && b > 1 => Some(Relationship::ManyToMany),
        _ => None,
    }
}

/// Build the fact for a classified pair.
pub fn relationship_fact(
    entity: &str,
    first: &str,
    second: &str,
    relationship: Relationship,
) -> Fact {
    match relationship {
        Relationship::OneToManyFirst => Fact::OneToMany {
            entity: entity.to_string(),
            one: first.to_string(),
            many: second.to_string(),
        },
        Relationship::OneToManySecond => Fact::OneToMany {
            entity: entity.to_string(),
            one: second.to_string(),
            many: first.to_string(),
        },
        Relationship::ManyToMany => Fact::ManyToMany {
            entity: entity.to_string(),
            first: first.to_string(),
            second: second.to_string(),
        },
    }
}

/// Classify one pair of columns of `entity`.
pub fn classify_pair(entity: &str, first: &str, second: &str, counts: PairCounts) -> Option<Fact> {
    classify_relationship(counts).map(|rel| relationship_fact(entity, first, second, rel))
}

/// Classify every pair of `columns`, in enumeration order.
pub fn classify_relationships<S: AsRef<str>>(
    entity: &str,
    columns: &[S],
    stats: &impl GroupedMaxLookup,
) -> Vec<Fact> {
    pairs(columns)
        .filter_map(|(first, second)| {
            let first: &str = first.as_ref();
            let second: &str = second.as_ref();
            classify_pair(entity, first, second, PairCounts::lookup(stats, first, second))
        })
        .collect()
}
