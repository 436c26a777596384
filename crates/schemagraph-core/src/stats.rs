use std::collections::BTreeMap;

/// Source of grouped-maximum statistics for one table.
///
/// `grouped_max(a, b)` is the maximum, over groups of `a`, of the number of
/// distinct `b` values in the group. Unknown pairs read as zero.
pub trait GroupedMaxLookup {
    fn grouped_max(&self, group_by: &str, count_column: &str) -> u64;
}

/// Grouped maxima of a column pair in both grouping directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairCounts {
    /// `grouped_max(first, second)`
    pub forward: u64,
    /// `grouped_max(second, first)`
    pub backward: u64,
}

impl PairCounts {
    pub fn new(forward: u64, backward: u64) -> Self {
        Self { forward, backward }
    }

    pub fn lookup(stats: &impl GroupedMaxLookup, first: &str, second: &str) -> Self {
        Self {
            forward: stats.grouped_max(first, second),
            backward: stats.grouped_max(second, first),
        }
    }
}

/// Directed grouped maxima collected for a single table.
#[derive(Debug, Clone, Default)]
pub struct GroupedMaxima {
    values: BTreeMap<(String, String), u64>,
}

impl GroupedMaxima {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group_by: &str, count_column: &str, value: u64) {
        self.values
            .insert((group_by.to_string(), count_column.to_string()), value);
    }

    /// Record both directions of a pair at once.
    pub fn insert_pair(&mut self, first: &str, second: &str, counts: PairCounts) {
        self.insert(first, second, counts.forward);
        self.insert(second, first, counts.backward);
    }

    pub fn get(&self, group_by: &str, count_column: &str) -> Option<u64> {
        self.values
            .get(&(group_by.to_string(), count_column.to_string()))
            .copied()
    }

    pub fn contains_pair(&self, first: &str, second: &str) -> bool {
        self.get(first, second).is_some() && self.get(second, first).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl GroupedMaxLookup for GroupedMaxima {
    fn grouped_max(&self, group_by: &str, count_column: &str) -> u64 {
        self.get(group_by, count_column).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_lookup_reads_both_directions() {
        let mut stats = GroupedMaxima::new();
        stats.insert_pair("customer_id", "order_id", PairCounts::new(1, 50));

        assert_eq!(
            PairCounts::lookup(&stats, "customer_id", "order_id"),
            PairCounts::new(1, 50)
        );
        assert_eq!(
            PairCounts::lookup(&stats, "order_id", "customer_id"),
            PairCounts::new(50, 1)
        );
        assert!(stats.contains_pair("order_id", "customer_id"));
    }

    #[test]
    fn missing_values_read_as_zero() {
        let mut stats = GroupedMaxima::new();
        stats.insert("a", "b", 4);
        assert_eq!(stats.grouped_max("b", "a"), 0);
        assert!(!stats.contains_pair("a", "b"));
        assert_eq!(stats.len(), 1);
    }
}
