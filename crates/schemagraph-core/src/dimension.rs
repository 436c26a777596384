//! Dimension classification of a single column from its distinct count.

use crate::catalog::CatalogColumn;
use crate::facts::{DimensionLabel, Fact};

/// Distinct count at or below which a column is a discrete dimension.
pub const DEFAULT_DISCRETE_THRESHOLD: u64 = 100;

/// Declared types that can carry a scalar dimension.
const SCALAR_TYPES: &[&str] = &["integer", "numeric"];

/// Name fragments of geographic coordinates, which are never scalar.
const GEO_FRAGMENTS: &[&str] = &["latitude", "longitude"];

/// Label a column from its distinct count; first matching rule wins.
pub fn classify_dimension(
    column: &CatalogColumn,
    distinct_count: u64,
    threshold: u64,
) -> DimensionLabel {
    if distinct_count <= threshold {
        return DimensionLabel::Discrete;
    }

    let is_geo = GEO_FRAGMENTS
        .iter()
        .any(|fragment| column.name.contains(fragment));
    let is_numeric = SCALAR_TYPES
        .iter()
        .any(|ty| column.declared_type == *ty);

    if !is_geo && is_numeric {
        DimensionLabel::Scalar
    } else {
        DimensionLabel::Unclassified
    }
}

/// Dimension fact for a column, if it classifies as one.
pub fn dimension_fact(column: &CatalogColumn, distinct_count: u64, threshold: u64) -> Option<Fact> {
    classify_dimension(column, distinct_count, threshold)
        .dimension()
        .map(|dimension| Fact::Dimension {
            entity: column.entity.clone(),
            column: column.name.clone(),
            dimension,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::Dimension;

    fn column(name: &str, declared: &str) -> CatalogColumn {
        CatalogColumn::new("city", name, declared, "int4")
    }

    #[test]
    fn small_counts_are_discrete_for_any_type() {
        for declared in ["integer", "numeric", "text", "date", "boolean"] {
            for count in [0, 1, 57, 100] {
                assert_eq!(
                    classify_dimension(&column("population", declared), count, 100),
                    DimensionLabel::Discrete
                );
            }
        }
    }

    #[test]
    fn large_numeric_counts_are_scalar() {
        assert_eq!(
            classify_dimension(&column("population", "integer"), 101, 100),
            DimensionLabel::Scalar
        );
        assert_eq!(
            classify_dimension(&column("area", "numeric"), 5000, 100),
            DimensionLabel::Scalar
        );
    }

    #[test]
    fn coordinates_are_never_scalar() {
        for name in ["latitude", "longitude", "city_latitude"] {
            assert_eq!(
                classify_dimension(&column(name, "numeric"), 5000, 100),
                DimensionLabel::Unclassified
            );
        }
    }

    #[test]
    fn coordinate_match_is_case_sensitive() {
        assert_eq!(
            classify_dimension(&column("Latitude", "numeric"), 5000, 100),
            DimensionLabel::Scalar
        );
    }

    #[test]
    fn large_non_numeric_counts_are_unclassified() {
        let col = column("name", "character varying");
        assert_eq!(classify_dimension(&col, 5000, 100), DimensionLabel::Unclassified);
        assert_eq!(dimension_fact(&col, 5000, 100), None);
    }

    #[test]
    fn threshold_is_configurable() {
        let col = column("elevation", "integer");
        assert_eq!(classify_dimension(&col, 40, 20), DimensionLabel::Scalar);
        assert_eq!(
            dimension_fact(&col, 40, 50),
            Some(Fact::Dimension {
                entity: "city".to_string(),
                column: "elevation".to_string(),
                dimension: Dimension::Discrete,
            })
        );
    }
}
