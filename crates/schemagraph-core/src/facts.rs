use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Result of dimension classification for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DimensionLabel {
    Discrete,
    Scalar,
    Unclassified,
}

impl DimensionLabel {
    /// The dimension worth emitting, if any.
    pub fn dimension(self) -> Option<Dimension> {
        match self {
            DimensionLabel::Discrete => Some(Dimension::Discrete),
            DimensionLabel::Scalar => Some(Dimension::Scalar),
            DimensionLabel::Unclassified => None,
        }
    }
}

/// Dimension carried by a dimension fact.
///
/// Discrete dimensions have a small set of values that may or may not be
/// ordered; scalar dimensions have many values with a numeric ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Discrete,
    Scalar,
}

impl Dimension {
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Discrete => "discrete",
            Dimension::Scalar => "scalar",
        }
    }
}

/// A single inferred or observed fact about one entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fact {
    /// The entity owns the column.
    HasColumn { entity: String, column: String },
    /// Storage type of a column.
    DataType {
        entity: String,
        column: String,
        data_type: String,
    },
    /// Number of distinct values observed in a column.
    DistinctCount {
        entity: String,
        column: String,
        count: u64,
    },
    Dimension {
        entity: String,
        column: String,
        dimension: Dimension,
    },
    /// A column that takes part in the declared primary key.
    KeyColumn { entity: String, column: String },
    /// The declared primary key has exactly this one column.
    SingleKey { entity: String, column: String },
    /// Two columns of a compound primary key.
    CompoundKey {
        entity: String,
        first: String,
        second: String,
    },
    /// Strong/weak asymmetry between two compound key columns.
    KeyStrength {
        entity: String,
        first: String,
        second: String,
        strong: String,
        weak: String,
    },
    OneToMany {
        entity: String,
        one: String,
        many: String,
    },
    ManyToMany {
        entity: String,
        first: String,
        second: String,
    },
}

/// Discriminant of a [`Fact`], used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    HasColumn,
    DataType,
    DistinctCount,
    Dimension,
    KeyColumn,
    SingleKey,
    CompoundKey,
    KeyStrength,
    OneToMany,
    ManyToMany,
}

impl Fact {
    pub fn kind(&self) -> FactKind {
        match self {
            Fact::HasColumn { .. } => FactKind::HasColumn,
            Fact::DataType { .. } => FactKind::DataType,
            Fact::DistinctCount { .. } => FactKind::DistinctCount,
            Fact::Dimension { .. } => FactKind::Dimension,
            Fact::KeyColumn { .. } => FactKind::KeyColumn,
            Fact::SingleKey { .. } => FactKind::SingleKey,
            Fact::CompoundKey { .. } => FactKind::CompoundKey,
            Fact::KeyStrength { .. } => FactKind::KeyStrength,
            Fact::OneToMany { .. } => FactKind::OneToMany,
            Fact::ManyToMany { .. } => FactKind::ManyToMany,
        }
    }

    pub fn entity(&self) -> &str {
        match self {
            Fact::HasColumn { entity, .. }
            | Fact::DataType { entity, .. }
            | Fact::DistinctCount { entity, .. }
            | Fact::Dimension { entity, .. }
            | Fact::KeyColumn { entity, .. }
            | Fact::SingleKey { entity, .. }
            | Fact::CompoundKey { entity, .. }
            | Fact::KeyStrength { entity, .. }
            | Fact::OneToMany { entity, .. }
            | Fact::ManyToMany { entity, .. } => entity,
        }
    }

    /// Columns referenced by the fact, in the order they appear in it.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Fact::HasColumn { column, .. }
            | Fact::DataType { column, .. }
            | Fact::DistinctCount { column, .. }
            | Fact::Dimension { column, .. }
            | Fact::KeyColumn { column, .. }
            | Fact::SingleKey { column, .. } => vec![column.as_str()],
            Fact::CompoundKey { first, second, .. }
            | Fact::KeyStrength { first, second, .. }
            | Fact::ManyToMany { first, second, .. } => vec![first.as_str(), second.as_str()],
            Fact::OneToMany { one, many, .. } => vec![one.as_str(), many.as_str()],
        }
    }

    /// Check that the fact names an entity and well-formed columns.
    pub fn validate(&self) -> Result<()> {
        if self.entity().trim().is_empty() {
            return Err(Error::InvalidFact(format!(
                "{:?} fact has an empty entity name",
                self.kind()
            )));
        }

        let columns = self.columns();
        if let Some(position) = columns.iter().position(|col| col.trim().is_empty()) {
            return Err(Error::InvalidFact(format!(
                "{:?} fact on {} has an empty column name at position {position}",
                self.kind(),
                self.entity()
            )));
        }

        if columns.len() == 2 && columns[0] == columns[1] {
            return Err(Error::InvalidFact(format!(
                "{:?} fact on {} pairs column {} with itself",
                self.kind(),
                self.entity(),
                columns[0]
            )));
        }

        match self {
            Fact::DataType { data_type, .. } if data_type.trim().is_empty() => {
                Err(Error::InvalidFact(format!(
                    "data type fact on {} has an empty type name",
                    self.entity()
                )))
            }
            Fact::KeyStrength {
                first,
                second,
                strong,
                weak,
                ..
            } => {
                let consistent = (strong == first && weak == second)
                    || (strong == second && weak == first);
                if consistent {
                    Ok(())
                } else {
                    Err(Error::InvalidFact(format!(
                        "key strength on {} names {strong}/{weak} outside pair {first}/{second}",
                        self.entity()
                    )))
                }
            }
            _ => Ok(()),
        }
    }
}
