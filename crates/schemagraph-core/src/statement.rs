//! Subject-predicate-object form of facts.

use crate::facts::{Dimension, Fact};

/// Subject or object of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Entity(String),
    Column { entity: String, column: String },
    CompoundPair {
        entity: String,
        first: String,
        second: String,
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
    DataType(String),
    Dimension(Dimension),
    Integer(u64),
}

/// Predicate vocabulary of the fact graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    HasColumn,
    HasDataType,
    NumDistinct,
    HasDimension,
    HasKey,
    HasSingleKey,
    HasCompoundKey,
    HasStrongKey,
    HasWeakKey,
    HasOneToManyKey,
    HasOneKey,
    HasManyKey,
    HasManyToManyKey,
}

impl Predicate {
    pub fn name(self) -> &'static str {
        match self {
            Predicate::HasColumn => "hasColumn",
            Predicate::HasDataType => "hasDataType",
            Predicate::NumDistinct => "numDistinct",
            Predicate::HasDimension => "hasDimension",
            Predicate::HasKey => "hasKey",
            Predicate::HasSingleKey => "hasSingleKey",
            Predicate::HasCompoundKey => "hasCompoundKey",
            Predicate::HasStrongKey => "hasStrongKey",
            Predicate::HasWeakKey => "hasWeakKey",
            Predicate::HasOneToManyKey => "hasOne2ManyKey",
            Predicate::HasOneKey => "hasOneKey",
            Predicate::HasManyKey => "hasManyKey",
            Predicate::HasManyToManyKey => "hasMany2ManyKey",
        }
    }
}

/// One subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: Node,
    pub predicate: Predicate,
    pub object: Node,
}

impl Statement {
    fn new(subject: Node, predicate: Predicate, object: Node) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

fn entity(name: &str) -> Node {
    Node::Entity(name.to_string())
}

fn column(entity: &str, column: &str) -> Node {
    Node::Column {
        entity: entity.to_string(),
        column: column.to_string(),
    }
}

impl Fact {
    /// Expand the fact into the statements that represent it.
    pub fn statements(&self) -> Vec<Statement> {
        match self {
            Fact::HasColumn { entity: e, column: c } => {
                vec![Statement::new(entity(e), Predicate::HasColumn, column(e, c))]
            }
            Fact::DataType {
                entity: e,
                column: c,
                data_type,
            } => vec![Statement::new(
                column(e, c),
                Predicate::HasDataType,
                Node::DataType(data_type.clone()),
            )],
            Fact::DistinctCount {
                entity: e,
                column: c,
                count,
            } => vec![Statement::new(
                column(e, c),
                Predicate::NumDistinct,
                Node::Integer(*count),
            )],
            Fact::Dimension {
                entity: e,
                column: c,
                dimension,
            } => vec![Statement::new(
                column(e, c),
                Predicate::HasDimension,
                Node::Dimension(*dimension),
            )],
            Fact::KeyColumn { entity: e, column: c } => {
                vec![Statement::new(entity(e), Predicate::HasKey, column(e, c))]
            }
            Fact::SingleKey { entity: e, column: c } => {
                vec![Statement::new(entity(e), Predicate::HasSingleKey, column(e, c))]
            }
            Fact::CompoundKey {
                entity: e,
                first,
                second,
            } => vec![Statement::new(
                entity(e),
                Predicate::HasCompoundKey,
                compound(e, first, second),
            )],
            Fact::KeyStrength {
                entity: e,
                first,
                second,
                strong,
                weak,
            } => vec![
                Statement::new(
                    compound(e, first, second),
                    Predicate::HasStrongKey,
                    column(e, strong),
                ),
                Statement::new(
                    compound(e, first, second),
                    Predicate::HasWeakKey,
                    column(e, weak),
                ),
            ],
            Fact::OneToMany { entity: e, one, many } => {
                let relation = Node::OneToMany {
                    entity: e.clone(),
                    one: one.clone(),
                    many: many.clone(),
                };
                vec![
                    Statement::new(entity(e), Predicate::HasOneToManyKey, relation.clone()),
                    Statement::new(relation.clone(), Predicate::HasOneKey, column(e, one)),
                    Statement::new(relation, Predicate::HasManyKey, column(e, many)),
                ]
            }
            Fact::ManyToMany {
                entity: e,
                first,
                second,
            } => {
                let relation = Node::ManyToMany {
                    entity: e.clone(),
                    first: first.clone(),
                    second: second.clone(),
                };
                vec![
                    Statement::new(entity(e), Predicate::HasManyToManyKey, relation.clone()),
                    Statement::new(relation.clone(), Predicate::HasManyKey, column(e, first)),
                    Statement::new(relation, Predicate::HasManyKey, column(e, second)),
                ]
            }
        }
    }
}

fn compound(entity: &str, first: &str, second: &str) -> Node {
    Node::CompoundPair {
        entity: entity.to_string(),
        first: first.to_string(),
        second: second.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_to_many_has_three_statements() {
        let fact = Fact::OneToMany {
            entity: "orders".to_string(),
            one: "customer_id".to_string(),
            many: "order_id".to_string(),
        };
        let predicates: Vec<Predicate> = fact
            .statements()
            .into_iter()
            .map(|statement| statement.predicate)
            .collect();
        assert_eq!(
            predicates,
            vec![
                Predicate::HasOneToManyKey,
                Predicate::HasOneKey,
                Predicate::HasManyKey
            ]
        );
    }

    #[test]
    fn many_to_many_links_both_columns_as_many_sides() {
        let fact = Fact::ManyToMany {
            entity: "orders".to_string(),
            first: "a".to_string(),
            second: "b".to_string(),
        };
        let statements = fact.statements();
        assert_eq!(statements.len(), 3);
        let many_sides: Vec<&Node> = statements
            .iter()
            .filter(|statement| statement.predicate == Predicate::HasManyKey)
            .map(|statement| &statement.object)
            .collect();
        assert_eq!(many_sides, vec![&column("orders", "a"), &column("orders", "b")]);
    }

    #[test]
    fn key_strength_hangs_off_the_compound_node() {
        let fact = Fact::KeyStrength {
            entity: "flight".to_string(),
            first: "airline_code".to_string(),
            second: "flight_number".to_string(),
            strong: "airline_code".to_string(),
            weak: "flight_number".to_string(),
        };
        let statements = fact.statements();
        assert_eq!(statements.len(), 2);
        assert!(statements.iter().all(|statement| statement.subject
            == compound("flight", "airline_code", "flight_number")));
    }
}
