use thiserror::Error;

use crate::{common::types::DataType, query::ast::Operator};

pub type Result<T> = std::result::Result<T, IndexError>;

/// Recoverable failures of the index layer.
///
/// Structural invariant violations inside a tree are not represented here;
/// they panic. A key that is simply absent is not an error either.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    #[error("type mismatch on '{attribute}': index holds {expected}, got {found}")]
    TypeMismatch {
        attribute: String,
        expected: DataType,
        found: DataType,
    },

    #[error("cannot compare {left} with {right}")]
    Incomparable { left: DataType, right: DataType },

    /// The catalog routed a predicate to an index kind that cannot answer it.
    #[error("{index} on '{attribute}' cannot serve operator {operator}")]
    UnsupportedOperator {
        index: &'static str,
        attribute: String,
        operator: Operator,
    },

    #[error("no index on '{attribute}' serves operator {operator}")]
    NoIndex {
        attribute: String,
        operator: Operator,
    },

    #[error("malformed predicate: {0}")]
    MalformedPredicate(String),

    #[error("invalid {data_type} literal '{literal}'")]
    InvalidLiteral {
        data_type: DataType,
        literal: String,
    },

    #[error("unknown attribute type '{0}'")]
    UnknownDataType(String),

    #[error("unknown index kind '{0}'")]
    UnknownIndexKind(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = IndexError::TypeMismatch {
            attribute: "age".into(),
            expected: DataType::Int64,
            found: DataType::String,
        };
        assert_eq!(
            err.to_string(),
            "type mismatch on 'age': index holds integer, got string"
        );

        let err = IndexError::UnsupportedOperator {
            index: "Hash Index",
            attribute: "age".into(),
            operator: Operator::Range,
        };
        assert_eq!(
            err.to_string(),
            "Hash Index on 'age' cannot serve operator RANGE"
        );
    }
}
