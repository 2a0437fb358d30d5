use std::fmt;

use crate::{
    common::value::Value,
    error::{IndexError, Result},
};

/// Operators a predicate leaf can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    /// Inclusive on both ends; needs `second_value`.
    Range,
}

impl Operator {
    /// Whether answering the operator needs keys in order.
    pub fn is_ordered(self) -> bool {
        !matches!(self, Operator::Eq)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Eq => "EQ",
            Operator::Lt => "LT",
            Operator::Le => "LE",
            Operator::Gt => "GT",
            Operator::Ge => "GE",
            Operator::Range => "RANGE",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub attribute: String,
    pub operator: Operator,
    pub value: Value,
    pub second_value: Option<Value>,
}

impl Predicate {
    pub fn new(attribute: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
            value: value.into(),
            second_value: None,
        }
    }

    pub fn eq(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attribute, Operator::Eq, value)
    }

    pub fn range(
        attribute: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        Self {
            second_value: Some(high.into()),
            ..Self::new(attribute, Operator::Range, low)
        }
    }

    /// Upper bound of a `Range` predicate.
    pub fn upper(&self) -> Result<&Value> {
        self.second_value.as_ref().ok_or_else(|| {
            IndexError::MalformedPredicate(format!(
                "RANGE on '{}' has no upper bound",
                self.attribute
            ))
        })
    }

    /// Rejects shapes no index can answer: a range without its upper bound,
    /// or a second value on an operator that takes one.
    pub fn validate(&self) -> Result<()> {
        match (self.operator, &self.second_value) {
            (Operator::Range, None) => self.upper().map(|_| ()),
            (Operator::Range, Some(_)) | (_, None) => Ok(()),
            (op, Some(_)) => Err(IndexError::MalformedPredicate(format!(
                "{op} on '{}' takes a single value",
                self.attribute
            ))),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.second_value {
            Some(high) => write!(
                f,
                "{} {} {} and {}",
                self.attribute, self.operator, self.value, high
            ),
            None => write!(f, "{} {} {}", self.attribute, self.operator, self.value),
        }
    }
}

/// Boolean predicate tree. `Not` has exactly one operand by construction.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryNode {
    Predicate(Predicate),
    And(Box<QueryNode>, Box<QueryNode>),
    Or(Box<QueryNode>, Box<QueryNode>),
    Not(Box<QueryNode>),
}

impl QueryNode {
    pub fn and(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: QueryNode) -> Self {
        QueryNode::Not(Box::new(inner))
    }
}

impl From<Predicate> for QueryNode {
    fn from(p: Predicate) -> Self {
        QueryNode::Predicate(p)
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Predicate(p) => write!(f, "{p}"),
            QueryNode::And(l, r) => write!(f, "({l} AND {r})"),
            QueryNode::Or(l, r) => write!(f, "({l} OR {r})"),
            QueryNode::Not(inner) => write!(f, "NOT {inner}"),
        }
    }
}
