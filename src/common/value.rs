use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use chrono::NaiveDate;

use crate::{
    common::types::DataType,
    error::{IndexError, Result},
};

/// A typed attribute value, usable as an index key.
///
/// Values of the same type are totally ordered (floats use the IEEE total
/// order). Values of different types still have an `Ord` so they can live in
/// ordered containers, but indexes reject mixed-type keys before comparing;
/// use [`Value::try_cmp`] where a mismatch must surface as an error.
#[derive(Clone, Debug)]
pub enum Value {
    Int64(i64),
    Float64(f64),
    String(String),
    Date(NaiveDate),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int64(_) => DataType::Int64,
            Value::Float64(_) => DataType::Float64,
            Value::String(_) => DataType::String,
            Value::Date(_) => DataType::Date,
        }
    }

    /// Converts raw text (a CSV cell or a query literal) into a value of `data_type`.
    pub fn parse(data_type: DataType, raw: &str) -> Result<Value> {
        let invalid = || IndexError::InvalidLiteral {
            data_type,
            literal: raw.to_string(),
        };

        match data_type {
            DataType::Int64 => raw.trim().parse().map(Value::Int64).map_err(|_| invalid()),
            DataType::Float64 => raw
                .trim()
                .parse()
                .map(Value::Float64)
                .map_err(|_| invalid()),
            DataType::String => Ok(Value::String(raw.to_string())),
            DataType::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|_| invalid()),
        }
    }

    pub fn try_cmp(&self, other: &Value) -> Result<Ordering> {
        if self.data_type() != other.data_type() {
            return Err(IndexError::Incomparable {
                left: self.data_type(),
                right: other.data_type(),
            });
        }
        Ok(self.cmp(other))
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Int64(_) => 0,
            Value::Float64(_) => 1,
            Value::String(_) => 2,
            Value::Date(_) => 3,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (Value::Float64(a), Value::Float64(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Int64(v) => v.hash(state),
            // consistent with total_cmp: equal iff identical bits
            Value::Float64(v) => v.to_bits().hash(state),
            Value::String(v) => v.hash(state),
            Value::Date(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "'{v}'"),
            Value::Date(v) => write!(f, "'{}'", v.format("%Y-%m-%d")),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}
