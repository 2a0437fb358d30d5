pub mod bitmap;
pub mod btree;
pub mod hash;


use std::{fmt, str::FromStr};

use crate::{
    common::{
        types::{DataType, RowId},
        value::Value,
    },
    config::Config,
    error::{IndexError, Result},
    query::ast::{Operator, Predicate},
};

pub use bitmap::BitmapIndex;
pub use btree::BPlusTreeIndex;
pub use hash::HashIndex;

/// Capability shared by every secondary index kind.
///
/// All key arguments must carry the index's [`DataType`]; anything else is a
/// [`IndexError::TypeMismatch`]. Absent keys are not errors.
pub trait Index: Send + Sync {
    fn kind(&self) -> IndexKind;
    fn attribute(&self) -> &str;
    fn data_type(&self) -> DataType;

    /// Whether `evaluate` can answer `operator` natively.
    fn supports(&self, operator: Operator) -> bool;

    fn insert(&mut self, key: Value, row_id: RowId) -> Result<()>;
    fn delete(&mut self, key: &Value) -> Result<bool>;
    fn search(&self, key: &Value) -> Result<Option<Vec<RowId>>>;

    /// Row ids satisfying `predicate`. Fails with
    /// [`IndexError::UnsupportedOperator`] if `supports` says no.
    fn evaluate(&self, predicate: &Predicate) -> Result<Vec<RowId>>;

    /// Distinct keys in ascending order.
    fn keys(&self) -> Vec<Value>;

    fn pretty_name(&self) -> &'static str {
        self.kind().pretty_name()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexKind {
    BPlusTree,
    Hash,
    Bitmap,
}

impl IndexKind {
    pub fn pretty_name(self) -> &'static str {
        match self {
            IndexKind::BPlusTree => "B+Tree Index",
            IndexKind::Hash => "Hash Index",
            IndexKind::Bitmap => "Bitmap Index",
        }
    }

    /// Kinds to try, best first, when choosing an index for `operator`.
    pub fn preference(operator: Operator) -> &'static [IndexKind] {
        if operator.is_ordered() {
            &[IndexKind::BPlusTree, IndexKind::Bitmap]
        } else {
            &[IndexKind::Hash, IndexKind::Bitmap, IndexKind::BPlusTree]
        }
    }

    pub fn create(
        self,
        attribute: impl Into<String>,
        data_type: DataType,
        config: &Config,
    ) -> Box<dyn Index> {
        let attribute = attribute.into();
        match self {
            IndexKind::BPlusTree => {
                Box::new(BPlusTreeIndex::new(attribute, data_type, config.order))
            }
            IndexKind::Hash => Box::new(HashIndex::new(attribute, data_type)),
            IndexKind::Bitmap => Box::new(BitmapIndex::new(
                attribute,
                data_type,
                config.max_row_id.unwrap_or(0),
            )),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndexKind::BPlusTree => "BPlusTree",
            IndexKind::Hash => "Hash",
            IndexKind::Bitmap => "Bitmap",
        };
        f.write_str(s)
    }
}

impl FromStr for IndexKind {
    type Err = IndexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bplustree" | "btree" | "b+tree" => Ok(IndexKind::BPlusTree),
            "hash" => Ok(IndexKind::Hash),
            "bitmap" => Ok(IndexKind::Bitmap),
            other => Err(IndexError::UnknownIndexKind(other.to_string())),
        }
    }
}

pub(crate) fn check_key<'v>(
    attribute: &str,
    expected: DataType,
    key: &'v Value,
) -> Result<&'v Value> {
    if key.data_type() != expected {
        return Err(IndexError::TypeMismatch {
            attribute: attribute.to_string(),
            expected,
            found: key.data_type(),
        });
    }
    Ok(key)
}

pub(crate) fn unsupported(index: &dyn Index, operator: Operator) -> IndexError {
    IndexError::UnsupportedOperator {
        index: index.pretty_name(),
        attribute: index.attribute().to_string(),
        operator,
    }
}
