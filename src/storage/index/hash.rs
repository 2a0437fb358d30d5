use std::collections::HashMap;

use crate::{
    common::{
        types::{DataType, RowId},
        value::Value,
    },
    error::Result,
    query::ast::{Operator, Predicate},
    storage::index::{Index, IndexKind, check_key, unsupported},
};

/// Equality-only index.
pub struct HashIndex {
    attribute: String,
    data_type: DataType,
    buckets: HashMap<Value, Vec<RowId>>,
}

impl HashIndex {
    pub fn new(attribute: impl Into<String>, data_type: DataType) -> Self {
        Self {
            attribute: attribute.into(),
            data_type,
            buckets: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Index for HashIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Hash
    }

    fn attribute(&self) -> &str {
        &self.attribute
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn supports(&self, operator: Operator) -> bool {
        operator == Operator::Eq
    }

    fn insert(&mut self, key: Value, row_id: RowId) -> Result<()> {
        check_key(&self.attribute, self.data_type, &key)?;
        self.buckets.entry(key).or_default().push(row_id);
        Ok(())
    }

    fn delete(&mut self, key: &Value) -> Result<bool> {
        let key = check_key(&self.attribute, self.data_type, key)?;
        Ok(self.buckets.remove(key).is_some())
    }

    fn search(&self, key: &Value) -> Result<Option<Vec<RowId>>> {
        let key = check_key(&self.attribute, self.data_type, key)?;
        Ok(self.buckets.get(key).cloned())
    }

    fn evaluate(&self, predicate: &Predicate) -> Result<Vec<RowId>> {
        if !self.supports(predicate.operator) {
            return Err(unsupported(self, predicate.operator));
        }

        tracing::info!(attribute = %self.attribute, "evaluating predicate using hash index");
        Ok(self.search(&predicate.value)?.unwrap_or_default())
    }

    fn keys(&self) -> Vec<Value> {
        let mut keys: Vec<Value> = self.buckets.keys().cloned().collect();
        keys.sort();
        keys
    }
}
