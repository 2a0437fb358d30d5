use std::ops::Bound;

use crate::{
    common::{
        types::{DataType, RowId},
        value::Value,
    },
    error::Result,
    query::ast::{Operator, Predicate},
    storage::{
        btree::BPlusTree,
        index::{Index, IndexKind, check_key},
    },
};

/// [`BPlusTree`] bound to one attribute and key type.
pub struct BPlusTreeIndex {
    attribute: String,
    data_type: DataType,
    tree: BPlusTree<Value>,
}

impl BPlusTreeIndex {
    pub fn new(attribute: impl Into<String>, data_type: DataType, order: usize) -> Self {
        Self {
            attribute: attribute.into(),
            data_type,
            tree: BPlusTree::new(order),
        }
    }

    pub fn tree(&self) -> &BPlusTree<Value> {
        &self.tree
    }

    pub fn order(&self) -> usize {
        self.tree.order()
    }

    pub fn get_height(&self) -> usize {
        self.tree.get_height()
    }

    pub fn get_all_keys(&self) -> Vec<Value> {
        self.tree.get_all_keys()
    }

    pub fn range_query(
        &self,
        start: &Value,
        start_inclusive: bool,
        end: &Value,
        end_inclusive: bool,
    ) -> Result<Vec<RowId>> {
        let start = self.check(start)?;
        let end = self.check(end)?;

        tracing::debug!(
            attribute = %self.attribute,
            "range query {}{start}, {end}{}",
            if start_inclusive { "[" } else { "(" },
            if end_inclusive { "]" } else { ")" },
        );
        Ok(self
            .tree
            .range_query(start, start_inclusive, end, end_inclusive))
    }

    fn check<'v>(&self, key: &'v Value) -> Result<&'v Value> {
        check_key(&self.attribute, self.data_type, key)
    }
}

impl Index for BPlusTreeIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::BPlusTree
    }

    fn attribute(&self) -> &str {
        &self.attribute
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn supports(&self, _operator: Operator) -> bool {
        true
    }

    fn insert(&mut self, key: Value, row_id: RowId) -> Result<()> {
        self.check(&key)?;
        self.tree.insert(key, row_id);
        Ok(())
    }

    fn delete(&mut self, key: &Value) -> Result<bool> {
        Ok(self.tree.delete(self.check(key)?))
    }

    fn search(&self, key: &Value) -> Result<Option<Vec<RowId>>> {
        let key = self.check(key)?;
        tracing::trace!(attribute = %self.attribute, %key, "searching for key");
        Ok(self.tree.search(key).map(<[RowId]>::to_vec))
    }

    fn evaluate(&self, predicate: &Predicate) -> Result<Vec<RowId>> {
        tracing::info!(
            attribute = %self.attribute,
            operator = %predicate.operator,
            "evaluating predicate using B+Tree index"
        );

        let value = self.check(&predicate.value)?;
        let rows = match predicate.operator {
            Operator::Eq => self.search(value)?.unwrap_or_default(),
            Operator::Lt => self.tree.scan(Bound::Unbounded, Bound::Excluded(value)),
            Operator::Le => self.tree.scan(Bound::Unbounded, Bound::Included(value)),
            Operator::Gt => self.tree.scan(Bound::Excluded(value), Bound::Unbounded),
            Operator::Ge => self.tree.scan(Bound::Included(value), Bound::Unbounded),
            Operator::Range => self.range_query(value, true, predicate.upper()?, true)?,
        };
        Ok(rows)
    }

    fn keys(&self) -> Vec<Value> {
        self.tree.get_all_keys()
    }
}
