use std::collections::HashMap;

use crate::{
    common::{
        types::{DataType, RowId},
        value::Value,
    },
    error::{IndexError, Result},
    query::ast::Operator,
    storage::index::{Index, IndexKind},
};

/// Attribute → indexes registry, passed explicitly to the loader and the
/// evaluator.
#[derive(Default)]
pub struct Catalog {
    indexes: HashMap<String, Vec<Box<dyn Index>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All indexes on one attribute must agree on the key type.
    pub fn add_index(&mut self, attribute: impl Into<String>, index: Box<dyn Index>) -> Result<()> {
        let attribute = attribute.into();

        if let Some(expected) = self.data_type(&attribute) {
            if index.data_type() != expected {
                return Err(IndexError::TypeMismatch {
                    attribute,
                    expected,
                    found: index.data_type(),
                });
            }
        }

        tracing::debug!(%attribute, index = index.pretty_name(), "registered index");
        self.indexes.entry(attribute).or_default().push(index);
        Ok(())
    }

    pub fn drop_indexes(&mut self, attribute: &str) -> bool {
        self.indexes.remove(attribute).is_some()
    }

    /// Best index for `operator` on `attribute`, by [`IndexKind::preference`].
    pub fn get_index(&self, attribute: &str, operator: Operator) -> Option<&dyn Index> {
        let candidates = self.indexes.get(attribute)?;

        IndexKind::preference(operator).iter().find_map(|kind| {
            candidates
                .iter()
                .find(|idx| idx.kind() == *kind && idx.supports(operator))
                .map(|idx| &**idx)
        })
    }

    pub fn get_indexes(&self, attribute: &str) -> &[Box<dyn Index>] {
        self.indexes.get(attribute).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn data_type(&self, attribute: &str) -> Option<DataType> {
        self.get_indexes(attribute).first().map(|idx| idx.data_type())
    }

    /// Indexed attribute names, sorted.
    pub fn attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.indexes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Feeds one occurrence into every index on `attribute`.
    pub fn insert(&mut self, attribute: &str, key: &Value, row_id: RowId) -> Result<()> {
        for index in self.indexes.get_mut(attribute).into_iter().flatten() {
            index.insert(key.clone(), row_id)?;
        }
        Ok(())
    }

    /// Removes `key` from every index on `attribute`; true if any held it.
    pub fn delete(&mut self, attribute: &str, key: &Value) -> Result<bool> {
        let mut removed = false;
        for index in self.indexes.get_mut(attribute).into_iter().flatten() {
            removed |= index.delete(key)?;
        }
        Ok(removed)
    }
}
