use crate::{
    catalog::Catalog,
    common::types::{RowId, RowSet},
    error::{IndexError, Result},
    query::ast::{Predicate, QueryNode},
};

/// Answers predicate trees from the indexes registered in a [`Catalog`].
///
/// Leaves are sent to the catalog's chosen index; `And`/`Or` intersect and
/// union their operands; `Not` complements against `0..=max_row_id`.
pub struct QueryEvaluator<'a> {
    catalog: &'a Catalog,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn evaluate(&self, node: &QueryNode, max_row_id: RowId) -> Result<RowSet> {
        match node {
            QueryNode::Predicate(predicate) => self.evaluate_predicate(predicate),

            QueryNode::And(left, right) => {
                let left = self.evaluate(left, max_row_id)?;
                let right = self.evaluate(right, max_row_id)?;
                Ok(left.intersection(&right).copied().collect())
            }

            QueryNode::Or(left, right) => {
                let mut left = self.evaluate(left, max_row_id)?;
                let mut right = self.evaluate(right, max_row_id)?;
                left.append(&mut right);
                Ok(left)
            }

            QueryNode::Not(inner) => {
                let inner = self.evaluate(inner, max_row_id)?;
                Ok((0..=max_row_id).filter(|rid| !inner.contains(rid)).collect())
            }
        }
    }

    fn evaluate_predicate(&self, predicate: &Predicate) -> Result<RowSet> {
        tracing::debug!(%predicate, "evaluating predicate");
        predicate.validate()?;

        let index = self
            .catalog
            .get_index(&predicate.attribute, predicate.operator)
            .ok_or_else(|| IndexError::NoIndex {
                attribute: predicate.attribute.clone(),
                operator: predicate.operator,
            })?;

        Ok(index.evaluate(predicate)?.into_iter().collect())
    }
}

/// One-shot form of [`QueryEvaluator::evaluate`].
pub fn evaluate_query(catalog: &Catalog, node: &QueryNode, max_row_id: RowId) -> Result<RowSet> {
    QueryEvaluator::new(catalog).evaluate(node, max_row_id)
}
