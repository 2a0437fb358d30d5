use std::{collections::BTreeMap, ops::Bound};

use crate::{
    common::{
        types::{DataType, RowId},
        value::Value,
    },
    error::Result,
    query::ast::{Operator, Predicate},
    storage::index::{Index, IndexKind, check_key},
};

const WORD_BITS: usize = u64::BITS as usize;

/// Fixed-width bit vector over row ids; grows when a larger row id shows up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bitmap {
    words: Vec<u64>,
}

impl Bitmap {
    pub fn with_rows(rows: usize) -> Self {
        Self {
            words: vec![0; rows.div_ceil(WORD_BITS)],
        }
    }

    pub fn set(&mut self, row: RowId) {
        let (word, bit) = Self::locate(row);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << bit;
    }

    pub fn contains(&self, row: RowId) -> bool {
        let (word, bit) = Self::locate(row);
        self.words.get(word).is_some_and(|w| w & (1 << bit) != 0)
    }

    pub fn union_with(&mut self, other: &Bitmap) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (dst, src) in self.words.iter_mut().zip(&other.words) {
            *dst |= src;
        }
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Set row ids, ascending.
    pub fn rows(&self) -> Vec<RowId> {
        let mut out = Vec::with_capacity(self.count());
        for (i, &word) in self.words.iter().enumerate() {
            let mut w = word;
            while w != 0 {
                let bit = w.trailing_zeros() as usize;
                out.push((i * WORD_BITS + bit) as RowId);
                w &= w - 1;
            }
        }
        out
    }

    fn locate(row: RowId) -> (usize, usize) {
        let row = row as usize;
        (row / WORD_BITS, row % WORD_BITS)
    }
}

/// One bit vector per distinct value, suited to low-cardinality attributes.
pub struct BitmapIndex {
    attribute: String,
    data_type: DataType,
    rows: usize,
    bitmaps: BTreeMap<Value, Bitmap>,
}

impl BitmapIndex {
    pub fn new(attribute: impl Into<String>, data_type: DataType, max_row_id: RowId) -> Self {
        Self {
            attribute: attribute.into(),
            data_type,
            rows: max_row_id as usize + 1,
            bitmaps: BTreeMap::new(),
        }
    }

    pub fn bitmap(&self, key: &Value) -> Option<&Bitmap> {
        self.bitmaps.get(key)
    }

    fn union_over(&self, lower: Bound<&Value>, upper: Bound<&Value>) -> Vec<RowId> {
        let mut acc = Bitmap::with_rows(self.rows);
        for bitmap in self.bitmaps.range((lower, upper)).map(|(_, b)| b) {
            acc.union_with(bitmap);
        }
        acc.rows()
    }
}

impl Index for BitmapIndex {
    fn kind(&self) -> IndexKind {
        IndexKind::Bitmap
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
        check_key(&self.attribute, self.data_type, &key)?;
        let rows = self.rows;
        self.bitmaps
            .entry(key)
            .or_insert_with(|| Bitmap::with_rows(rows))
            .set(row_id);
        self.rows = self.rows.max(row_id as usize + 1);
        Ok(())
    }

    fn delete(&mut self, key: &Value) -> Result<bool> {
        let key = check_key(&self.attribute, self.data_type, key)?;
        Ok(self.bitmaps.remove(key).is_some())
    }

    fn search(&self, key: &Value) -> Result<Option<Vec<RowId>>> {
        let key = check_key(&self.attribute, self.data_type, key)?;
        Ok(self.bitmaps.get(key).map(Bitmap::rows))
    }

    fn evaluate(&self, predicate: &Predicate) -> Result<Vec<RowId>> {
        tracing::info!(
            attribute = %self.attribute,
            operator = %predicate.operator,
            "evaluating predicate using bitmap index"
        );

        let value = check_key(&self.attribute, self.data_type, &predicate.value)?;
        let rows = match predicate.operator {
            Operator::Eq => self.search(value)?.unwrap_or_default(),
            Operator::Lt => self.union_over(Bound::Unbounded, Bound::Excluded(value)),
            Operator::Le => self.union_over(Bound::Unbounded, Bound::Included(value)),
            Operator::Gt => self.union_over(Bound::Excluded(value), Bound::Unbounded),
            Operator::Ge => self.union_over(Bound::Included(value), Bound::Unbounded),
            Operator::Range => {
                let high = check_key(&self.attribute, self.data_type, predicate.upper()?)?;
                if value > high {
                    Vec::new()
                } else {
                    self.union_over(Bound::Included(value), Bound::Included(high))
                }
            }
        };
        Ok(rows)
    }

    fn keys(&self) -> Vec<Value> {
        self.bitmaps.keys().cloned().collect()
    }
}
