use crate::common::types::RowId;

/// Fan-out used when nothing else is configured.
pub const DEFAULT_ORDER: usize = 10;

/// Settings shared by index construction and the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum children per B+Tree internal node.
    pub order: usize,
    /// Field separator of loaded files.
    pub delimiter: char,
    /// Expected largest row id; sizes bitmap indexes up front.
    pub max_row_id: Option<RowId>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            delimiter: ',',
            max_row_id: None,
        }
    }
}

impl Config {
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_max_row_id(mut self, max_row_id: RowId) -> Self {
        self.max_row_id = Some(max_row_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.order, 10);
        assert_eq!(cfg.delimiter, ',');
        assert_eq!(cfg.max_row_id, None);
    }

    #[test]
    fn builder_overrides() {
        let cfg = Config::default()
            .with_order(4)
            .with_delimiter('|')
            .with_max_row_id(99);
        assert_eq!(cfg.order, 4);
        assert_eq!(cfg.delimiter, '|');
        assert_eq!(cfg.max_row_id, Some(99));
    }
}
