use std::io::Cursor;

use helium_index::{
    catalog::Catalog,
    common::types::RowId,
    config::Config,
    ingest::{CsvLoader, IndexPlan, LoadReport},
    query::{evaluate_query, parse_query},
};

pub struct TestIndex {
    pub catalog: Catalog,
    pub report: LoadReport,
}

impl TestIndex {
    pub fn load(text: &str, plan: IndexPlan) -> Self {
        Self::load_with(text, plan, Config::default().with_order(3))
    }

    pub fn load_with(text: &str, plan: IndexPlan, config: Config) -> Self {
        super::init_logging_for_tests();

        let mut catalog = Catalog::new();
        let report = CsvLoader::new(config, plan)
            .load_reader(Cursor::new(text), &mut catalog)
            .unwrap();
        Self { catalog, report }
    }

    pub fn max_row_id(&self) -> RowId {
        self.report.max_row_id().unwrap()
    }

    pub fn query(&self, text: &str) -> Result<Vec<RowId>, anyhow::Error> {
        let node = parse_query(text, &self.catalog)?;
        let rows = evaluate_query(&self.catalog, &node, self.max_row_id())?;
        Ok(rows.into_iter().collect())
    }

    #[allow(dead_code)]
    pub fn rows(&self, text: &str) -> Vec<RowId> {
        self.query(text)
            .unwrap_or_else(|e| panic!("query {text:?} failed: {e}"))
    }
}
