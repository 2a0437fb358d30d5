pub mod csv;


pub use csv::{CsvLoader, IndexPlan, LoadReport, SkippedRow, parse_plan_entry};
