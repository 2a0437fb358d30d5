pub mod config;
pub mod error;
pub mod logging;

pub mod catalog;
pub mod common;
pub mod ingest;
pub mod query;
pub mod storage;
