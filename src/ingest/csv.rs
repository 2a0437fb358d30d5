use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result};

use crate::{
    catalog::Catalog,
    common::{
        types::{DataType, RowId},
        value::Value,
    },
    config::Config,
    storage::index::IndexKind,
};

/// Index kinds to build, per attribute.
pub type IndexPlan = HashMap<String, Vec<IndexKind>>;

/// A record that was left out of every index because one of its indexed
/// fields failed to convert. Its row id is still consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row_id: RowId,
    pub attribute: String,
    pub raw: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Row ids handed out, skipped rows included.
    pub rows: u32,
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    /// Upper end of the complement universe, `None` for an empty load.
    pub fn max_row_id(&self) -> Option<RowId> {
        self.rows.checked_sub(1)
    }
}

#[derive(Debug, Clone)]
struct Column {
    name: String,
    data_type: DataType,
}

/// Builds the indexes named in an [`IndexPlan`] from delimited text whose
/// header line declares `name:type` per column.
pub struct CsvLoader {
    config: Config,
    plan: IndexPlan,
}

impl CsvLoader {
    pub fn new(config: Config, plan: IndexPlan) -> Self {
        Self { config, plan }
    }

    pub fn load_path(&self, path: impl AsRef<Path>, catalog: &mut Catalog) -> Result<LoadReport> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        self.load_reader(BufReader::new(file), catalog)
            .with_context(|| format!("loading {}", path.display()))
    }

    pub fn load_reader<R: BufRead>(&self, reader: R, catalog: &mut Catalog) -> Result<LoadReport> {
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line.context("reading header")?,
            None => {
                tracing::warn!("empty input, nothing to index");
                return Ok(LoadReport::default());
            }
        };

        let columns = self.parse_header(&header);
        self.create_indexes(&columns, catalog)?;

        let mut report = LoadReport::default();
        for (lineno, line) in lines.enumerate() {
            let line = line.with_context(|| format!("reading line {}", lineno + 2))?;
            if line.trim().is_empty() {
                continue;
            }

            let row_id = report.rows;
            report.rows += 1;

            match self.convert_row(&columns, &line, row_id) {
                Ok(keys) => {
                    for (attribute, key) in keys {
                        catalog.insert(attribute, &key, row_id)?;
                    }
                }
                Err(skipped) => {
                    tracing::warn!(
                        row_id,
                        attribute = %skipped.attribute,
                        raw = %skipped.raw,
                        "skipping row: {}",
                        skipped.reason
                    );
                    report.skipped.push(skipped);
                }
            }
        }

        tracing::info!(
            rows = report.rows,
            skipped = report.skipped.len(),
            "load complete"
        );
        Ok(report)
    }

    /// One slot per header token so field positions stay aligned; bad
    /// tokens leave their slot empty.
    fn parse_header(&self, header: &str) -> Vec<Option<Column>> {
        header
            .split(self.config.delimiter)
            .map(|token| {
                let parts: Vec<&str> = token.split(':').map(str::trim).collect();
                let [name, ty] = parts.as_slice() else {
                    tracing::warn!(token, "invalid header token, expected name:type");
                    return None;
                };
                if name.is_empty() {
                    tracing::warn!(token, "invalid header token, empty attribute name");
                    return None;
                }

                match ty.parse::<DataType>() {
                    Ok(data_type) => Some(Column {
                        name: name.to_string(),
                        data_type,
                    }),
                    Err(err) => {
                        tracing::warn!(attribute = *name, "{err}, column left unindexed");
                        None
                    }
                }
            })
            .collect()
    }

    fn create_indexes(&self, columns: &[Option<Column>], catalog: &mut Catalog) -> Result<()> {
        for column in columns.iter().flatten() {
            let Some(kinds) = self.plan.get(&column.name) else {
                continue;
            };
            for kind in kinds {
                let index = kind.create(column.name.as_str(), column.data_type, &self.config);
                catalog
                    .add_index(column.name.as_str(), index)
                    .with_context(|| format!("adding {kind} index on '{}'", column.name))?;
            }
        }

        for attribute in self.plan.keys() {
            if !columns.iter().flatten().any(|c| &c.name == attribute) {
                tracing::warn!(%attribute, "planned attribute not present in header");
            }
        }
        Ok(())
    }

    /// All indexed keys of a record, or the first field that failed.
    fn convert_row<'c>(
        &self,
        columns: &'c [Option<Column>],
        line: &str,
        row_id: RowId,
    ) -> std::result::Result<Vec<(&'c str, Value)>, SkippedRow> {
        let mut keys = Vec::new();

        for (column, raw) in columns.iter().zip(line.split(self.config.delimiter)) {
            let Some(column) = column else { continue };
            if !self.plan.contains_key(&column.name) {
                continue;
            }

            let raw = raw.trim();
            match Value::parse(column.data_type, raw) {
                Ok(key) => keys.push((column.name.as_str(), key)),
                Err(err) => {
                    return Err(SkippedRow {
                        row_id,
                        attribute: column.name.clone(),
                        raw: raw.to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(keys)
    }
}

/// Parses one `attr:kind[,kind]` plan entry.
pub fn parse_plan_entry(entry: &str) -> Result<(String, Vec<IndexKind>)> {
    let (attribute, kinds) = entry
        .split_once(':')
        .with_context(|| format!("index plan '{entry}' is not attr:kind[,kind]"))?;

    let attribute = attribute.trim();
    anyhow::ensure!(!attribute.is_empty(), "index plan '{entry}' names no attribute");

    let kinds = kinds
        .split(',')
        .map(str::parse::<IndexKind>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("index plan '{entry}'"))?;

    Ok((attribute.to_string(), kinds))
}
