use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};

use helium_index::{
    catalog::Catalog,
    common::types::RowId,
    config::{Config, DEFAULT_ORDER},
    ingest::{CsvLoader, IndexPlan, parse_plan_entry},
    logging::{self, DebugLevel},
    query::{evaluate_query, parse_query},
};

const HELP: &str = "\
Queries:
  age = 30
  age RANGE [20, 35] AND NOT city = 'Pune'
  (joined >= '2024-01-01' OR salary < 1000.5)
Commands:
  .indexes        list indexed attributes
  .keys <attr>    distinct keys of an attribute, ascending
  .help           this text
  .quit           exit";

/// Load a delimited file into secondary indexes and query them.
#[derive(Parser, Debug)]
#[command(name = "idxcli", version)]
struct Args {
    /// Input file; the header declares columns as name:type
    file: PathBuf,

    /// Indexes to build, as attr:kind[,kind] (kinds: btree, hash, bitmap)
    #[arg(short, long = "index", value_name = "PLAN", required = true)]
    indexes: Vec<String>,

    /// Maximum children per B+Tree node
    #[arg(long, default_value_t = DEFAULT_ORDER)]
    order: usize,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// 0 off, 1 errors, 2 info, 3 debug, 4 trace
    #[arg(long, default_value_t = 0)]
    debug: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(DebugLevel::from_u8(args.debug));

    anyhow::ensure!(args.order >= 3, "--order must be at least 3");

    let mut plan = IndexPlan::new();
    for entry in &args.indexes {
        let (attribute, kinds) = parse_plan_entry(entry)?;
        plan.entry(attribute).or_default().extend(kinds);
    }

    let config = Config::default()
        .with_order(args.order)
        .with_delimiter(args.delimiter);

    let mut catalog = Catalog::new();
    let report = CsvLoader::new(config, plan).load_path(&args.file, &mut catalog)?;

    println!(
        "loaded {} rows ({} skipped) from {}",
        report.rows,
        report.skipped.len(),
        args.file.display()
    );

    let Some(max_row_id) = report.max_row_id() else {
        println!("nothing to query");
        return Ok(());
    };

    repl(&catalog, max_row_id)
}

fn repl(catalog: &Catalog, max_row_id: RowId) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("Type a query or .help; Ctrl+D to exit");

    loop {
        let line = match rl.readline("idx> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {e}");
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if let Err(e) = rl.add_history_entry(input) {
            eprintln!("{e}");
        }

        match input.split_once(char::is_whitespace).unwrap_or((input, "")) {
            (".quit" | ".exit", _) => break,
            (".help", _) => println!("{HELP}"),
            (".indexes", _) => print_indexes(catalog),
            (".keys", attribute) => print_keys(catalog, attribute.trim()),
            (cmd, _) if cmd.starts_with('.') => eprintln!("unknown command {cmd}, try .help"),
            _ => run_query(catalog, input, max_row_id),
        }
    }

    Ok(())
}

fn print_indexes(catalog: &Catalog) {
    for attribute in catalog.attributes() {
        let kinds: Vec<&str> = catalog
            .get_indexes(attribute)
            .iter()
            .map(|idx| idx.pretty_name())
            .collect();
        let data_type = catalog
            .data_type(attribute)
            .map(|dt| dt.to_string())
            .unwrap_or_default();
        println!("{attribute}:{data_type}  {}", kinds.join(", "));
    }
}

fn print_keys(catalog: &Catalog, attribute: &str) {
    let Some(index) = catalog.get_indexes(attribute).first() else {
        eprintln!("no index on '{attribute}'");
        return;
    };

    let keys: Vec<String> = index.keys().iter().map(ToString::to_string).collect();
    println!("{}", keys.join(" "));
}

fn run_query(catalog: &Catalog, input: &str, max_row_id: RowId) {
    let query = match parse_query(input, catalog) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    match evaluate_query(catalog, &query, max_row_id) {
        Ok(rows) => {
            let ids: Vec<String> = rows.iter().map(ToString::to_string).collect();
            println!("{} rows: {{{}}}", rows.len(), ids.join(", "));
        }
        Err(e) => eprintln!("{e}"),
    }
}
