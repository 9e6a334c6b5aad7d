//! tanker command-line tool library
//!
//! Reads JSON records, resolves their reference fields against one SQLite
//! table in a single lookup, and returns either the filled records or the
//! raw identifier to record mapping.

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

use tanker_common::config::{resolve_database_path, resolve_suffix, TomlConfig, DEFAULT_ID_COLUMN};
use tanker_common::db::{connect_readonly, SqliteFetcher};
use tanker_common::{Collector, Record, Resolved};

/// Command-line arguments for tanker
#[derive(Parser, Debug, Clone)]
#[command(name = "tanker")]
#[command(about = "Resolve reference fields in JSON records with one batched lookup")]
#[command(version)]
pub struct Args {
    /// TOML config file (default: <config dir>/tanker/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database holding the referenced records
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Table the identifiers point into
    #[arg(short, long)]
    pub table: Option<String>,

    /// Identifier column of the table (default: id)
    #[arg(long, value_name = "NAME")]
    pub id_column: Option<String>,

    /// Reference field to resolve; repeat or comma-separate for several
    #[arg(short, long = "field", value_name = "NAME", required = true, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Restrict fetched records to these columns
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    pub select: Vec<String>,

    /// Suffix for derived keys (default: _data)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Print the identifier to record mapping instead of the filled records
    #[arg(long)]
    pub get: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// JSON input: one object (item) or an array of objects (collection); `-` reads stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// Parsed input document
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Item(Record),
    Collection(Vec<Record>),
}

impl Input {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(record) => Ok(Input::Item(record)),
            Value::Array(items) => {
                let records = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| match item {
                        Value::Object(record) => Ok(record),
                        other => bail!("Input element {} is not an object: {}", i, other),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Input::Collection(records))
            }
            other => bail!("Input must be a JSON object or array of objects, got {}", other),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Input::Item(record) => Value::Object(record),
            Input::Collection(records) => Value::Array(records.into_iter().map(Value::Object).collect()),
        }
    }
}

/// Read and parse the input document (`-` means stdin)
pub fn read_input(path: &Path) -> Result<Input> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?
    };

    let value: Value = serde_json::from_str(&content).context("Input is not valid JSON")?;
    Input::from_value(value)
}

/// Default log level when neither the command line nor the config sets one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Pick the log level directive: `--log-level`, then the config file, then `warn`
pub fn log_level<'a>(cli: Option<&'a str>, config: Option<&'a str>) -> &'a str {
    cli.or(config).unwrap_or(DEFAULT_LOG_LEVEL)
}

/// Render a `get()` result as a JSON object, keys in identifier order
///
/// JSON object keys are strings, so `2` and `"2"` share the key `"2"`. Only one
/// entry is kept per key: the integer form, which sorts first. Both forms were
/// answered by the same row, so no record is lost.
pub fn resolved_to_value(resolved: Resolved) -> Value {
    let mut entries: Vec<_> = resolved.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut map = Map::with_capacity(entries.len());
    for (id, record) in entries {
        map.entry(id.to_string()).or_insert(Value::Object(record));
    }
    Value::Object(map)
}

/// Execute one invocation and return the JSON document to print
pub async fn run(args: &Args, config: &TomlConfig) -> Result<Value> {
    let db_path = resolve_database_path(args.database.as_deref(), config)?;
    let table = args
        .table
        .clone()
        .or_else(|| config.table.clone())
        .context("No table given (use --table or the config file)")?;
    let id_column = args
        .id_column
        .clone()
        .or_else(|| config.id_column.clone())
        .unwrap_or_else(|| DEFAULT_ID_COLUMN.to_string());
    let suffix = resolve_suffix(args.suffix.as_deref(), config);

    let mut input = read_input(&args.input)?;

    let pool = connect_readonly(&db_path)
        .await
        .context("Failed to open database")?;
    let fetcher = SqliteFetcher::new(pool, table, id_column)?;

    let mut collector = Collector::new(fetcher);
    collector.set_suffix(suffix)?;
    if !args.select.is_empty() {
        collector.select(args.select.iter().cloned());
    }

    let batch = match &mut input {
        Input::Item(record) => collector.item(record),
        Input::Collection(records) => collector.collection(records),
    };
    let batch = batch.fields(args.fields.iter().cloned())?;

    let output = if args.get {
        let resolved = batch.get().await?;
        info!("Resolved {} record(s)", resolved.len());
        resolved_to_value(resolved)
    } else {
        let report = batch.fill().await?;
        info!(
            "Filled {} field(s): {} of {} identifier(s) resolved",
            args.fields.len(),
            report.resolved,
            report.requested
        );
        input.into_value()
    };

    collector.fetcher().pool().close().await;
    Ok(output)
}
