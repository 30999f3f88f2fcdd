//! chsql CLI
//!
//! Renders ClickHouse statements to stdout. Nothing is sent to a server; pipe
//! the output into `clickhouse-client` or any other transport.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use chsql_core::{Destination, FilterParams, Pagination, Row, SqlBuilder, Statement, Value};

/// Build ClickHouse statements from filters, fields and rows.
#[derive(Parser)]
#[command(name = "chsql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database the table belongs to.
    #[arg(short, long, env = "CHSQL_DATABASE", default_value = "default")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a SELECT statement.
    Select {
        /// Table to read from.
        #[arg(short, long)]
        table: String,

        #[command(flatten)]
        filters: FilterArgs,

        /// Column to project (repeatable, all columns if omitted).
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// Row limit (implies pagination).
        #[arg(long)]
        limit: Option<u64>,

        /// Row offset (implies pagination).
        #[arg(long)]
        offset: Option<u64>,

        /// Emit LIMIT/OFFSET with default values.
        #[arg(long)]
        paginate: bool,

        /// Ordering field, `-field` for descending (repeatable).
        #[arg(short, long = "order-by")]
        ordering: Vec<String>,
    },

    /// Render an INSERT statement.
    Insert {
        /// Table to write to.
        #[arg(short, long)]
        table: String,

        /// Target column (repeatable, natural column order if omitted).
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// Row as a JSON array, nested arrays become tuples (repeatable).
        #[arg(short, long = "row", required = true)]
        rows: Vec<String>,
    },

    /// Render a query counting the rows of a table or of another query.
    Count {
        /// Table to count.
        #[arg(short, long)]
        table: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Complete query to count instead of a table.
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Filter as `field[__op]=value`; value is JSON when it parses, text otherwise (repeatable).
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
}

impl FilterArgs {
    fn to_params(&self) -> anyhow::Result<FilterParams> {
        let mut params = FilterParams::new();
        for (key, raw) in &self.filters {
            let value = parse_value(raw).with_context(|| format!("filter '{key}'"))?;
            params.insert(key.as_str(), value);
        }
        Ok(params)
    }
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (String::from(key), String::from(value)))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

fn parse_value(raw: &str) -> anyhow::Result<Value> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Ok(Value::try_from(json)?),
        Err(_) => Ok(Value::Text(String::from(raw))),
    }
}

fn parse_row(raw: &str) -> anyhow::Result<Row> {
    let json: serde_json::Value =
        serde_json::from_str(raw).with_context(|| format!("row is not valid JSON: {raw}"))?;
    match Value::try_from(json)? {
        Value::Tuple(items) => Ok(items),
        _ => bail!("row must be a JSON array: {raw}"),
    }
}

fn render(builder: &SqlBuilder, database: &str, command: Commands) -> anyhow::Result<String> {
    let sql = match command {
        Commands::Select {
            table,
            filters,
            fields,
            limit,
            offset,
            paginate,
            ordering,
        } => {
            let mut statement = Statement::select((database, table.as_str()))
                .filters(filters.to_params()?)
                .fields(&fields[..])
                .order_by(&ordering[..]);
            if paginate || limit.is_some() || offset.is_some() {
                statement = statement.paginate(Pagination { limit, offset });
            }
            builder.build(&statement)?
        }
        Commands::Insert {
            table,
            fields,
            rows,
        } => {
            let rows = rows
                .iter()
                .map(|raw| parse_row(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            builder.build(&Statement::insert((database, table.as_str()), rows).fields(&fields[..]))?
        }
        Commands::Count {
            table,
            filters,
            query,
        } => {
            let destination = table.map(|t| Destination::new(database, t));
            let params = filters.to_params()?;
            builder.count(destination.as_ref(), Some(&params), query.as_deref())?
        }
    };
    Ok(sql)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let builder = SqlBuilder::default();
    debug!(database = %cli.database, operators = ?builder.operators(), "rendering statement");

    let sql = render(&builder, &cli.database, cli.command)?;
    println!("{sql}");
    Ok(())
}
