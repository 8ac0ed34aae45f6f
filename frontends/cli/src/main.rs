//! `pgtree`: inspect and rewrite PostgreSQL queries from the command line.

mod config;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;

#[derive(Parser)]
#[command(
    name = "pgtree",
    about = "Analyze, normalize and rewrite PostgreSQL queries"
)]
struct Cli {
    /// YAML config file (overrides PGTREE_CONFIG and ~/.config/pgtree/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tables read by each statement, as JSON
    Tables(Input),
    /// Normalized text, kind and root node of each statement, as JSON
    Stmts(Input),
    /// Canonical form of the query
    Normalize(Input),
    /// Add a total row count column to every row
    RowCount(Rewrite),
    /// Replace the query with a count of its rows
    CountRows(Rewrite),
}

#[derive(Args)]
struct Input {
    /// SQL file to read; stdin when omitted
    file: Option<PathBuf>,
}

#[derive(Args)]
struct Rewrite {
    #[command(flatten)]
    input: Input,

    /// Name of the row count column
    #[arg(long)]
    column: Option<String>,

    /// Name of the CTE the query is moved into
    #[arg(long)]
    cte_name: Option<String>,
}

impl Input {
    fn read(&self) -> Result<String> {
        match &self.file {
            Some(path) => read_file(path),
            None => {
                let mut sql = String::new();
                std::io::stdin()
                    .read_to_string(&mut sql)
                    .context("Failed to read SQL from stdin")?;
                Ok(sql)
            }
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref())?;
    let pretty = config.pretty && !cli.compact;

    match cli.command {
        Command::Tables(input) => print_json(&pgtree::tables_queried(&input.read()?)?, pretty)?,
        Command::Stmts(input) => print_json(&pgtree::to_stmts(&input.read()?)?, pretty)?,
        Command::Normalize(input) => println!("{}", pgtree::normalize(&input.read()?)?),
        Command::RowCount(args) => {
            let sql = args.input.read()?;
            let column = args.column.as_deref().unwrap_or(&config.count_column);
            let cte = args.cte_name.as_deref().unwrap_or(&config.cte_name);
            println!("{}", pgtree::add_row_count_column(&sql, column, Some(cte))?);
        }
        Command::CountRows(args) => {
            let sql = args.input.read()?;
            let column = args.column.as_deref().unwrap_or(&config.count_column);
            let cte = args.cte_name.as_deref().unwrap_or(&config.cte_name);
            println!("{}", pgtree::query_count_rows(&sql, column, Some(cte))?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    // Default to WARN, can be overridden with RUST_LOG env var
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    run(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rewrite_flags_parse() {
        let cli = Cli::try_parse_from([
            "pgtree",
            "--compact",
            "row-count",
            "query.sql",
            "--column",
            "total",
            "--cte-name",
            "q",
        ])
        .unwrap();
        assert!(cli.compact);
        match cli.command {
            Command::RowCount(args) => {
                assert_eq!(args.input.file, Some(PathBuf::from("query.sql")));
                assert_eq!(args.column.as_deref(), Some("total"));
                assert_eq!(args.cte_name.as_deref(), Some("q"));
            }
            _ => panic!("expected row-count"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pgtree", "tables", "--config", "c.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
        assert!(matches!(cli.command, Command::Tables(Input { file: None })));
    }
}
