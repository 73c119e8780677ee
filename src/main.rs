//! sqlfront CLI
//!
//! Reads a SQL file, parses every statement and prints the resulting trees
//! to standard output: the sugared algebra after parsing, or the core
//! algebra after desugaring against a schema. Diagnostics go to standard
//! error; the exit code is non-zero if any statement failed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rowan::ast::AstNode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use sqlfront::ast::Root;
use sqlfront::{
    desugar, lower_program, parse, statement_to_sql, LineIndex, Statement, StaticCatalog,
};

/// SQL front-end: parse SQL and lower queries to relational algebra.
#[derive(Parser)]
#[command(name = "sqlfront")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQL file to compile.
    file: PathBuf,

    /// Which representation to print per statement.
    #[arg(long, value_enum, default_value = "ra")]
    stage: Stage,

    /// JSON schema file mapping table names to ordered column lists,
    /// e.g. `{"t": ["w", "x", "y"]}`. CREATE TABLE statements in the input
    /// extend this schema as they are encountered.
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Additionally echo each statement as normalized SQL.
    #[arg(long)]
    echo_sql: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Stage {
    /// The sugared algebra produced by the parser.
    Sra,
    /// The core algebra produced by desugaring.
    Ra,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("sqlfront: failed to install log subscriber");
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(message) => {
            eprintln!("sqlfront: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(true)` when every statement parsed and lowered cleanly.
fn run(cli: &Cli) -> Result<bool, String> {
    let text = fs::read_to_string(&cli.file)
        .map_err(|err| format!("cannot read {}: {err}", cli.file.display()))?;

    let mut catalog = match &cli.schema {
        Some(path) => load_schema(path)?,
        None => StaticCatalog::new(),
    };

    let parsed = parse(&text);
    let index = LineIndex::new(&text);
    let mut ok = parsed.ok();

    for error in &parsed.errors {
        let (line, column) = index.line_col(error.range.start());
        eprintln!("{}:{line}:{column}: error: {error}", cli.file.display());
    }

    let root = Root::cast(parsed.syntax())
        .ok_or_else(|| "internal error: parse did not produce a root".to_string())?;

    for statement in lower_program(&root) {
        match statement {
            Err(error) => {
                eprintln!("{}: error: {error}", cli.file.display());
                ok = false;
            }
            Ok(statement) => {
                if cli.echo_sql {
                    println!("-- {}", statement_to_sql(&statement));
                }
                match (&statement, cli.stage) {
                    (Statement::Query(query), Stage::Ra) => match desugar(query, &catalog) {
                        Ok(algebra) => println!("{algebra}"),
                        Err(error) => {
                            eprintln!(
                                "{}: error: {error}\n  in: {query}",
                                cli.file.display()
                            );
                            ok = false;
                        }
                    },
                    _ => println!("{statement}"),
                }
                // DDL feeds the schema for the statements that follow it.
                if let Statement::CreateTable(stmt) = &statement {
                    catalog.add_create_table(stmt);
                }
            }
        }
    }

    Ok(ok)
}

fn load_schema(path: &Path) -> Result<StaticCatalog, String> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("cannot read schema {}: {err}", path.display()))?;
    serde_json::from_str(&text)
        .map_err(|err| format!("malformed schema {}: {err}", path.display()))
}
