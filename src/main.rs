use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser as ClapParser, Subcommand};
use nbt_query::NodeRegistry;
use nbt_query::cli::{self, CliError, RunOptions};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "nbtq")]
#[command(about = "nbtq - Project and validate NBT trees with JSON query documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a query document to an SNBT tree
    Run {
        /// Path to the JSON query document
        query: PathBuf,

        /// SNBT input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Load a query document and list the entries that survived loading
    Check {
        /// Path to the JSON query document
        query: PathBuf,
    },

    /// List the registered node types
    Kinds,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = NodeRegistry::builtin();

    let result = match cli.command {
        Commands::Run {
            query,
            input,
            pretty,
        } => run(query, input, pretty, registry),
        Commands::Check { query } => check(query, registry),
        Commands::Kinds => {
            print!("{}", cli::list_kinds(registry));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(
    query: PathBuf,
    input: Option<String>,
    pretty: bool,
    registry: &NodeRegistry,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = RunOptions {
        query,
        input,
        pretty,
    };
    println!("{}", cli::execute_run(&options, registry)?);
    Ok(())
}

fn check(query: PathBuf, registry: &NodeRegistry) -> Result<(), CliError> {
    let summaries = cli::describe_document(&query, registry)?;
    if summaries.is_empty() {
        println!("No usable entries");
    }
    for summary in summaries {
        println!("{}\t{}\t{}", summary.key, summary.id, summary.kind);
    }
    Ok(())
}
