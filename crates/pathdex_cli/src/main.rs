//! pathdex CLI
//!
//! Command-line tools for indexing JSON-lines files and querying them.
//!
//! # Commands
//!
//! - `query` - Run a boolean query against a documents file
//! - `stats` - Display indexed paths and value counts
//! - `export` - Write one CSV row per document
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// pathdex command-line tools.
#[derive(Parser)]
#[command(name = "pathdex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query against a JSON-lines documents file
    Query {
        /// Documents file, one JSON object per line
        #[arg(short, long)]
        input: PathBuf,

        /// Query file (JSON)
        #[arg(short, long)]
        query: PathBuf,

        /// Field holding each document's identity
        #[arg(short, long, default_value = "id")]
        key_field: String,

        /// Lower-case the first letter of every field name
        #[arg(long)]
        camel_case: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Display indexed paths and distinct value counts
    Stats {
        /// Documents file, one JSON object per line
        #[arg(short, long)]
        input: PathBuf,

        /// Field holding each document's identity
        #[arg(short, long, default_value = "id")]
        key_field: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Export every document's indexed fields as CSV
    Export {
        /// Documents file, one JSON object per line
        #[arg(short, long)]
        input: PathBuf,

        /// Destination CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Field holding each document's identity
        #[arg(short, long, default_value = "id")]
        key_field: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Query {
            input,
            query,
            key_field,
            camel_case,
            format,
        } => {
            commands::query::run(&input, &query, &key_field, camel_case, &format)?;
        }
        Commands::Stats {
            input,
            key_field,
            format,
        } => {
            commands::stats::run(&input, &key_field, &format)?;
        }
        Commands::Export {
            input,
            output,
            key_field,
        } => {
            commands::export::run(&input, &output, &key_field)?;
        }
        Commands::Version => {
            println!("pathdex CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("pathdex Core v{}", pathdex_core::VERSION);
        }
    }

    Ok(())
}
