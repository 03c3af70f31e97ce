//! Folio CLI - Command-line interface for assembling EPUB files

mod commands;
mod description;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an EPUB from a JSON book description
    Build {
        /// Book description (JSON)
        input: String,

        /// Output file path
        #[arg(short, long)]
        output: String,

        /// Timeout in seconds for each remote resource
        #[arg(short, long, default_value = "30")]
        timeout: u64,
    },

    /// List the entries of an EPUB archive
    Inspect {
        /// EPUB file path
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "folio_cli=debug,folio_core=debug"
    } else {
        "folio_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Build {
            input,
            output,
            timeout,
        } => commands::build(&input, &output, timeout),

        Commands::Inspect { input, json } => commands::inspect(&input, json),
    }
}
