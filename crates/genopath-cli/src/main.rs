//! GenoPhenoPath CLI - Command-line interface for GenoPhenoPath
//!
//! This is the main entry point for users exploring the gene → phenotype →
//! diagnostic knowledge graph. It builds the graph from the source tables
//! and prints, searches or exports the result.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use genopath_core::EdgeLimit;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "genopath")]
#[command(author = "GenoPhenoPath Contributors")]
#[command(version)]
#[command(about = "Genes, phenotypes and diagnostics as a 3D knowledge graph", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    sources: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Where the build reads its configuration and tables from.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Config file (defaults to ./genopath.json if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Variant table with pathogenicity scores
    #[arg(long, global = true)]
    pub variants: Option<PathBuf>,

    /// Gene to phenotype annotation table
    #[arg(long, global = true)]
    pub gene_phenotypes: Option<PathBuf>,

    /// Phenotype to diagnostic annotation table
    #[arg(long, global = true)]
    pub diagnostics: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Build the knowledge graph and show node and edge counts
    Build,

    /// Show degree statistics
    Stats {
        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Export nodes, positions, edges and statistics to JSON
    Export {
        /// Output file
        #[arg(short, long, default_value = "genopath-graph.json")]
        output: PathBuf,

        /// Maximum edges to export: a number or "unlimited"
        #[arg(short, long)]
        edge_limit: Option<EdgeLimit>,
    },

    /// Find genes, phenotypes and diagnostics by name
    Search {
        /// Case-insensitive substring to look for
        term: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Build => commands::build(&cli.sources).await,
        Commands::Stats { json } => commands::stats(&cli.sources, json).await,
        Commands::Export { output, edge_limit } => {
            commands::export(&cli.sources, &output, edge_limit).await
        }
        Commands::Search { term } => commands::search(&cli.sources, &term).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
