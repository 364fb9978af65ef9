//! dxcatalog CLI - query the diagnostic test catalog from the command line

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use dxcatalog::config::{default_config_path, resolve_config};
use dxcatalog::{Dal, DalCache};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dxcatalog")]
#[command(version)]
#[command(about = "Data access layer for a diagnostic test catalog")]
#[command(long_about = r#"
dxcatalog loads the catalog input files into indexed, read-only collections
and answers queries over them:
  • Prisma-style filters, sorting, projection and pagination
  • Vendor lookups with verifications and assistance programs
  • Insurance coverage resolution per test and payer

Example usage:
  dxcatalog init
  dxcatalog find tests --where '{"category":"MRD"}' --order-by name:asc --take 5
  dxcatalog coverage mrd-1 Aetna
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputMode::Human)]
    format: OutputMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file and create the data directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show catalog statistics
    Stats,

    /// Query a collection
    Find {
        /// Collection name (tests, vendors, insurance, changelog, glossary)
        collection: String,

        /// Where-clause as JSON, e.g. '{"vendor":{"contains":"natera"}}'
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,

        /// Sort keys, e.g. "name:asc,sensitivity:desc"
        #[arg(short, long)]
        order_by: Option<String>,

        #[arg(long)]
        skip: Option<usize>,

        #[arg(long)]
        take: Option<usize>,

        /// Comma-separated fields to keep
        #[arg(short, long, value_delimiter = ',')]
        select: Vec<String>,
    },

    /// Fetch one record by id
    Get { collection: String, id: String },

    /// Fetch a test by slug
    Slug {
        slug: String,

        /// Category code to disambiguate (MRD, ECD, TRM, CGP, HCT)
        #[arg(long)]
        category: Option<String>,
    },

    /// Full-text search over tests
    Search {
        query: String,

        #[arg(long)]
        take: Option<usize>,
    },

    /// Unique values of a field
    Distinct { collection: String, field: String },

    /// Record counts grouped by a field
    CountBy { collection: String, field: String },

    /// List vendors
    Vendors {
        /// Only vendors with verified tests
        #[arg(long)]
        verified: bool,

        /// Only vendors with a patient assistance program
        #[arg(long)]
        assistance: bool,
    },

    /// Coverage of a test by a payer
    Coverage { test_id: String, payer: String },

    /// Show the changelog
    Changelog {
        /// Only the N most recent entries
        #[arg(long)]
        recent: Option<usize>,
    },

    /// List glossary terms, or search them
    Glossary { query: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Print the `{success, meta, data}` envelope used for JSON output.
pub fn emit_success(mode: OutputMode, command: &str, data: impl Serialize) -> anyhow::Result<()> {
    let envelope = serde_json::json!({
        "success": true,
        "meta": {
            "command": command,
            "version": env!("CARGO_PKG_VERSION"),
            "format": match mode {
                OutputMode::Human => "human",
                OutputMode::Json => "json",
            },
        },
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn emit_error(mode: OutputMode, err: &anyhow::Error) {
    if mode.is_human() {
        dxcatalog::ui::error(&format!("{:#}", err));
    } else {
        let envelope = serde_json::json!({
            "success": false,
            "error": format!("{:#}", err),
        });
        println!("{}", envelope);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = cli.format;
    if let Err(err) = run(cli).await {
        emit_error(mode, &err);
        std::process::exit(1);
    }
}

async fn load_dal(cache: &DalCache, config_path: &Path) -> anyhow::Result<Arc<Dal>> {
    let config = resolve_config(Some(config_path))?;
    Ok(cache.get_or_init(|| async { Dal::from_config(&config) }).await?)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mode = cli.format;
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let cache = DalCache::new();

    match cli.command {
        Commands::Init { force } => commands::run_init(mode, &config_path, force),
        Commands::Stats => {
            let dal = load_dal(&cache, &config_path).await?;
            commands::run_stats(mode, &dal).await
        }
        Commands::Find {
            collection,
            filter,
            order_by,
            skip,
            take,
            select,
        } => {
            let dal = load_dal(&cache, &config_path).await?;
            let query = commands::FindQuery {
                filter,
                order_by,
                skip,
                take,
                select,
            };
            commands::run_find(mode, &dal, &collection, &query).await
        }
        Commands::Get { collection, id } => {
            let dal = load_dal(&cache, &config_path).await?;
            commands::run_get(mode, &dal, &collection, &id)
        }
        Commands::Slug { slug, category } => {
            let dal = load_dal(&cache, &config_path).await?;
            commands::run_slug(mode, &dal, &slug, category.as_deref()).await
        }
        Commands::Search { query, take } => {
            let dal = load_dal(&cache, &config_path).await?;
            commands::run_search(mode, &dal, &query, take).await
        }
        Commands::Distinct { collection, field } => {
            let dal = load_dal(&cache, &config_path).await?;
            commands::run_distinct(mode, &dal, &collection, &field).await
        }
        Commands::CountBy { collection, field } => {
            let dal = load_dal(&cache, &config_path).await?;
            commands::run_count_by(mode, &dal, &collection, &field).await
        }
        Commands::Vendors {
            verified,
            assistance,
        } => {
            let dal = load_dal(&cache, &config_path).await?;
            commands::run_vendors(mode, &dal, verified, assistance).await
        }
        Commands::Coverage { test_id, payer } => {
            let dal = load_dal(&cache, &config_path).await?;
            commands::run_coverage(mode, &dal, &test_id, &payer).await
        }
        Commands::Changelog { recent } => {
            let dal = load_dal(&cache, &config_path).await?;
            commands::run_changelog(mode, &dal, recent).await
        }
        Commands::Glossary { query } => {
            let dal = load_dal(&cache, &config_path).await?;
            commands::run_glossary(mode, &dal, query.as_deref()).await
        }
    }
}
