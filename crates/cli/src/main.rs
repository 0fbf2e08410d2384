//! bizsearch CLI - business search gateway over Elasticsearch
//!
//! This binary provides the command-line interface for the bizsearch system.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use bizsearch_core::{compile, config::Config, Error, SearchApi};
use bizsearch_server::SearchGateway;
use bizsearch_storage::create_document_engine;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment files read before configuration, first one wins per variable
const ENV_FILES: [&str; 2] = ["config.env", ".env"];

#[derive(Parser)]
#[command(name = "bizsearch")]
#[command(about = "Business search gateway over Elasticsearch")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve,
    /// Run one search and print the results as JSON
    Search {
        /// Free-text query
        query: String,
        /// Restrict results to this city
        #[arg(long)]
        city: Option<String>,
    },
    /// Print the reviews of one business as JSON
    Reviews {
        /// Business identifier
        business_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    load_env_files();

    // Execute commands
    match cli.command {
        Some(Commands::Serve) => serve(cli.config.as_deref()).await,
        Some(Commands::Search { query, city }) => {
            search(cli.config.as_deref(), &query, city.as_deref()).await
        }
        Some(Commands::Reviews { business_id }) => {
            reviews(cli.config.as_deref(), &business_id).await
        }
        None => {
            // Default behavior - show help
            println!("Run 'bizsearch serve' to start the REST API, or --help for more options");
            Ok(())
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bizsearch={level},bizsearch_core={level},bizsearch_storage={level},bizsearch_server={level},tower_http={level}"
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Export variables from `config.env` and `.env` into the process environment
///
/// Variables already set in the environment are never overwritten.
fn load_env_files() {
    for file in ENV_FILES {
        match dotenv::from_filename(file) {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Failed to read {file}: {e}"),
        }
    }
}

/// Load and validate configuration
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    debug!("Configuration: {:?}", config);
    Ok(config)
}

fn gateway(config: &Config) -> Result<SearchGateway> {
    let engine =
        create_document_engine(&config.engine).context("Failed to create search engine client")?;
    Ok(SearchGateway::new(engine))
}

/// Start the REST API server
async fn serve(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    info!(
        "Starting REST API on {}:{} (engine provider '{}', index '{}')",
        config.server.host, config.server.port, config.engine.provider, config.engine.index
    );

    bizsearch_server::run_server(config)
        .await
        .context("Server failed")
}

async fn search(config_path: Option<&Path>, query: &str, city: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let request = compile(query, city);

    let results = gateway(&config)?
        .search(&request)
        .await
        .context("Search failed")?;

    info!("{} results for '{query}'", results.len());
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

async fn reviews(config_path: Option<&Path>, business_id: &str) -> Result<()> {
    let config = load_config(config_path)?;

    let reviews = match gateway(&config)?.get_reviews(business_id).await {
        Ok(reviews) => reviews,
        Err(Error::NotFound(_)) => anyhow::bail!("Business '{business_id}' not found"),
        Err(e) => return Err(anyhow::Error::new(e).context("Review lookup failed")),
    };

    println!("{}", serde_json::to_string_pretty(&reviews)?);
    Ok(())
}
