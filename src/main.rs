//! `cep-lookup` binary.
//!
//! # Usage
//!
//! ```bash
//! # Start the HTTP service (default command)
//! cargo run
//! cargo run -- serve
//!
//! # Resolve a single postal code and print the JSON record
//! cargo run -- lookup 14784478
//! ```
//!
//! Configuration comes from the environment (and an optional `.env` file);
//! see [`cep_lookup::config`].

use anyhow::{Context, Result};
use cep_lookup::application::services::{CepService, LookupError};
use cep_lookup::config::{self, Config};
use cep_lookup::domain::cep::is_valid_cep;
use cep_lookup::infrastructure::cache::InMemoryCache;
use cep_lookup::infrastructure::upstream::ViaCepClient;
use cep_lookup::server;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Caching proxy for Brazilian postal code lookups.
#[derive(Parser)]
#[command(name = "cep-lookup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Look up a single postal code and print it as JSON
    Lookup {
        /// Postal code, 8 digits without separators
        cep: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    init_tracing(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            config.print_summary();
            server::run(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Lookup { cep } => lookup_once(&config, &cep).await,
    }
}

/// Installs the global tracing subscriber in the configured format.
fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid RUST_LOG filter '{}'", config.log_level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

/// Resolves one postal code through the same service the server uses.
async fn lookup_once(config: &Config, cep: &str) -> Result<ExitCode> {
    if !is_valid_cep(cep) {
        eprintln!("{}", "O CEP deve conter 8 dígitos numéricos.".red().bold());
        return Ok(ExitCode::from(2));
    }

    let provider = ViaCepClient::new(config.viacep_base_url.clone(), config.upstream_timeout())
        .context("Failed to create ViaCEP client")?;
    let service = CepService::new(
        Arc::new(InMemoryCache::new(1)),
        Arc::new(provider),
        config.cache_ttl(),
    );

    match service.lookup(cep).await {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ LookupError::NotFound) => {
            eprintln!("{}", e.to_string().yellow().bold());
            Ok(ExitCode::from(1))
        }
        Err(e) => {
            eprintln!("{}", e.to_string().red().bold());
            Ok(ExitCode::from(3))
        }
    }
}
