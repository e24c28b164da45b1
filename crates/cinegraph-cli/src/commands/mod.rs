//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cinegraph_graph::{GraphClient, GraphConfig, Neo4jStore};

pub mod actor;
pub mod award;
pub mod director;
pub mod genre;
pub mod movie;
pub mod schema;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Cinegraph - films, people and awards as a graph
#[derive(Parser)]
#[command(name = "cinegraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML file with Neo4j connection settings
    #[arg(short, long, global = true, env = "CINEGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Uniqueness constraints and graph status
    #[command(subcommand)]
    Schema(schema::SchemaCommands),

    /// Actor commands
    #[command(subcommand)]
    Actor(actor::ActorCommands),

    /// Director commands
    #[command(subcommand)]
    Director(director::DirectorCommands),

    /// Movie commands
    #[command(subcommand)]
    Movie(movie::MovieCommands),

    /// Genre commands
    #[command(subcommand)]
    Genre(genre::GenreCommands),

    /// Award commands
    #[command(subcommand)]
    Award(award::AwardCommands),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let store = connect(self.config).await?;

        match self.command {
            Commands::Schema(cmd) => schema::execute(cmd, &store).await,
            Commands::Actor(cmd) => actor::execute(cmd, &store).await,
            Commands::Director(cmd) => director::execute(cmd, &store).await,
            Commands::Movie(cmd) => movie::execute(cmd, &store).await,
            Commands::Genre(cmd) => genre::execute(cmd, &store).await,
            Commands::Award(cmd) => award::execute(cmd, &store).await,
        }
    }
}

/// Resolve the configuration and open the Neo4j-backed store.
async fn connect(config_path: Option<PathBuf>) -> Result<Neo4jStore> {
    let config = GraphConfig::load(config_path.as_deref())?;
    tracing::debug!(uri = %config.uri, "Connecting to Neo4j");

    let client = tokio::time::timeout(CONNECT_TIMEOUT, GraphClient::connect(&config))
        .await
        .with_context(|| format!("Timed out connecting to Neo4j at {}", config.uri))??;
    Ok(Neo4jStore::new(client))
}
