//! Schema commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;

use cinegraph_core::{install_schema, GraphStore, Schema, UniqueConstraint};
use cinegraph_graph::{GraphCounts, Neo4jStore};

use crate::output;

#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Install the uniqueness constraints (safe to repeat)
    Install,

    /// Show active constraints and graph size
    Status,
}

#[derive(Serialize)]
struct SchemaStatus {
    constraints: Vec<UniqueConstraint>,
    counts: GraphCounts,
}

pub async fn execute(cmd: SchemaCommands, store: &Neo4jStore) -> Result<()> {
    match cmd {
        SchemaCommands::Install => cmd_install(store).await,
        SchemaCommands::Status => cmd_status(store).await,
    }
}

async fn cmd_install(store: &Neo4jStore) -> Result<()> {
    let report = install_schema(store, &Schema::cinema()).await?;
    output::success(&format!(
        "Schema ready: {} installed, {} already present",
        report.installed.to_string().green(),
        report.existing.to_string().dimmed()
    ));
    Ok(())
}

async fn cmd_status(store: &Neo4jStore) -> Result<()> {
    let status = SchemaStatus {
        constraints: store.unique_constraints().await?,
        counts: store.client().counts().await?,
    };
    output::print_json(&status)
}
