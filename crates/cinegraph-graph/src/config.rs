//! Connection settings for the Neo4j backend.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! the `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD` and `NEO4J_DATABASE`
//! environment variables.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            database: "neo4j".to_string(),
            max_connections: 4,
            fetch_size: 200,
        }
    }
}

impl GraphConfig {
    /// Resolve the configuration from defaults, `path` (when given) and the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Read a TOML file. Keys missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply `NEO4J_*` overrides resolved through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(uri) = lookup("NEO4J_URI") {
            self.uri = uri;
        }
        if let Some(user) = lookup("NEO4J_USER") {
            self.user = user;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            self.password = password;
        }
        if let Some(database) = lookup("NEO4J_DATABASE") {
            self.database = database;
        }
        self
    }
}
