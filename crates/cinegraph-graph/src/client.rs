//! Neo4j connection client.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query, Row};
use serde::Serialize;

use crate::config::GraphConfig;

/// Pooled connection to a Neo4j database.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Build the connection pool and ping the server.
    ///
    /// `Graph::connect` only creates the pool; the `RETURN 1` ping forces a
    /// real bolt handshake so an unreachable server fails here.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .with_context(|| format!("Neo4j at {} is not responding to queries", config.uri))?;

        tracing::debug!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Run an auto-commit query and collect every row.
    pub async fn query(&self, query: Query) -> Result<Vec<Row>> {
        let mut result = self.graph.execute(query).await.context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to read Neo4j result")? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Node and relationship totals, for status display.
    pub async fn counts(&self) -> Result<GraphCounts> {
        let rows = self
            .query(Query::new(
                "CALL { MATCH (n) RETURN count(n) AS nodes } \
                 CALL { MATCH ()-[r]->() RETURN count(r) AS relationships } \
                 RETURN nodes, relationships"
                    .to_string(),
            ))
            .await?;

        let Some(row) = rows.into_iter().next() else {
            return Ok(GraphCounts::default());
        };
        let nodes: i64 = row
            .get("nodes")
            .map_err(|e| anyhow::anyhow!("Failed to get field 'nodes': {:?}", e))?;
        let relationships: i64 = row
            .get("relationships")
            .map_err(|e| anyhow::anyhow!("Failed to get field 'relationships': {:?}", e))?;

        Ok(GraphCounts {
            nodes: nodes.max(0) as usize,
            relationships: relationships.max(0) as usize,
        })
    }

    /// The underlying neo4rs pool.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}
