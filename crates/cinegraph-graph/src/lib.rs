//! # Cinegraph Graph
//!
//! Neo4j backend for the film graph: connection configuration, a pooled
//! client and a [`cinegraph_core::GraphStore`] implementation issuing
//! parameterized Cypher.

pub mod client;
pub mod config;
pub mod cypher;
pub mod store;

pub use client::{GraphClient, GraphCounts};
pub use config::GraphConfig;
pub use store::Neo4jStore;
