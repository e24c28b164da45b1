//! # Cinegraph Core
//!
//! Films, the people who make them and the awards they win, modeled as a
//! typed property graph.
//!
//! - [`graph`]: node/edge model, the [`GraphStore`] contracts and the
//!   in-process [`MemoryGraph`] backend
//! - [`schema`]: uniqueness constraints
//! - entity services: [`actor`], [`director`], [`movie`], [`genre`], [`award`]
//! - [`analytics`]: collaborations, similarity, recommendations, leaderboard
//!   and award winners

pub mod actor;
pub mod analytics;
pub mod award;
pub mod common;
pub mod director;
pub mod error;
pub mod genre;
pub mod graph;
pub mod movie;
pub mod schema;

pub use common::{Ack, Created};
pub use error::{CineError, CineResult};
pub use graph::{GraphStore, Label, MemoryGraph, Node, NodeRef, Relation};
pub use schema::{install_schema, Schema, SchemaReport, UniqueConstraint};
