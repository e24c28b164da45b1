//! Graph store contracts.
//!
//! A [`GraphStore`] hands out scoped execution contexts. Every public
//! operation opens exactly one context, and the context releases whatever it
//! holds (lock, connection, transaction) when it is dropped. Write contexts
//! are closed through [`finish`], which commits on success and rolls back on
//! failure.

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::model::{Direction, Label, Node, NodeRef, Properties, Relation};
use crate::error::CineResult;
use crate::schema::UniqueConstraint;

/// Storage collaborator: opens read/write contexts and manages constraints.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Open a read context over committed state.
    async fn read<'a>(&'a self) -> CineResult<Box<dyn ReadContext + 'a>>;

    /// Open an isolated write context.
    async fn write<'a>(&'a self) -> CineResult<Box<dyn WriteContext + 'a>>;

    /// Install a uniqueness rule if absent. Returns true when this call installed it.
    async fn ensure_unique_constraint(&self, constraint: &UniqueConstraint) -> CineResult<bool>;

    /// List the active uniqueness rules.
    async fn unique_constraints(&self) -> CineResult<Vec<UniqueConstraint>>;
}

/// Read operations, available in both context kinds.
#[async_trait]
pub trait ReadContext: Send {
    /// Fetch a node by label and id.
    async fn get_node(&mut self, label: Label, id: &str) -> CineResult<Node>;

    /// All nodes of a label, in store iteration order.
    async fn nodes(&mut self, label: Label) -> CineResult<Vec<Node>>;

    /// Find a node by id across every label.
    async fn locate(&mut self, id: &str) -> CineResult<Option<Node>>;

    /// Nodes adjacent to `node` through `relation` in `direction`.
    ///
    /// Parallel edges yield the neighbor once per edge. A node without
    /// neighbors, or one that does not exist, yields an empty list.
    async fn neighbors(
        &mut self,
        node: &NodeRef,
        relation: Relation,
        direction: Direction,
    ) -> CineResult<Vec<Node>>;
}

/// Mutating operations. Nothing is visible outside the context until commit.
#[async_trait]
pub trait WriteContext: ReadContext {
    /// Create a node. The property map must hold the label's required
    /// properties, including the `id`.
    async fn create_node(&mut self, label: Label, properties: Properties) -> CineResult<NodeRef>;

    /// Return the node of `label` whose `key` equals `value`, creating it
    /// from `properties` when absent.
    async fn merge_node(
        &mut self,
        label: Label,
        key: &str,
        value: &Value,
        properties: Properties,
    ) -> CineResult<NodeRef>;

    /// Delete a node together with every incident edge.
    async fn delete_node(&mut self, label: Label, id: &str) -> CineResult<()>;

    /// Create a directed edge between two existing nodes.
    async fn create_edge(&mut self, relation: Relation, from: &NodeRef, to: &NodeRef) -> CineResult<()>;

    async fn commit(&mut self) -> CineResult<()>;

    async fn rollback(&mut self) -> CineResult<()>;
}

/// Close a write context according to the outcome of the work done in it.
///
/// On success the context is committed and a commit failure is returned. On
/// failure the context is rolled back and the original error is returned; a
/// rollback failure is only logged.
pub async fn finish<T>(mut ctx: Box<dyn WriteContext + '_>, outcome: CineResult<T>) -> CineResult<T> {
    match outcome {
        Ok(value) => {
            ctx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = ctx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed after write error");
            }
            Err(err)
        }
    }
}
