//! Response shapes and graph helpers shared by the entity services.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::CineResult;
use crate::graph::{finish, Direction, GraphStore, Label, Node, NodeRef, Properties, ReadContext, Relation};

/// Acknowledgement of a create, carrying the new id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub id: String,
    pub message: String,
}

impl Created {
    pub fn new(id: impl Into<String>, label: Label) -> Self {
        Self {
            id: id.into(),
            message: format!("{} created successfully", label),
        }
    }
}

/// Acknowledgement of an action with no payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fresh opaque node id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Award rendered as `"{name} {category} {year}"`.
pub fn award_line(award: &Node) -> String {
    format!(
        "{} {} {}",
        award.prop_text("name"),
        award.prop_text("category"),
        award.prop_text("year")
    )
}

/// Drop repeated nodes (parallel edges), keeping first occurrence order.
pub(crate) fn distinct_nodes(nodes: Vec<Node>) -> Vec<Node> {
    let mut seen = HashSet::new();
    nodes
        .into_iter()
        .filter(|node| seen.insert(node.node_ref()))
        .collect()
}

/// Display names of distinct nodes, sorted.
pub(crate) fn distinct_names(nodes: Vec<Node>) -> Vec<String> {
    let mut names: Vec<String> = distinct_nodes(nodes)
        .iter()
        .map(|node| node.display_name().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    names.sort();
    names
}

/// Formatted awards won by `node`, sorted.
pub(crate) async fn award_lines(ctx: &mut dyn ReadContext, node: &NodeRef) -> CineResult<Vec<String>> {
    let awards = distinct_nodes(ctx.neighbors(node, Relation::WonAward, Direction::Outgoing).await?);
    let mut lines: Vec<String> = awards.iter().map(award_line).collect();
    lines.sort();
    Ok(lines)
}

/// Create a node in its own write context.
pub(crate) async fn create_entity(store: &dyn GraphStore, label: Label, properties: Properties) -> CineResult<NodeRef> {
    let mut tx = store.write().await?;
    let outcome = tx.create_node(label, properties).await;
    finish(tx, outcome).await
}

/// Cascade-delete a node in its own write context.
pub(crate) async fn delete_entity(store: &dyn GraphStore, label: Label, id: &str) -> CineResult<Ack> {
    let mut tx = store.write().await?;
    let outcome = tx.delete_node(label, id).await;
    finish(tx, outcome).await?;
    Ok(Ack::new(format!("{} deleted successfully", label)))
}

/// Create one edge in its own write context, as a step of a multi-step create.
///
/// The node created by the earlier step is not removed when this fails; the
/// failure is logged against `owner` and returned.
pub(crate) async fn link(
    store: &dyn GraphStore,
    owner: &NodeRef,
    relation: Relation,
    from: &NodeRef,
    to: &NodeRef,
) -> CineResult<()> {
    let mut tx = store.write().await?;
    let outcome = tx.create_edge(relation, from, to).await;
    finish(tx, outcome).await.inspect_err(|err| {
        warn!(
            owner = %owner,
            relation = %relation,
            from = %from,
            to = %to,
            error = %err,
            "Edge step failed; node kept without this edge"
        );
    })
}

/// Link `owner` to each award in `award_ids` with `WON_AWARD`.
pub(crate) async fn link_awards(store: &dyn GraphStore, owner: &NodeRef, award_ids: &[String]) -> CineResult<()> {
    for award_id in award_ids {
        let award = NodeRef::new(Label::Award, award_id.as_str());
        link(store, owner, Relation::WonAward, owner, &award).await?;
    }
    Ok(())
}
