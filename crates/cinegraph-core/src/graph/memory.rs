//! In-process graph store.
//!
//! Nodes live in an insertion-ordered map keyed by `(label, id)`; edges in an
//! arena with outgoing/incoming adjacency lists per node. Writers work on a
//! staged copy that replaces the live graph on commit, so a write context is
//! all-or-nothing.
//!
//! Opening a write context clones the whole graph, so each write costs
//! O(graph size). Bulk loads through many small writes are quadratic; this
//! backend is sized for tests and small datasets.

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::model::{Direction, Label, Node, NodeRef, Properties, Relation};
use super::store::{GraphStore, ReadContext, WriteContext};
use crate::error::{CineError, CineResult};
use crate::schema::{ConstraintSet, UniqueConstraint};

type EdgeId = u64;

#[derive(Debug, Clone)]
struct Edge {
    relation: Relation,
    from: NodeRef,
    to: NodeRef,
}

#[derive(Debug, Clone, Default)]
struct GraphData {
    nodes: IndexMap<NodeRef, Properties>,
    edges: IndexMap<EdgeId, Edge>,
    outgoing: HashMap<NodeRef, Vec<EdgeId>>,
    incoming: HashMap<NodeRef, Vec<EdgeId>>,
    next_edge_id: EdgeId,
    constraints: ConstraintSet,
}

impl GraphData {
    fn node(&self, node_ref: &NodeRef) -> Option<Node> {
        self.nodes.get(node_ref).map(|properties| Node {
            label: node_ref.label,
            id: node_ref.id.clone(),
            properties: properties.clone(),
        })
    }

    fn get_node(&self, label: Label, id: &str) -> CineResult<Node> {
        self.node(&NodeRef::new(label, id))
            .ok_or_else(|| CineError::not_found(label, id))
    }

    fn nodes(&self, label: Label) -> Vec<Node> {
        self.nodes
            .keys()
            .filter(|node_ref| node_ref.label == label)
            .filter_map(|node_ref| self.node(node_ref))
            .collect()
    }

    fn locate(&self, id: &str) -> Option<Node> {
        Label::ALL
            .into_iter()
            .find_map(|label| self.node(&NodeRef::new(label, id)))
    }

    fn neighbors(&self, node: &NodeRef, relation: Relation, direction: Direction) -> Vec<Node> {
        let index = match direction {
            Direction::Outgoing => &self.outgoing,
            Direction::Incoming => &self.incoming,
        };
        index
            .get(node)
            .into_iter()
            .flatten()
            .filter_map(|edge_id| self.edges.get(edge_id))
            .filter(|edge| edge.relation == relation)
            .filter_map(|edge| match direction {
                Direction::Outgoing => self.node(&edge.to),
                Direction::Incoming => self.node(&edge.from),
            })
            .collect()
    }

    fn create_node(&mut self, label: Label, properties: Properties) -> CineResult<NodeRef> {
        label.validate(&properties)?;
        let id = properties
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let node_ref = NodeRef::new(label, id);

        if self.nodes.contains_key(&node_ref) {
            return Err(CineError::constraint(
                label,
                format!("{}.id = \"{}\" already exists", label, node_ref.id),
            ));
        }

        let existing: Vec<&Properties> = self
            .nodes
            .iter()
            .filter(|(other, _)| other.label == label)
            .map(|(_, props)| props)
            .collect();
        self.constraints.check(label, &properties, &existing)?;

        self.nodes.insert(node_ref.clone(), properties);
        Ok(node_ref)
    }

    fn merge_node(
        &mut self,
        label: Label,
        key: &str,
        value: &Value,
        mut properties: Properties,
    ) -> CineResult<NodeRef> {
        let found = self
            .nodes
            .iter()
            .find(|(node_ref, props)| node_ref.label == label && props.get(key) == Some(value))
            .map(|(node_ref, _)| node_ref.clone());
        if let Some(node_ref) = found {
            return Ok(node_ref);
        }

        properties.insert(key.to_string(), value.clone());
        self.create_node(label, properties)
    }

    fn delete_node(&mut self, label: Label, id: &str) -> CineResult<()> {
        let node_ref = NodeRef::new(label, id);
        if self.nodes.shift_remove(&node_ref).is_none() {
            return Err(CineError::not_found(label, id));
        }

        let mut incident = self.outgoing.remove(&node_ref).unwrap_or_default();
        incident.extend(self.incoming.remove(&node_ref).unwrap_or_default());

        for edge_id in incident {
            if let Some(edge) = self.edges.shift_remove(&edge_id) {
                if let Some(ids) = self.outgoing.get_mut(&edge.from) {
                    ids.retain(|other| *other != edge_id);
                }
                if let Some(ids) = self.incoming.get_mut(&edge.to) {
                    ids.retain(|other| *other != edge_id);
                }
            }
        }
        Ok(())
    }

    fn create_edge(&mut self, relation: Relation, from: &NodeRef, to: &NodeRef) -> CineResult<()> {
        relation.check_endpoints(from.label, to.label)?;
        for endpoint in [from, to] {
            if !self.nodes.contains_key(endpoint) {
                return Err(CineError::not_found(endpoint.label, endpoint.id.clone()));
            }
        }

        let edge_id = self.next_edge_id;
        self.next_edge_id += 1;
        self.edges.insert(
            edge_id,
            Edge {
                relation,
                from: from.clone(),
                to: to.clone(),
            },
        );
        self.outgoing.entry(from.clone()).or_default().push(edge_id);
        self.incoming.entry(to.clone()).or_default().push(edge_id);
        Ok(())
    }

    /// Existing data must already satisfy a rule before it can be installed.
    fn install(&mut self, constraint: &UniqueConstraint) -> CineResult<bool> {
        if self.constraints.iter().any(|active| active == constraint) {
            return Ok(false);
        }

        let mut seen: Vec<&Value> = Vec::new();
        for (node_ref, props) in &self.nodes {
            if node_ref.label != constraint.label {
                continue;
            }
            match props.get(&constraint.property) {
                None | Some(Value::Null) => {}
                Some(value) if seen.contains(&value) => {
                    return Err(CineError::constraint(
                        constraint.label,
                        format!(
                            "cannot install {}: duplicate value {}",
                            constraint.name(),
                            value
                        ),
                    ));
                }
                Some(value) => seen.push(value),
            }
        }

        Ok(self.constraints.insert(constraint.clone()))
    }
}

/// Graph store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    data: RwLock<GraphData>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed nodes.
    pub async fn node_count(&self) -> usize {
        self.data.read().await.nodes.len()
    }

    /// Number of committed edges.
    pub async fn edge_count(&self) -> usize {
        self.data.read().await.edges.len()
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn read<'a>(&'a self) -> CineResult<Box<dyn ReadContext + 'a>> {
        let data = self.data.read().await;
        Ok(Box::new(MemoryRead { data }))
    }

    async fn write<'a>(&'a self) -> CineResult<Box<dyn WriteContext + 'a>> {
        let live = self.data.write().await;
        let staged = live.clone();
        Ok(Box::new(MemoryWrite {
            live: Some(live),
            staged,
        }))
    }

    async fn ensure_unique_constraint(&self, constraint: &UniqueConstraint) -> CineResult<bool> {
        self.data.write().await.install(constraint)
    }

    async fn unique_constraints(&self) -> CineResult<Vec<UniqueConstraint>> {
        Ok(self.data.read().await.constraints.iter().cloned().collect())
    }
}

struct MemoryRead<'a> {
    data: RwLockReadGuard<'a, GraphData>,
}

#[async_trait]
impl ReadContext for MemoryRead<'_> {
    async fn get_node(&mut self, label: Label, id: &str) -> CineResult<Node> {
        self.data.get_node(label, id)
    }

    async fn nodes(&mut self, label: Label) -> CineResult<Vec<Node>> {
        Ok(self.data.nodes(label))
    }

    async fn locate(&mut self, id: &str) -> CineResult<Option<Node>> {
        Ok(self.data.locate(id))
    }

    async fn neighbors(
        &mut self,
        node: &NodeRef,
        relation: Relation,
        direction: Direction,
    ) -> CineResult<Vec<Node>> {
        Ok(self.data.neighbors(node, relation, direction))
    }
}

/// Holds the write lock until commit or rollback, then releases it.
struct MemoryWrite<'a> {
    live: Option<RwLockWriteGuard<'a, GraphData>>,
    staged: GraphData,
}

impl MemoryWrite<'_> {
    fn staged(&mut self) -> CineResult<&mut GraphData> {
        if self.live.is_none() {
            return Err(CineError::unavailable("write context already closed"));
        }
        Ok(&mut self.staged)
    }
}

#[async_trait]
impl ReadContext for MemoryWrite<'_> {
    async fn get_node(&mut self, label: Label, id: &str) -> CineResult<Node> {
        self.staged()?.get_node(label, id)
    }

    async fn nodes(&mut self, label: Label) -> CineResult<Vec<Node>> {
        Ok(self.staged()?.nodes(label))
    }

    async fn locate(&mut self, id: &str) -> CineResult<Option<Node>> {
        Ok(self.staged()?.locate(id))
    }

    async fn neighbors(
        &mut self,
        node: &NodeRef,
        relation: Relation,
        direction: Direction,
    ) -> CineResult<Vec<Node>> {
        Ok(self.staged()?.neighbors(node, relation, direction))
    }
}

#[async_trait]
impl WriteContext for MemoryWrite<'_> {
    async fn create_node(&mut self, label: Label, properties: Properties) -> CineResult<NodeRef> {
        self.staged()?.create_node(label, properties)
    }

    async fn merge_node(
        &mut self,
        label: Label,
        key: &str,
        value: &Value,
        properties: Properties,
    ) -> CineResult<NodeRef> {
        self.staged()?.merge_node(label, key, value, properties)
    }

    async fn delete_node(&mut self, label: Label, id: &str) -> CineResult<()> {
        self.staged()?.delete_node(label, id)
    }

    async fn create_edge(&mut self, relation: Relation, from: &NodeRef, to: &NodeRef) -> CineResult<()> {
        self.staged()?.create_edge(relation, from, to)
    }

    async fn commit(&mut self) -> CineResult<()> {
        let mut live = self
            .live
            .take()
            .ok_or_else(|| CineError::unavailable("write context already closed"))?;
        *live = std::mem::take(&mut self.staged);
        debug!("Committed in-memory write context");
        Ok(())
    }

    async fn rollback(&mut self) -> CineResult<()> {
        self.live.take();
        self.staged = GraphData::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::finish;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        value.as_object().cloned().unwrap()
    }

    fn actor(id: &str, name: &str) -> Properties {
        props(json!({"id": id, "name": name, "birthdate": "1970-01-01"}))
    }

    fn movie(id: &str, title: &str) -> Properties {
        props(json!({
            "id": id, "title": title, "released": 1999, "rating": 8.7,
            "budget": 63.0, "boxOffice": 467.0, "description": ""
        }))
    }

    async fn seed(store: &MemoryGraph) {
        let mut tx = store.write().await.unwrap();
        tx.create_node(Label::Actor, actor("a1", "Keanu")).await.unwrap();
        tx.create_node(Label::Actor, actor("a2", "Carrie-Anne")).await.unwrap();
        tx.create_node(Label::Movie, movie("m1", "The Matrix")).await.unwrap();
        let m1 = NodeRef::new(Label::Movie, "m1");
        tx.create_edge(Relation::ActedIn, &NodeRef::new(Label::Actor, "a1"), &m1).await.unwrap();
        tx.create_edge(Relation::ActedIn, &NodeRef::new(Label::Actor, "a2"), &m1).await.unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_create_and_get_node() {
        let store = MemoryGraph::new();
        seed(&store).await;

        let mut rx = store.read().await.unwrap();
        let node = rx.get_node(Label::Actor, "a1").await.unwrap();
        assert_eq!(node.display_name(), "Keanu");
        assert!(rx.get_node(Label::Movie, "a1").await.unwrap_err().is_not_found());
        assert_eq!(rx.nodes(Label::Actor).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryGraph::new();
        seed(&store).await;

        let mut tx = store.write().await.unwrap();
        let err = tx.create_node(Label::Actor, actor("a1", "Other")).await.unwrap_err();
        assert!(matches!(err, CineError::ConstraintViolation { .. }));
    }

    #[tokio::test]
    async fn test_neighbors_both_directions() {
        let store = MemoryGraph::new();
        seed(&store).await;

        let mut rx = store.read().await.unwrap();
        let m1 = NodeRef::new(Label::Movie, "m1");
        let cast = rx.neighbors(&m1, Relation::ActedIn, Direction::Incoming).await.unwrap();
        assert_eq!(cast.len(), 2);

        let a1 = NodeRef::new(Label::Actor, "a1");
        let films = rx.neighbors(&a1, Relation::ActedIn, Direction::Outgoing).await.unwrap();
        assert_eq!(films[0].id, "m1");

        let none = rx.neighbors(&a1, Relation::WonAward, Direction::Outgoing).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_cascade_delete() {
        let store = MemoryGraph::new();
        seed(&store).await;
        assert_eq!(store.edge_count().await, 2);

        let mut tx = store.write().await.unwrap();
        tx.delete_node(Label::Movie, "m1").await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.edge_count().await, 0);
        let mut rx = store.read().await.unwrap();
        let a1 = NodeRef::new(Label::Actor, "a1");
        let films = rx.neighbors(&a1, Relation::ActedIn, Direction::Outgoing).await.unwrap();
        assert!(films.is_empty());
        drop(rx);

        let mut tx = store.write().await.unwrap();
        let err = tx.delete_node(Label::Movie, "m1").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_edge_to_missing_endpoint() {
        let store = MemoryGraph::new();
        seed(&store).await;

        let mut tx = store.write().await.unwrap();
        let err = tx
            .create_edge(
                Relation::ActedIn,
                &NodeRef::new(Label::Actor, "a1"),
                &NodeRef::new(Label::Movie, "ghost"),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_parallel_edges_kept() {
        let store = MemoryGraph::new();
        seed(&store).await;

        let mut tx = store.write().await.unwrap();
        let a1 = NodeRef::new(Label::Actor, "a1");
        let m1 = NodeRef::new(Label::Movie, "m1");
        tx.create_edge(Relation::ActedIn, &a1, &m1).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.edge_count().await, 3);
        let mut rx = store.read().await.unwrap();
        let films = rx.neighbors(&a1, Relation::ActedIn, Direction::Outgoing).await.unwrap();
        assert_eq!(films.len(), 2);
    }

    #[tokio::test]
    async fn test_rollback_discards_changes() {
        let store = MemoryGraph::new();
        seed(&store).await;

        let mut tx = store.write().await.unwrap();
        let outcome = tx
            .delete_node(Label::Actor, "a1")
            .await
            .and_then(|_| Err::<(), _>(CineError::validation("boom")));
        assert!(finish(tx, outcome).await.is_err());

        assert_eq!(store.node_count().await, 3);
        assert_eq!(store.edge_count().await, 2);
    }

    #[tokio::test]
    async fn test_closed_context_releases_lock() {
        let store = MemoryGraph::new();
        let wait = std::time::Duration::from_millis(500);

        let mut tx = store.write().await.unwrap();
        tx.create_node(Label::Actor, actor("a1", "Keanu")).await.unwrap();
        tx.commit().await.unwrap();
        let count = tokio::time::timeout(wait, store.node_count()).await;
        assert_eq!(count.unwrap(), 1);
        assert!(tx.get_node(Label::Actor, "a1").await.is_err());
        assert!(tx.commit().await.is_err());

        let mut tx = store.write().await.unwrap();
        tx.create_node(Label::Actor, actor("a2", "Laurence")).await.unwrap();
        tx.rollback().await.unwrap();
        let writer = tokio::time::timeout(wait, store.write()).await;
        assert!(writer.unwrap().is_ok());
        drop(tx);
        assert_eq!(store.node_count().await, 1);
    }

    #[tokio::test]
    async fn test_dropped_context_discards_changes() {
        let store = MemoryGraph::new();
        {
            let mut tx = store.write().await.unwrap();
            tx.create_node(Label::Actor, actor("a9", "Nobody")).await.unwrap();
        }
        assert_eq!(store.node_count().await, 0);
    }

    #[tokio::test]
    async fn test_merge_node_returns_existing() {
        let store = MemoryGraph::new();
        let name = json!("Drama");

        let mut tx = store.write().await.unwrap();
        let first = tx
            .merge_node(Label::Genre, "name", &name, props(json!({"id": "g1"})))
            .await
            .unwrap();
        let second = tx
            .merge_node(Label::Genre, "name", &name, props(json!({"id": "g2"})))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.id, "g1");
        assert_eq!(store.node_count().await, 1);
    }

    #[tokio::test]
    async fn test_install_rejects_existing_duplicates() {
        let store = MemoryGraph::new();
        let mut tx = store.write().await.unwrap();
        tx.create_node(Label::Genre, props(json!({"id": "g1", "name": "Drama"}))).await.unwrap();
        tx.create_node(Label::Genre, props(json!({"id": "g2", "name": "Drama"}))).await.unwrap();
        tx.commit().await.unwrap();

        let rule = UniqueConstraint::new(Label::Genre, "name");
        assert!(store.ensure_unique_constraint(&rule).await.is_err());
        assert!(store.unique_constraints().await.unwrap().is_empty());
    }
}
