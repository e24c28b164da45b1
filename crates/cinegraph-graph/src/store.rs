//! [`GraphStore`] implementation over Neo4j.
//!
//! Read contexts run auto-commit queries on the pool. Write contexts own an
//! explicit transaction, so reads issued through them see the staged writes.

use async_trait::async_trait;
use cinegraph_core::graph::{
    Direction, GraphStore, Label, Node, NodeRef, Properties, ReadContext, Relation, WriteContext,
};
use cinegraph_core::{CineError, CineResult, UniqueConstraint};
use neo4rs::{BoltType, Graph, Query, Row, Txn};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::GraphClient;
use crate::cypher;

/// Neo4j-backed graph store.
#[derive(Clone)]
pub struct Neo4jStore {
    client: GraphClient,
}

impl Neo4jStore {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GraphClient {
        &self.client
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn read<'a>(&'a self) -> CineResult<Box<dyn ReadContext + 'a>> {
        Ok(Box::new(Neo4jRead {
            graph: self.client.inner(),
        }))
    }

    async fn write<'a>(&'a self) -> CineResult<Box<dyn WriteContext + 'a>> {
        let txn = self.client.inner().start_txn().await.map_err(driver_error)?;
        Ok(Box::new(Neo4jWrite { txn: Some(txn) }))
    }

    async fn ensure_unique_constraint(&self, constraint: &UniqueConstraint) -> CineResult<bool> {
        let mut read = Neo4jRead {
            graph: self.client.inner(),
        };
        let rows = read
            .fetch(
                Query::new(cypher::find_constraint())
                    .param("label", constraint.label.as_str())
                    .param("property", constraint.property.as_str()),
            )
            .await?;
        if count_column(&rows, "found")? > 0 {
            debug!(constraint = %constraint.name(), "Constraint already present");
            return Ok(false);
        }

        // IF NOT EXISTS keeps a concurrent installer from failing here.
        self.client
            .inner()
            .run(Query::new(cypher::create_constraint(constraint)))
            .await
            .map_err(driver_error)?;
        debug!(constraint = %constraint.name(), "Constraint created");
        Ok(true)
    }

    async fn unique_constraints(&self) -> CineResult<Vec<UniqueConstraint>> {
        let mut read = Neo4jRead {
            graph: self.client.inner(),
        };
        let rows = read.fetch(Query::new(cypher::list_constraints())).await?;

        let mut constraints = Vec::new();
        for row in rows {
            let label: String = row.get("label").map_err(row_error)?;
            let property: String = row.get("property").map_err(row_error)?;
            match label.parse::<Label>() {
                Ok(label) => constraints.push(UniqueConstraint::new(label, property)),
                Err(_) => debug!(label = %label, "Skipping constraint on foreign label"),
            }
        }
        Ok(constraints)
    }
}

/// Runs a query and collects its rows.
#[async_trait]
trait Fetch: Send {
    async fn fetch(&mut self, query: Query) -> CineResult<Vec<Row>>;
}

struct Neo4jRead<'a> {
    graph: &'a Graph,
}

#[async_trait]
impl Fetch for Neo4jRead<'_> {
    async fn fetch(&mut self, query: Query) -> CineResult<Vec<Row>> {
        let mut result = self.graph.execute(query).await.map_err(driver_error)?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await.map_err(driver_error)? {
            rows.push(row);
        }
        Ok(rows)
    }
}

struct Neo4jWrite {
    txn: Option<Txn>,
}

impl Neo4jWrite {
    fn txn(&mut self) -> CineResult<&mut Txn> {
        self.txn
            .as_mut()
            .ok_or_else(|| CineError::unavailable("transaction already closed"))
    }

    /// Run a mutating statement, mapping constraint failures onto `label`.
    async fn fetch_for(&mut self, label: Label, query: Query) -> CineResult<Vec<Row>> {
        match self.fetch(query).await {
            Err(CineError::StoreUnavailable(message)) if is_constraint_failure(&message) => {
                Err(CineError::constraint(label, message))
            }
            other => other,
        }
    }
}

#[async_trait]
impl Fetch for Neo4jWrite {
    async fn fetch(&mut self, query: Query) -> CineResult<Vec<Row>> {
        let txn = self.txn()?;
        let mut stream = txn.execute(query).await.map_err(driver_error)?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next(txn.handle()).await.map_err(driver_error)? {
            rows.push(row);
        }
        Ok(rows)
    }
}

#[async_trait]
impl ReadContext for Neo4jRead<'_> {
    async fn get_node(&mut self, label: Label, id: &str) -> CineResult<Node> {
        get_node(self, label, id).await
    }

    async fn nodes(&mut self, label: Label) -> CineResult<Vec<Node>> {
        nodes(self, label).await
    }

    async fn locate(&mut self, id: &str) -> CineResult<Option<Node>> {
        locate(self, id).await
    }

    async fn neighbors(
        &mut self,
        node: &NodeRef,
        relation: Relation,
        direction: Direction,
    ) -> CineResult<Vec<Node>> {
        neighbors(self, node, relation, direction).await
    }
}

#[async_trait]
impl ReadContext for Neo4jWrite {
    async fn get_node(&mut self, label: Label, id: &str) -> CineResult<Node> {
        get_node(self, label, id).await
    }

    async fn nodes(&mut self, label: Label) -> CineResult<Vec<Node>> {
        nodes(self, label).await
    }

    async fn locate(&mut self, id: &str) -> CineResult<Option<Node>> {
        locate(self, id).await
    }

    async fn neighbors(
        &mut self,
        node: &NodeRef,
        relation: Relation,
        direction: Direction,
    ) -> CineResult<Vec<Node>> {
        neighbors(self, node, relation, direction).await
    }
}

#[async_trait]
impl WriteContext for Neo4jWrite {
    async fn create_node(&mut self, label: Label, properties: Properties) -> CineResult<NodeRef> {
        label.validate(&properties)?;
        let query = Query::new(cypher::create_node(label))
            .param("props", BoltType::Map(cypher::props_map(&properties)));
        let rows = self.fetch_for(label, query).await?;
        let id = id_column(&rows)?;
        debug!(node = %NodeRef::new(label, id.as_str()), "Node created");
        Ok(NodeRef::new(label, id))
    }

    async fn merge_node(
        &mut self,
        label: Label,
        key: &str,
        value: &Value,
        mut properties: Properties,
    ) -> CineResult<NodeRef> {
        properties.insert(key.to_string(), value.clone());
        label.validate(&properties)?;

        let query = Query::new(cypher::merge_node(label, key))
            .param("value", cypher::to_bolt(value))
            .param("props", BoltType::Map(cypher::props_map(&properties)));
        let rows = self.fetch_for(label, query).await?;
        Ok(NodeRef::new(label, id_column(&rows)?))
    }

    async fn delete_node(&mut self, label: Label, id: &str) -> CineResult<()> {
        let rows = self
            .fetch(Query::new(cypher::delete_node(label)).param("id", id))
            .await?;
        if count_column(&rows, "deleted")? == 0 {
            return Err(CineError::not_found(label, id));
        }
        Ok(())
    }

    async fn create_edge(&mut self, relation: Relation, from: &NodeRef, to: &NodeRef) -> CineResult<()> {
        relation.check_endpoints(from.label, to.label)?;
        get_node(self, from.label, &from.id).await?;
        get_node(self, to.label, &to.id).await?;

        let query = Query::new(cypher::create_edge(from.label, relation, to.label))
            .param("from_id", from.id.as_str())
            .param("to_id", to.id.as_str());
        self.fetch(query).await?;
        debug!(%from, %relation, %to, "Edge created");
        Ok(())
    }

    async fn commit(&mut self) -> CineResult<()> {
        match self.txn.take() {
            Some(txn) => txn.commit().await.map_err(driver_error),
            None => Err(CineError::unavailable("transaction already closed")),
        }
    }

    async fn rollback(&mut self) -> CineResult<()> {
        match self.txn.take() {
            Some(txn) => txn.rollback().await.map_err(driver_error),
            None => Ok(()),
        }
    }
}

impl Drop for Neo4jWrite {
    fn drop(&mut self) {
        if self.txn.is_some() {
            warn!("Write transaction dropped without commit or rollback");
        }
    }
}

async fn get_node<F: Fetch + ?Sized>(runner: &mut F, label: Label, id: &str) -> CineResult<Node> {
    let rows = runner
        .fetch(Query::new(cypher::get_node(label)).param("id", id))
        .await?;
    match rows.first() {
        Some(row) => node_from_row(row, Some(label)),
        None => Err(CineError::not_found(label, id)),
    }
}

async fn nodes<F: Fetch + ?Sized>(runner: &mut F, label: Label) -> CineResult<Vec<Node>> {
    let rows = runner.fetch(Query::new(cypher::nodes(label))).await?;
    rows.iter().map(|row| node_from_row(row, Some(label))).collect()
}

async fn locate<F: Fetch + ?Sized>(runner: &mut F, id: &str) -> CineResult<Option<Node>> {
    let rows = runner
        .fetch(
            Query::new(cypher::locate())
                .param("id", id)
                .param("known", cypher::known_labels()),
        )
        .await?;
    rows.first().map(|row| node_from_row(row, None)).transpose()
}

async fn neighbors<F: Fetch + ?Sized>(
    runner: &mut F,
    node: &NodeRef,
    relation: Relation,
    direction: Direction,
) -> CineResult<Vec<Node>> {
    let query = Query::new(cypher::neighbors(node.label, relation, direction))
        .param("id", node.id.as_str())
        .param("known", cypher::known_labels());
    let rows = runner.fetch(query).await?;
    rows.iter().map(|row| node_from_row(row, None)).collect()
}

fn node_from_row(row: &Row, label: Option<Label>) -> CineResult<Node> {
    let label = match label {
        Some(label) => label,
        None => row.get::<String>("label").map_err(row_error)?.parse()?,
    };
    let properties: Properties = row.get("props").map_err(row_error)?;
    Node::from_properties(label, properties)
}

fn id_column(rows: &[Row]) -> CineResult<String> {
    rows.first()
        .ok_or_else(|| CineError::unavailable("write returned no rows"))?
        .get("id")
        .map_err(row_error)
}

fn count_column(rows: &[Row], column: &str) -> CineResult<i64> {
    match rows.first() {
        Some(row) => row.get(column).map_err(row_error),
        None => Ok(0),
    }
}

fn is_constraint_failure(message: &str) -> bool {
    message.contains("ConstraintValidationFailed") || message.contains("already exists with label")
}

fn driver_error(err: neo4rs::Error) -> CineError {
    CineError::unavailable(err.to_string())
}

fn row_error(err: neo4rs::DeError) -> CineError {
    CineError::unavailable(format!("unexpected row shape: {}", err))
}
