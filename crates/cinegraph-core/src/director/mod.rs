//! Director service.

pub mod model;

use serde_json::json;
use tracing::info;

use crate::common::{self, Ack, Created};
use crate::error::CineResult;
use crate::graph::{Direction, GraphStore, Label, Node, Properties, ReadContext, Relation};
use model::{CreateDirectorInput, Director};

/// Create a director and link it to the given awards.
///
/// Same recovery boundary as actors: the node is kept if an award edge fails.
pub async fn create_director(store: &dyn GraphStore, input: CreateDirectorInput) -> CineResult<Created> {
    let id = common::new_id();
    let mut properties = Properties::new();
    properties.insert("id".to_string(), json!(id));
    properties.insert("name".to_string(), json!(input.name));
    properties.insert("birthdate".to_string(), json!(input.birthdate));

    let director = common::create_entity(store, Label::Director, properties).await?;
    common::link_awards(store, &director, &input.award_ids).await?;

    info!(director_id = %id, awards = input.award_ids.len(), "Director created");
    Ok(Created::new(id, Label::Director))
}

/// Get a director by ID.
pub async fn get_director(store: &dyn GraphStore, id: &str) -> CineResult<Director> {
    let mut rx = store.read().await?;
    let node = rx.get_node(Label::Director, id).await?;
    director_view(rx.as_mut(), node).await
}

/// List all directors.
pub async fn list_directors(store: &dyn GraphStore) -> CineResult<Vec<Director>> {
    let mut rx = store.read().await?;
    let nodes = rx.nodes(Label::Director).await?;

    let mut directors = Vec::with_capacity(nodes.len());
    for node in nodes {
        directors.push(director_view(rx.as_mut(), node).await?);
    }
    Ok(directors)
}

/// Delete a director and its relationships.
pub async fn delete_director(store: &dyn GraphStore, id: &str) -> CineResult<Ack> {
    let ack = common::delete_entity(store, Label::Director, id).await?;
    info!(director_id = id, "Director deleted");
    Ok(ack)
}

async fn director_view(ctx: &mut dyn ReadContext, node: Node) -> CineResult<Director> {
    let node_ref = node.node_ref();
    let movies = common::distinct_names(
        ctx.neighbors(&node_ref, Relation::Directed, Direction::Outgoing)
            .await?,
    );
    let awards = common::award_lines(ctx, &node_ref).await?;

    Ok(Director {
        name: node.display_name().to_string(),
        birthdate: node.prop_text("birthdate"),
        id: node.id,
        movies,
        awards,
    })
}
