//! Actor service.

pub mod model;

use serde_json::json;
use tracing::info;

use crate::common::{self, Ack, Created};
use crate::error::CineResult;
use crate::graph::{Direction, GraphStore, Label, Node, Properties, ReadContext, Relation};
use model::{Actor, CreateActorInput};

/// Create an actor and link it to the given awards.
///
/// The actor node is committed first; each award edge then runs in its own
/// write context. If an edge step fails the actor and the earlier edges stay
/// in place and the error is returned.
pub async fn create_actor(store: &dyn GraphStore, input: CreateActorInput) -> CineResult<Created> {
    let id = common::new_id();
    let mut properties = Properties::new();
    properties.insert("id".to_string(), json!(id));
    properties.insert("name".to_string(), json!(input.name));
    properties.insert("birthdate".to_string(), json!(input.birthdate));

    let actor = common::create_entity(store, Label::Actor, properties).await?;
    common::link_awards(store, &actor, &input.award_ids).await?;

    info!(actor_id = %id, awards = input.award_ids.len(), "Actor created");
    Ok(Created::new(id, Label::Actor))
}

/// Get an actor by ID.
pub async fn get_actor(store: &dyn GraphStore, id: &str) -> CineResult<Actor> {
    let mut rx = store.read().await?;
    let node = rx.get_node(Label::Actor, id).await?;
    actor_view(rx.as_mut(), node).await
}

/// List all actors.
pub async fn list_actors(store: &dyn GraphStore) -> CineResult<Vec<Actor>> {
    let mut rx = store.read().await?;
    let nodes = rx.nodes(Label::Actor).await?;

    let mut actors = Vec::with_capacity(nodes.len());
    for node in nodes {
        actors.push(actor_view(rx.as_mut(), node).await?);
    }
    Ok(actors)
}

/// Delete an actor and every relationship it takes part in.
pub async fn delete_actor(store: &dyn GraphStore, id: &str) -> CineResult<Ack> {
    let ack = common::delete_entity(store, Label::Actor, id).await?;
    info!(actor_id = id, "Actor deleted");
    Ok(ack)
}

async fn actor_view(ctx: &mut dyn ReadContext, node: Node) -> CineResult<Actor> {
    let node_ref = node.node_ref();
    let movies = common::distinct_names(
        ctx.neighbors(&node_ref, Relation::ActedIn, Direction::Outgoing)
            .await?,
    );
    let awards = common::award_lines(ctx, &node_ref).await?;

    Ok(Actor {
        name: node.display_name().to_string(),
        birthdate: node.prop_text("birthdate"),
        id: node.id,
        movies,
        awards,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::award::{self, model::CreateAwardInput};
    use crate::error::CineError;
    use crate::graph::MemoryGraph;

    #[tokio::test]
    async fn test_create_and_get_actor() {
        let store = MemoryGraph::new();
        let oscar = award::create_award(&store, CreateAwardInput::new("Oscar", 2004, "Best Actor"))
            .await
            .unwrap();

        let created = create_actor(
            &store,
            CreateActorInput::new("Sean Penn", "1960-08-17").with_award(&oscar.id),
        )
        .await
        .unwrap();
        assert_eq!(created.message, "Actor created successfully");

        let actor = get_actor(&store, &created.id).await.unwrap();
        assert_eq!(actor.name, "Sean Penn");
        assert_eq!(actor.birthdate, "1960-08-17");
        assert!(actor.movies.is_empty());
        assert_eq!(actor.awards, vec!["Oscar Best Actor 2004".to_string()]);
    }

    #[tokio::test]
    async fn test_get_missing_actor() {
        let store = MemoryGraph::new();
        let err = get_actor(&store, "nobody").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_with_missing_award_keeps_node() {
        let store = MemoryGraph::new();
        let err = create_actor(
            &store,
            CreateActorInput::new("Jodie Foster", "1962-11-19").with_award("no-such-award"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CineError::NotFound { .. }));

        let actors = list_actors(&store).await.unwrap();
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "Jodie Foster");
    }

    #[tokio::test]
    async fn test_delete_actor_twice() {
        let store = MemoryGraph::new();
        let created = create_actor(&store, CreateActorInput::new("Tilda Swinton", "1960-11-05"))
            .await
            .unwrap();

        let ack = delete_actor(&store, &created.id).await.unwrap();
        assert_eq!(ack.message, "Actor deleted successfully");
        assert!(delete_actor(&store, &created.id).await.unwrap_err().is_not_found());
        assert!(list_actors(&store).await.unwrap().is_empty());
    }
}
