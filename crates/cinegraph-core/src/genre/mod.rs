//! Genre service. Genres are upserted by name.

pub mod model;

use serde_json::json;
use tracing::{debug, info};

use crate::common::{self, Ack, Created};
use crate::error::{CineError, CineResult};
use crate::graph::{finish, GraphStore, Label, Node, NodeRef, Properties, WriteContext};
use model::Genre;

/// Create a genre, or return the id of the existing genre with that name.
pub async fn create_genre(store: &dyn GraphStore, name: &str) -> CineResult<Created> {
    let mut tx = store.write().await?;
    let outcome = merge_genre(tx.as_mut(), name).await;
    let genre = finish(tx, outcome).await?;

    info!(genre_id = %genre.id, genre = name, "Genre upserted");
    Ok(Created::new(genre.id, Label::Genre))
}

/// Upsert a genre by name inside an open write context.
pub(crate) async fn merge_genre(ctx: &mut dyn WriteContext, name: &str) -> CineResult<NodeRef> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CineError::validation("genre name must not be empty"));
    }

    let mut properties = Properties::new();
    properties.insert("id".to_string(), json!(common::new_id()));
    let genre = ctx
        .merge_node(Label::Genre, "name", &json!(name), properties)
        .await?;

    debug!(genre_id = %genre.id, genre = name, "Genre resolved");
    Ok(genre)
}

/// Get a genre by ID.
pub async fn get_genre(store: &dyn GraphStore, id: &str) -> CineResult<Genre> {
    let mut rx = store.read().await?;
    let node = rx.get_node(Label::Genre, id).await?;
    Ok(genre_view(node))
}

/// List all genres.
pub async fn list_genres(store: &dyn GraphStore) -> CineResult<Vec<Genre>> {
    let mut rx = store.read().await?;
    let nodes = rx.nodes(Label::Genre).await?;
    Ok(nodes.into_iter().map(genre_view).collect())
}

/// Delete a genre. Movies lose their `HAS_GENRE` edge to it.
pub async fn delete_genre(store: &dyn GraphStore, id: &str) -> CineResult<Ack> {
    common::delete_entity(store, Label::Genre, id).await
}

fn genre_view(node: Node) -> Genre {
    Genre {
        name: node.display_name().to_string(),
        id: node.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;

    #[tokio::test]
    async fn test_upsert_by_name() {
        let store = MemoryGraph::new();
        let first = create_genre(&store, "Western").await.unwrap();
        let second = create_genre(&store, "Western").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.node_count().await, 1);

        let genre = get_genre(&store, &first.id).await.unwrap();
        assert_eq!(genre.name, "Western");
    }

    #[tokio::test]
    async fn test_distinct_names_create_distinct_genres() {
        let store = MemoryGraph::new();
        let western = create_genre(&store, "Western").await.unwrap();
        let noir = create_genre(&store, "Noir").await.unwrap();
        assert_ne!(western.id, noir.id);
        assert_eq!(list_genres(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let store = MemoryGraph::new();
        let err = create_genre(&store, "   ").await.unwrap_err();
        assert!(matches!(err, CineError::Validation(_)));
        assert_eq!(store.node_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_genre() {
        let store = MemoryGraph::new();
        let created = create_genre(&store, "Musical").await.unwrap();
        delete_genre(&store, &created.id).await.unwrap();
        assert!(get_genre(&store, &created.id).await.unwrap_err().is_not_found());
    }
}
