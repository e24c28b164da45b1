//! Award service.

pub mod model;

use serde_json::json;
use tracing::info;

use crate::common::{self, Ack, Created};
use crate::error::{CineError, CineResult};
use crate::graph::{finish, GraphStore, Label, Node, Properties, Relation, WriteContext};
use model::{Award, AwardWinner, CreateAwardInput};

/// Create an award.
pub async fn create_award(store: &dyn GraphStore, input: CreateAwardInput) -> CineResult<Created> {
    let id = common::new_id();
    let mut properties = Properties::new();
    properties.insert("id".to_string(), json!(id));
    properties.insert("name".to_string(), json!(input.name));
    properties.insert("year".to_string(), json!(input.year));
    properties.insert("category".to_string(), json!(input.category));

    common::create_entity(store, Label::Award, properties).await?;

    info!(award_id = %id, year = input.year, "Award created");
    Ok(Created::new(id, Label::Award))
}

/// Record that `winner_id` (an actor, director or movie) won `award_id`.
///
/// Fails with `NotFound` when the award or the winner does not exist, and
/// with `InvalidReference` when the winner id belongs to a genre or award.
pub async fn win_award(store: &dyn GraphStore, award_id: &str, winner_id: &str) -> CineResult<Ack> {
    let mut tx = store.write().await?;
    let outcome = record_win(tx.as_mut(), award_id, winner_id).await;
    let winner = finish(tx, outcome).await?;

    info!(award_id, winner = %winner.node_ref(), "Award won");
    Ok(Ack::new("Award won successfully"))
}

async fn record_win(ctx: &mut dyn WriteContext, award_id: &str, winner_id: &str) -> CineResult<AwardWinner> {
    let award = ctx.get_node(Label::Award, award_id).await?;
    let winner = match ctx.locate(winner_id).await? {
        Some(node) => AwardWinner::from_node(&node)?,
        None => return Err(CineError::unknown_node(winner_id)),
    };

    ctx.create_edge(Relation::WonAward, &winner.node_ref(), &award.node_ref())
        .await?;
    Ok(winner)
}

/// Get an award by ID.
pub async fn get_award(store: &dyn GraphStore, id: &str) -> CineResult<Award> {
    let mut rx = store.read().await?;
    let node = rx.get_node(Label::Award, id).await?;
    Ok(award_view(node))
}

/// List all awards.
pub async fn list_awards(store: &dyn GraphStore) -> CineResult<Vec<Award>> {
    let mut rx = store.read().await?;
    let nodes = rx.nodes(Label::Award).await?;
    Ok(nodes.into_iter().map(award_view).collect())
}

/// Delete an award. Winners lose their `WON_AWARD` edge to it.
pub async fn delete_award(store: &dyn GraphStore, id: &str) -> CineResult<Ack> {
    let ack = common::delete_entity(store, Label::Award, id).await?;
    info!(award_id = id, "Award deleted");
    Ok(ack)
}

fn award_view(node: Node) -> Award {
    Award {
        name: node.display_name().to_string(),
        year: node.i64_prop("year").unwrap_or_default(),
        category: node.prop_text("category"),
        id: node.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{self, model::CreateActorInput};
    use crate::genre;
    use crate::graph::MemoryGraph;

    #[tokio::test]
    async fn test_create_and_list_awards() {
        let store = MemoryGraph::new();
        let created = create_award(&store, CreateAwardInput::new("Palme d'Or", 2019, "Feature Film"))
            .await
            .unwrap();

        let award = get_award(&store, &created.id).await.unwrap();
        assert_eq!(award.name, "Palme d'Or");
        assert_eq!(award.year, 2019);
        assert_eq!(award.category, "Feature Film");
        assert_eq!(list_awards(&store).await.unwrap(), vec![award]);
    }

    #[tokio::test]
    async fn test_win_award_links_actor() {
        let store = MemoryGraph::new();
        let award = create_award(&store, CreateAwardInput::new("Oscar", 1994, "Best Actor"))
            .await
            .unwrap();
        let hanks = actor::create_actor(&store, CreateActorInput::new("Tom Hanks", "1956-07-09"))
            .await
            .unwrap();

        win_award(&store, &award.id, &hanks.id).await.unwrap();

        let view = actor::get_actor(&store, &hanks.id).await.unwrap();
        assert_eq!(view.awards, vec!["Oscar Best Actor 1994".to_string()]);
    }

    #[tokio::test]
    async fn test_win_award_rejects_genre_winner() {
        let store = MemoryGraph::new();
        let award = create_award(&store, CreateAwardInput::new("Oscar", 1994, "Best Picture"))
            .await
            .unwrap();
        let drama = genre::create_genre(&store, "Drama").await.unwrap();

        let err = win_award(&store, &award.id, &drama.id).await.unwrap_err();
        assert!(matches!(err, CineError::InvalidReference(_)));
        assert_eq!(store.edge_count().await, 0);
    }

    #[tokio::test]
    async fn test_win_award_missing_ids() {
        let store = MemoryGraph::new();
        let award = create_award(&store, CreateAwardInput::new("Oscar", 1994, "Best Picture"))
            .await
            .unwrap();
        let hanks = actor::create_actor(&store, CreateActorInput::new("Tom Hanks", "1956-07-09"))
            .await
            .unwrap();

        assert!(win_award(&store, &award.id, "nobody").await.unwrap_err().is_not_found());
        assert!(win_award(&store, "no-award", &hanks.id).await.unwrap_err().is_not_found());
    }

    #[test]
    fn test_award_winner_serializes_tagged() {
        let winner = AwardWinner::Movie("m1".to_string());
        let json = serde_json::to_value(&winner).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Movie", "id": "m1"}));
    }
}
