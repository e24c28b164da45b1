//! Actor leaderboard.

use serde::{Deserialize, Serialize};

use crate::common::distinct_nodes;
use crate::error::CineResult;
use crate::graph::{Direction, GraphStore, Label, Relation};

/// Maximum number of entries in the leaderboard.
pub const TOP_ACTORS_LIMIT: usize = 20;

/// An actor's distinct movie and award counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopActor {
    pub id: String,
    pub name: String,
    pub movie_count: usize,
    pub award_count: usize,
}

/// Actors ranked by movies acted in, then by awards won.
pub async fn top_actors(store: &dyn GraphStore) -> CineResult<Vec<TopActor>> {
    let mut rx = store.read().await?;
    let actors = rx.nodes(Label::Actor).await?;

    let mut board = Vec::with_capacity(actors.len());
    for actor in actors {
        let node_ref = actor.node_ref();
        let movies = distinct_nodes(
            rx.neighbors(&node_ref, Relation::ActedIn, Direction::Outgoing)
                .await?,
        );
        let awards = distinct_nodes(
            rx.neighbors(&node_ref, Relation::WonAward, Direction::Outgoing)
                .await?,
        );
        board.push(TopActor {
            name: actor.display_name().to_string(),
            id: actor.id,
            movie_count: movies.len(),
            award_count: awards.len(),
        });
    }

    board.sort_by(|a, b| {
        b.movie_count
            .cmp(&a.movie_count)
            .then_with(|| b.award_count.cmp(&a.award_count))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    board.truncate(TOP_ACTORS_LIMIT);
    Ok(board)
}
