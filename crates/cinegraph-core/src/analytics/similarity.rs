//! Genre-based movie similarity.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::common::distinct_nodes;
use crate::error::CineResult;
use crate::graph::{Direction, GraphStore, Label, Node, NodeRef, ReadContext, Relation};

/// Maximum number of similar movies returned.
pub const SIMILAR_LIMIT: usize = 10;

/// A movie sharing genres with the anchor movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarMovie {
    pub id: String,
    pub title: String,
    pub shared_genres: Vec<String>,
    pub shared_director: bool,
}

/// A movie reached from the anchor through at least one common genre.
pub(crate) struct Candidate {
    pub node: Node,
    pub genres: BTreeSet<String>,
}

/// Movies sharing a genre with `movie`, excluding `movie` itself.
pub(crate) async fn genre_candidates(ctx: &mut dyn ReadContext, movie: &Node) -> CineResult<Vec<Candidate>> {
    let genres = distinct_nodes(
        ctx.neighbors(&movie.node_ref(), Relation::HasGenre, Direction::Outgoing)
            .await?,
    );

    let mut found: IndexMap<String, Candidate> = IndexMap::new();
    for genre in &genres {
        let tagged = ctx
            .neighbors(&genre.node_ref(), Relation::HasGenre, Direction::Incoming)
            .await?;
        for other in tagged {
            if other.id == movie.id {
                continue;
            }
            let name = genre.display_name().to_string();
            found
                .entry(other.id.clone())
                .or_insert_with(|| Candidate {
                    node: other,
                    genres: BTreeSet::new(),
                })
                .genres
                .insert(name);
        }
    }
    Ok(found.into_values().collect())
}

/// Ids of the distinct nodes linked to `movie` through incoming `relation`.
pub(crate) async fn linked_ids(
    ctx: &mut dyn ReadContext,
    movie: &NodeRef,
    relation: Relation,
) -> CineResult<BTreeSet<String>> {
    let nodes = ctx.neighbors(movie, relation, Direction::Incoming).await?;
    Ok(nodes.into_iter().map(|node| node.id).collect())
}

/// Movies sharing genres with `movie_id`: most shared genres first, then
/// those sharing a director.
pub async fn similar_movies(store: &dyn GraphStore, movie_id: &str) -> CineResult<Vec<SimilarMovie>> {
    let mut rx = store.read().await?;
    let movie = rx.get_node(Label::Movie, movie_id).await?;
    let directors = linked_ids(rx.as_mut(), &movie.node_ref(), Relation::Directed).await?;

    let candidates = genre_candidates(rx.as_mut(), &movie).await?;
    let mut result = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let theirs = linked_ids(rx.as_mut(), &candidate.node.node_ref(), Relation::Directed).await?;
        result.push(SimilarMovie {
            title: candidate.node.display_name().to_string(),
            id: candidate.node.id,
            shared_genres: candidate.genres.into_iter().collect(),
            shared_director: !directors.is_disjoint(&theirs),
        });
    }

    result.sort_by(|a, b| {
        b.shared_genres
            .len()
            .cmp(&a.shared_genres.len())
            .then_with(|| b.shared_director.cmp(&a.shared_director))
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });
    result.truncate(SIMILAR_LIMIT);
    Ok(result)
}
