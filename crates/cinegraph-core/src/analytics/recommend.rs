//! Weighted movie recommendations.

use serde::{Deserialize, Serialize};

use super::similarity::{genre_candidates, linked_ids};
use crate::error::CineResult;
use crate::graph::{GraphStore, Label, Relation};

/// Maximum number of recommendations returned.
pub const RECOMMENDATION_LIMIT: usize = 10;

pub const GENRE_WEIGHT: f64 = 0.3;
pub const DIRECTOR_WEIGHT: f64 = 0.4;
pub const ACTOR_WEIGHT: f64 = 0.1;

/// A recommended movie with the overlap counts behind its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecommendation {
    pub id: String,
    pub title: String,
    pub shared_genres: usize,
    pub shared_directors: usize,
    pub shared_actors: usize,
    pub similarity_score: f64,
}

/// Linear, non-normalized overlap score.
pub fn score(shared_genres: usize, shared_directors: usize, shared_actors: usize) -> f64 {
    shared_genres as f64 * GENRE_WEIGHT
        + shared_directors as f64 * DIRECTOR_WEIGHT
        + shared_actors as f64 * ACTOR_WEIGHT
}

/// Movies sharing at least one genre with `movie_id`, ranked by
/// [`score`] over shared genres, directors and actors.
pub async fn recommendations(store: &dyn GraphStore, movie_id: &str) -> CineResult<Vec<MovieRecommendation>> {
    let mut rx = store.read().await?;
    let movie = rx.get_node(Label::Movie, movie_id).await?;
    let anchor = movie.node_ref();
    let directors = linked_ids(rx.as_mut(), &anchor, Relation::Directed).await?;
    let actors = linked_ids(rx.as_mut(), &anchor, Relation::ActedIn).await?;

    let candidates = genre_candidates(rx.as_mut(), &movie).await?;
    let mut result = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let node_ref = candidate.node.node_ref();
        let their_directors = linked_ids(rx.as_mut(), &node_ref, Relation::Directed).await?;
        let their_actors = linked_ids(rx.as_mut(), &node_ref, Relation::ActedIn).await?;

        let shared_genres = candidate.genres.len();
        let shared_directors = directors.intersection(&their_directors).count();
        let shared_actors = actors.intersection(&their_actors).count();

        result.push(MovieRecommendation {
            title: candidate.node.display_name().to_string(),
            id: candidate.node.id,
            shared_genres,
            shared_directors,
            shared_actors,
            similarity_score: score(shared_genres, shared_directors, shared_actors),
        });
    }

    result.sort_by(|a, b| {
        b.similarity_score
            .total_cmp(&a.similarity_score)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });
    result.truncate(RECOMMENDATION_LIMIT);
    Ok(result)
}
