//! Traversal analytics over the film graph.
//!
//! Every query opens one read context, walks the graph and ranks in memory.
//! Rankings break ties by display name, then id, so results are stable
//! across stores.

pub mod collaboration;
pub mod leaderboard;
pub mod recommend;
pub mod similarity;
pub mod winners;

pub use collaboration::{collaborations, Collaboration};
pub use leaderboard::{top_actors, TopActor, TOP_ACTORS_LIMIT};
pub use recommend::{recommendations, score, MovieRecommendation, RECOMMENDATION_LIMIT};
pub use similarity::{similar_movies, SimilarMovie, SIMILAR_LIMIT};
pub use winners::{winners, Winner};
