//! Movie domain models.

use serde::{Deserialize, Serialize};

/// A movie with its genres, director, cast and awards denormalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub released: i64,
    pub rating: f64,
    pub budget: f64,
    pub box_office: f64,
    pub description: String,
    pub genres: Vec<String>,
    pub director: Option<String>,
    pub actors: Vec<String>,
    pub awards: Vec<String>,
}

/// An actor appearing in a movie's cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub id: String,
    pub name: String,
    pub birthdate: String,
    pub awards: Vec<String>,
}

/// Input for creating a movie.
///
/// Genres are given by name and upserted; director and actors must exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieInput {
    pub title: String,
    pub released: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub box_office: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub director_id: Option<String>,
    #[serde(default)]
    pub actor_ids: Vec<String>,
}

impl CreateMovieInput {
    pub fn new(title: impl Into<String>, released: i64) -> Self {
        Self {
            title: title.into(),
            released,
            rating: 0.0,
            budget: 0.0,
            box_office: 0.0,
            description: String::new(),
            genres: Vec::new(),
            director_id: None,
            actor_ids: Vec::new(),
        }
    }

    pub fn rated(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_finances(mut self, budget: f64, box_office: f64) -> Self {
        self.budget = budget;
        self.box_office = box_office;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genres.push(genre.into());
        self
    }

    pub fn directed_by(mut self, director_id: impl Into<String>) -> Self {
        self.director_id = Some(director_id.into());
        self
    }

    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_ids.push(actor_id.into());
        self
    }
}

/// Optional restrictions for listing movies. Set fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieFilter {
    pub director_id: Option<String>,
    pub actor_id: Option<String>,
}

impl MovieFilter {
    pub fn by_director(director_id: impl Into<String>) -> Self {
        Self {
            director_id: Some(director_id.into()),
            actor_id: None,
        }
    }

    pub fn by_actor(actor_id: impl Into<String>) -> Self {
        Self {
            director_id: None,
            actor_id: Some(actor_id.into()),
        }
    }

    pub fn and_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }
}
