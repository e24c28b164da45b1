//! Movie service.

pub mod model;

use serde_json::json;
use tracing::{info, warn};

use crate::common::{self, Ack, Created};
use crate::error::CineResult;
use crate::genre;
use crate::graph::{finish, Direction, GraphStore, Label, Node, NodeRef, Properties, ReadContext, Relation};
use model::{CastMember, CreateMovieInput, Movie, MovieFilter};

/// Create a movie, then attach its genres, director and cast.
///
/// Steps run in separate write contexts, in order: the movie node, one step
/// per genre (upsert by name plus `HAS_GENRE`), the `DIRECTED` edge, one
/// `ACTED_IN` edge per actor. The first failing step stops the sequence and
/// its error is returned; completed steps stay committed.
pub async fn create_movie(store: &dyn GraphStore, input: CreateMovieInput) -> CineResult<Created> {
    let id = common::new_id();
    let mut properties = Properties::new();
    properties.insert("id".to_string(), json!(id));
    properties.insert("title".to_string(), json!(input.title));
    properties.insert("released".to_string(), json!(input.released));
    properties.insert("rating".to_string(), json!(input.rating));
    properties.insert("budget".to_string(), json!(input.budget));
    properties.insert("boxOffice".to_string(), json!(input.box_office));
    properties.insert("description".to_string(), json!(input.description));

    let movie = common::create_entity(store, Label::Movie, properties).await?;

    for name in &input.genres {
        attach_genre(store, &movie, name).await?;
    }

    if let Some(director_id) = &input.director_id {
        let director = NodeRef::new(Label::Director, director_id.as_str());
        common::link(store, &movie, Relation::Directed, &director, &movie).await?;
    }

    for actor_id in &input.actor_ids {
        let actor = NodeRef::new(Label::Actor, actor_id.as_str());
        common::link(store, &movie, Relation::ActedIn, &actor, &movie).await?;
    }

    info!(
        movie_id = %id,
        genres = input.genres.len(),
        actors = input.actor_ids.len(),
        "Movie created"
    );
    Ok(Created::new(id, Label::Movie))
}

async fn attach_genre(store: &dyn GraphStore, movie: &NodeRef, name: &str) -> CineResult<()> {
    let mut tx = store.write().await?;
    let outcome = async {
        let genre = genre::merge_genre(tx.as_mut(), name).await?;
        tx.create_edge(Relation::HasGenre, movie, &genre).await
    }
    .await;

    finish(tx, outcome).await.inspect_err(|err| {
        warn!(owner = %movie, genre = name, error = %err, "Genre step failed; movie kept without it");
    })
}

/// Get a movie by ID.
pub async fn get_movie(store: &dyn GraphStore, id: &str) -> CineResult<Movie> {
    let mut rx = store.read().await?;
    let node = rx.get_node(Label::Movie, id).await?;
    movie_view(rx.as_mut(), node).await
}

/// List movies, optionally restricted to a director and/or an actor.
pub async fn list_movies(store: &dyn GraphStore, filter: &MovieFilter) -> CineResult<Vec<Movie>> {
    let mut rx = store.read().await?;
    let nodes = rx.nodes(Label::Movie).await?;

    let mut movies = Vec::new();
    for node in nodes {
        if matches_filter(rx.as_mut(), &node, filter).await? {
            movies.push(movie_view(rx.as_mut(), node).await?);
        }
    }
    Ok(movies)
}

/// Delete a movie and its relationships. Genres, people and awards stay.
pub async fn delete_movie(store: &dyn GraphStore, id: &str) -> CineResult<Ack> {
    let ack = common::delete_entity(store, Label::Movie, id).await?;
    info!(movie_id = id, "Movie deleted");
    Ok(ack)
}

/// Actors of a movie, each with their awards, ordered by name.
pub async fn movie_cast(store: &dyn GraphStore, movie_id: &str) -> CineResult<Vec<CastMember>> {
    let mut rx = store.read().await?;
    let movie = rx.get_node(Label::Movie, movie_id).await?;

    let mut actors = common::distinct_nodes(
        rx.neighbors(&movie.node_ref(), Relation::ActedIn, Direction::Incoming)
            .await?,
    );
    actors.sort_by(|a, b| {
        a.display_name()
            .cmp(b.display_name())
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut cast = Vec::with_capacity(actors.len());
    for actor in actors {
        let awards = common::award_lines(rx.as_mut(), &actor.node_ref()).await?;
        cast.push(CastMember {
            name: actor.display_name().to_string(),
            birthdate: actor.prop_text("birthdate"),
            id: actor.id,
            awards,
        });
    }
    Ok(cast)
}

async fn matches_filter(ctx: &mut dyn ReadContext, movie: &Node, filter: &MovieFilter) -> CineResult<bool> {
    let node_ref = movie.node_ref();

    if let Some(director_id) = &filter.director_id {
        let directors = ctx
            .neighbors(&node_ref, Relation::Directed, Direction::Incoming)
            .await?;
        if !directors.iter().any(|director| &director.id == director_id) {
            return Ok(false);
        }
    }

    if let Some(actor_id) = &filter.actor_id {
        let actors = ctx
            .neighbors(&node_ref, Relation::ActedIn, Direction::Incoming)
            .await?;
        if !actors.iter().any(|actor| &actor.id == actor_id) {
            return Ok(false);
        }
    }

    Ok(true)
}

async fn movie_view(ctx: &mut dyn ReadContext, node: Node) -> CineResult<Movie> {
    let node_ref = node.node_ref();
    let genres = common::distinct_names(
        ctx.neighbors(&node_ref, Relation::HasGenre, Direction::Outgoing)
            .await?,
    );
    // First director by name when several are linked.
    let director = common::distinct_names(
        ctx.neighbors(&node_ref, Relation::Directed, Direction::Incoming)
            .await?,
    )
    .into_iter()
    .next();
    let actors = common::distinct_names(
        ctx.neighbors(&node_ref, Relation::ActedIn, Direction::Incoming)
            .await?,
    );
    let awards = common::award_lines(ctx, &node_ref).await?;

    Ok(Movie {
        title: node.display_name().to_string(),
        released: node.i64_prop("released").unwrap_or_default(),
        rating: node.f64_prop("rating").unwrap_or_default(),
        budget: node.f64_prop("budget").unwrap_or_default(),
        box_office: node.f64_prop("boxOffice").unwrap_or_default(),
        description: node.prop_text("description"),
        id: node.id,
        genres,
        director,
        actors,
        awards,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{self, model::CreateActorInput};
    use crate::director::{self, model::CreateDirectorInput};
    use crate::graph::MemoryGraph;

    #[tokio::test]
    async fn test_create_movie_full_view() {
        let store = MemoryGraph::new();
        let keanu = actor::create_actor(&store, CreateActorInput::new("Keanu Reeves", "1964-09-02"))
            .await
            .unwrap();
        let carrie = actor::create_actor(&store, CreateActorInput::new("Carrie-Anne Moss", "1967-08-21"))
            .await
            .unwrap();
        let lana = director::create_director(&store, CreateDirectorInput::new("Lana Wachowski", "1965-06-21"))
            .await
            .unwrap();

        let created = create_movie(
            &store,
            CreateMovieInput::new("The Matrix", 1999)
                .rated(8.7)
                .with_finances(63_000_000.0, 467_000_000.0)
                .with_description("A hacker learns the truth")
                .with_genre("Sci-Fi")
                .with_genre("Action")
                .directed_by(&lana.id)
                .with_actor(&keanu.id)
                .with_actor(&carrie.id),
        )
        .await
        .unwrap();

        let movie = get_movie(&store, &created.id).await.unwrap();
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.released, 1999);
        assert_eq!(movie.rating, 8.7);
        assert_eq!(movie.box_office, 467_000_000.0);
        assert_eq!(movie.genres, vec!["Action".to_string(), "Sci-Fi".to_string()]);
        assert_eq!(movie.director.as_deref(), Some("Lana Wachowski"));
        assert_eq!(
            movie.actors,
            vec!["Carrie-Anne Moss".to_string(), "Keanu Reeves".to_string()]
        );
        assert!(movie.awards.is_empty());
    }

    #[tokio::test]
    async fn test_genres_shared_across_movies() {
        let store = MemoryGraph::new();
        create_movie(&store, CreateMovieInput::new("Alien", 1979).with_genre("Horror"))
            .await
            .unwrap();
        create_movie(&store, CreateMovieInput::new("The Thing", 1982).with_genre("Horror"))
            .await
            .unwrap();

        let genres = genre::list_genres(&store).await.unwrap();
        assert_eq!(genres.len(), 1);
        assert_eq!(genres[0].name, "Horror");
    }

    #[tokio::test]
    async fn test_missing_director_stops_after_movie_node() {
        let store = MemoryGraph::new();
        let keanu = actor::create_actor(&store, CreateActorInput::new("Keanu Reeves", "1964-09-02"))
            .await
            .unwrap();

        let err = create_movie(
            &store,
            CreateMovieInput::new("Speed", 1994)
                .with_genre("Action")
                .directed_by("ghost-director")
                .with_actor(&keanu.id),
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());

        // The movie and its genre step survived; the cast step never ran.
        let movies = list_movies(&store, &MovieFilter::default()).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].genres, vec!["Action".to_string()]);
        assert!(movies[0].actors.is_empty());
    }

    #[tokio::test]
    async fn test_list_movies_filters() {
        let store = MemoryGraph::new();
        let keanu = actor::create_actor(&store, CreateActorInput::new("Keanu Reeves", "1964-09-02"))
            .await
            .unwrap();
        let sandra = actor::create_actor(&store, CreateActorInput::new("Sandra Bullock", "1964-07-26"))
            .await
            .unwrap();
        let jan = director::create_director(&store, CreateDirectorInput::new("Jan de Bont", "1943-10-22"))
            .await
            .unwrap();

        create_movie(
            &store,
            CreateMovieInput::new("Speed", 1994)
                .directed_by(&jan.id)
                .with_actor(&keanu.id)
                .with_actor(&sandra.id),
        )
        .await
        .unwrap();
        create_movie(&store, CreateMovieInput::new("John Wick", 2014).with_actor(&keanu.id))
            .await
            .unwrap();
        create_movie(&store, CreateMovieInput::new("Gravity", 2013).with_actor(&sandra.id))
            .await
            .unwrap();

        let all = list_movies(&store, &MovieFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let keanu_films = list_movies(&store, &MovieFilter::by_actor(&keanu.id)).await.unwrap();
        let titles: Vec<&str> = keanu_films.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Speed", "John Wick"]);

        let by_jan = list_movies(&store, &MovieFilter::by_director(&jan.id)).await.unwrap();
        assert_eq!(by_jan.len(), 1);

        let both = MovieFilter::by_director(&jan.id).and_actor(&sandra.id);
        assert_eq!(list_movies(&store, &both).await.unwrap().len(), 1);

        let none = MovieFilter::by_director(&jan.id).and_actor("someone-else");
        assert!(list_movies(&store, &none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_movie_cast() {
        let store = MemoryGraph::new();
        let keanu = actor::create_actor(&store, CreateActorInput::new("Keanu Reeves", "1964-09-02"))
            .await
            .unwrap();
        let created = create_movie(&store, CreateMovieInput::new("Point Break", 1991).with_actor(&keanu.id))
            .await
            .unwrap();

        let cast = movie_cast(&store, &created.id).await.unwrap();
        assert_eq!(cast.len(), 1);
        assert_eq!(cast[0].id, keanu.id);
        assert_eq!(cast[0].birthdate, "1964-09-02");

        assert!(movie_cast(&store, "missing").await.unwrap_err().is_not_found());
    }
}
