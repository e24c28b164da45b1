//! Movie commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use cinegraph_core::analytics;
use cinegraph_core::movie::{self, model::{CreateMovieInput, MovieFilter}};
use cinegraph_graph::Neo4jStore;

use crate::output;

#[derive(Subcommand)]
pub enum MovieCommands {
    /// Create a movie with its genres, director and cast
    Create(CreateArgs),

    /// Show a movie with genres, director, cast and awards
    Get {
        /// Movie ID
        id: String,
    },

    /// List movies, optionally filtered
    List(ListArgs),

    /// Delete a movie and its edges
    Delete {
        /// Movie ID
        id: String,
    },

    /// Show the cast of a movie
    Cast {
        /// Movie ID
        id: String,
    },

    /// Movies sharing genres with this one
    Similar {
        /// Movie ID
        id: String,
    },

    /// Scored recommendations based on genres, director and cast
    Recommend {
        /// Movie ID
        id: String,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    /// Movie title
    pub title: String,

    /// Release year
    #[arg(long, short)]
    pub released: i64,

    #[arg(long, default_value = "0")]
    pub rating: f64,

    #[arg(long, default_value = "0")]
    pub budget: f64,

    #[arg(long, default_value = "0")]
    pub box_office: f64,

    #[arg(long, short, default_value = "")]
    pub description: String,

    /// Genre name, created when absent (can be repeated)
    #[arg(long = "genre", short)]
    pub genres: Vec<String>,

    /// Director ID
    #[arg(long)]
    pub director: Option<String>,

    /// Actor ID (can be repeated)
    #[arg(long = "actor", short)]
    pub actors: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only movies directed by this director
    #[arg(long)]
    pub director: Option<String>,

    /// Only movies this actor appeared in
    #[arg(long)]
    pub actor: Option<String>,
}

impl From<CreateArgs> for CreateMovieInput {
    fn from(args: CreateArgs) -> Self {
        let mut input = CreateMovieInput::new(args.title, args.released)
            .rated(args.rating)
            .with_finances(args.budget, args.box_office)
            .with_description(args.description);
        for genre in args.genres {
            input = input.with_genre(genre);
        }
        if let Some(director_id) = args.director {
            input = input.directed_by(director_id);
        }
        for actor_id in args.actors {
            input = input.with_actor(actor_id);
        }
        input
    }
}

pub async fn execute(cmd: MovieCommands, store: &Neo4jStore) -> Result<()> {
    match cmd {
        MovieCommands::Create(args) => {
            let created = movie::create_movie(store, args.into()).await?;
            output::success(&created.message);
            output::print_json(&created)
        }
        MovieCommands::Get { id } => output::print_json(&movie::get_movie(store, &id).await?),
        MovieCommands::List(args) => {
            let filter = MovieFilter {
                director_id: args.director,
                actor_id: args.actor,
            };
            output::print_list(&movie::list_movies(store, &filter).await?, "No movies found.")
        }
        MovieCommands::Delete { id } => {
            let ack = movie::delete_movie(store, &id).await?;
            output::success(&ack.message);
            Ok(())
        }
        MovieCommands::Cast { id } => {
            output::print_list(&movie::movie_cast(store, &id).await?, "No cast recorded.")
        }
        MovieCommands::Similar { id } => {
            output::print_list(&analytics::similar_movies(store, &id).await?, "No similar movies found.")
        }
        MovieCommands::Recommend { id } => output::print_list(
            &analytics::recommendations(store, &id).await?,
            "No recommendations found.",
        ),
    }
}
