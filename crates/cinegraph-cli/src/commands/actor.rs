//! Actor commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use cinegraph_core::actor::{self, model::CreateActorInput};
use cinegraph_core::analytics;
use cinegraph_graph::Neo4jStore;

use crate::output;

#[derive(Subcommand)]
pub enum ActorCommands {
    /// Create an actor
    Create(CreateArgs),

    /// Show an actor with their movies and awards
    Get {
        /// Actor ID
        id: String,
    },

    /// List all actors
    List,

    /// Delete an actor and their edges
    Delete {
        /// Actor ID
        id: String,
    },

    /// Actors who shared a movie with this one
    Collaborations {
        /// Actor ID
        id: String,
    },

    /// Actors ranked by movie count, then award count
    Top,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Actor name
    pub name: String,

    /// Birthdate, e.g. 1956-07-09
    #[arg(long, short)]
    pub birthdate: String,

    /// Award already won (can be repeated)
    #[arg(long = "award")]
    pub awards: Vec<String>,
}

pub async fn execute(cmd: ActorCommands, store: &Neo4jStore) -> Result<()> {
    match cmd {
        ActorCommands::Create(args) => {
            let input = args
                .awards
                .into_iter()
                .fold(CreateActorInput::new(args.name, args.birthdate), |input, award| {
                    input.with_award(award)
                });
            let created = actor::create_actor(store, input).await?;
            output::success(&created.message);
            output::print_json(&created)
        }
        ActorCommands::Get { id } => output::print_json(&actor::get_actor(store, &id).await?),
        ActorCommands::List => output::print_list(&actor::list_actors(store).await?, "No actors found."),
        ActorCommands::Delete { id } => {
            let ack = actor::delete_actor(store, &id).await?;
            output::success(&ack.message);
            Ok(())
        }
        ActorCommands::Collaborations { id } => output::print_list(
            &analytics::collaborations(store, &id).await?,
            "No collaborations found.",
        ),
        ActorCommands::Top => output::print_list(&analytics::top_actors(store).await?, "No actors found."),
    }
}
